// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Verification Packs
// ─────────────────────────────────────────────────────────────────────
//! Domain ontology and axioms for a verification run.
//!
//! Loading a pack normalizes every token, substitutes aliases,
//! canonicalizes opposite pairs and mutex groups, anchors each opposite
//! pair in the [`VectorMemory`] (the lexicographically smaller token is
//! the anchor, the other becomes its exact negation) and fingerprints
//! the canonical ontology plus axioms.
//!
//! A token may be the negated side of at most one pair.
//!
//! Production deployments keep packs on disk ([`DirectoryPackLoader`]);
//! tests and embedded use register them in memory
//! ([`InMemoryPackLoader`]).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use arbiter_types::canonical::{canonicalize_atom, canonicalize_token, normalize_token, sort_atoms};
use arbiter_types::hashing::sha256_canonical_json;
use arbiter_types::{ArbiterError, ArbiterResult, Atom};

use crate::memory::VectorMemory;

/// Raw ontology as authored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologySource {
    pub aliases: BTreeMap<String, String>,
    pub opposites: Vec<Vec<String>>,
    pub mutex_sets: Vec<Vec<String>>,
}

/// Raw pack content: ontology plus axioms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackSource {
    pub ontology: OntologySource,
    pub axioms: Vec<Atom>,
}

impl PackSource {
    pub fn from_json(ontology_json: &str, axioms_json: Option<&str>) -> ArbiterResult<Self> {
        let ontology: OntologySource = serde_json::from_str(ontology_json)
            .map_err(|e| ArbiterError::Pack(format!("ontology JSON parse error: {e}")))?;
        let axioms: Vec<Atom> = match axioms_json {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| ArbiterError::Pack(format!("axioms JSON parse error: {e}")))?,
            None => Vec::new(),
        };
        Ok(Self { ontology, axioms })
    }
}

/// Canonical ontology: normalized, alias-substituted, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ontology {
    pub aliases: BTreeMap<String, String>,
    /// Each pair is `[anchor, other]` with `anchor < other`.
    pub opposites: Vec<[String; 2]>,
    pub mutex_sets: Vec<Vec<String>>,
}

impl Ontology {
    fn from_source(source: &OntologySource) -> ArbiterResult<Self> {
        let aliases: BTreeMap<String, String> = source
            .aliases
            .iter()
            .map(|(k, v)| (normalize_token(k), normalize_token(v)))
            .collect();

        let mut opposites = BTreeSet::new();
        for pair in &source.opposites {
            let [left, right] = pair.as_slice() else {
                return Err(ArbiterError::Pack(format!(
                    "opposite entries must have exactly 2 tokens, got {pair:?}"
                )));
            };
            let left = canonicalize_token(left, &aliases);
            let right = canonicalize_token(right, &aliases);
            if left == right {
                return Err(ArbiterError::Pack(format!(
                    "token '{left}' cannot be its own opposite"
                )));
            }
            if left < right {
                opposites.insert([left, right]);
            } else {
                opposites.insert([right, left]);
            }
        }

        // Anchoring overwrites `other`, so it may negate only one anchor.
        let mut negates: BTreeMap<&str, &str> = BTreeMap::new();
        for [anchor, other] in &opposites {
            if let Some(previous) = negates.insert(other.as_str(), anchor.as_str()) {
                return Err(ArbiterError::Pack(format!(
                    "token '{other}' is the opposite of both '{previous}' and '{anchor}'"
                )));
            }
        }

        let mut mutex_sets = BTreeSet::new();
        for group in &source.mutex_sets {
            let canonical: BTreeSet<String> =
                group.iter().map(|t| canonicalize_token(t, &aliases)).collect();
            if canonical.len() >= 2 {
                mutex_sets.insert(canonical.into_iter().collect::<Vec<_>>());
            }
        }

        Ok(Self {
            aliases,
            opposites: opposites.into_iter().collect(),
            mutex_sets: mutex_sets.into_iter().collect(),
        })
    }

    /// Every registered exclusive pair `(a, b)` with `a < b`: opposites
    /// plus all pairwise combinations within each mutex group.
    fn exclusive_pairs(&self) -> BTreeSet<(String, String)> {
        let mut pairs = BTreeSet::new();
        for [a, b] in &self.opposites {
            pairs.insert((a.clone(), b.clone()));
        }
        for group in &self.mutex_sets {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    pairs.insert((a.clone(), b.clone()));
                }
            }
        }
        pairs
    }
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    ontology: &'a Ontology,
    axioms: &'a [Atom],
}

/// Loaded, immutable verification pack.
#[derive(Debug, Clone)]
pub struct PackModel {
    pub name: String,
    pub ontology: Ontology,
    pub axioms: Vec<Atom>,
    /// SHA-256 of the canonical ontology and axioms.
    pub fingerprint: String,
    exclusive: BTreeSet<(String, String)>,
}

impl PackModel {
    /// Canonicalize `source`, anchor its opposites in `memory`, fingerprint it.
    pub fn from_source(
        name: &str,
        source: &PackSource,
        memory: &VectorMemory,
    ) -> ArbiterResult<Self> {
        let ontology = Ontology::from_source(&source.ontology)?;

        let mut axioms = Vec::with_capacity(source.axioms.len());
        for atom in &source.axioms {
            let canonical = canonicalize_atom(atom, &ontology.aliases);
            canonical.validate()?;
            axioms.push(canonical);
        }
        let axioms = sort_atoms(axioms);

        for [anchor, other] in &ontology.opposites {
            memory.anchor_opposite(anchor, other);
        }

        let fingerprint = sha256_canonical_json(&FingerprintInput {
            ontology: &ontology,
            axioms: &axioms,
        })?;
        let exclusive = ontology.exclusive_pairs();

        log::info!(
            "Loaded pack '{name}': {} aliases, {} opposites, {} mutex sets, {} axioms (fingerprint {})",
            ontology.aliases.len(),
            ontology.opposites.len(),
            ontology.mutex_sets.len(),
            axioms.len(),
            &fingerprint[..12]
        );

        Ok(Self {
            name: name.to_string(),
            ontology,
            axioms,
            fingerprint,
            exclusive,
        })
    }

    /// Whether `a` and `b` are registered opposites or share a mutex group.
    pub fn are_exclusive(&self, a: &str, b: &str) -> bool {
        let key = if a < b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        self.exclusive.contains(&key)
    }

    /// Canonicalize a token with this pack's aliases.
    pub fn canonicalize(&self, token: &str) -> String {
        canonicalize_token(token, &self.ontology.aliases)
    }
}

/// Source of packs by name.
pub trait PackLoader: Send + Sync {
    /// Load `pack_name`, anchoring its opposites in `memory`.
    fn load(&self, pack_name: &str, memory: &VectorMemory) -> ArbiterResult<PackModel>;
}

/// In-memory pack registry.
///
/// The default registry carries a small `general` pack with common
/// antonyms.
pub struct InMemoryPackLoader {
    sources: HashMap<String, PackSource>,
}

impl Default for InMemoryPackLoader {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("hazardous".into(), "unsafe".into());
        aliases.insert("dangerous".into(), "unsafe".into());
        aliases.insert("shut".into(), "closed".into());
        let opposites = [("open", "closed"), ("safe", "unsafe"), ("on", "off")]
            .iter()
            .map(|(a, b)| vec![a.to_string(), b.to_string()])
            .collect();
        let general = PackSource {
            ontology: OntologySource {
                aliases,
                opposites,
                mutex_sets: vec![vec!["red".into(), "green".into(), "blue".into()]],
            },
            axioms: Vec::new(),
        };
        let mut sources = HashMap::new();
        sources.insert("general".to_string(), general);
        Self { sources }
    }
}

impl InMemoryPackLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    pub fn with_pack(mut self, name: &str, source: PackSource) -> Self {
        self.sources.insert(name.to_string(), source);
        self
    }

    pub fn insert(&mut self, name: &str, source: PackSource) {
        self.sources.insert(name.to_string(), source);
    }
}

impl PackLoader for InMemoryPackLoader {
    fn load(&self, pack_name: &str, memory: &VectorMemory) -> ArbiterResult<PackModel> {
        let source = self
            .sources
            .get(pack_name)
            .ok_or_else(|| ArbiterError::Pack(format!("unknown pack '{pack_name}'")))?;
        PackModel::from_source(pack_name, source, memory)
    }
}

/// Reads `<root>/<pack>/ontology.json` and, when present, `axioms.json`.
pub struct DirectoryPackLoader {
    root: PathBuf,
}

impl DirectoryPackLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackLoader for DirectoryPackLoader {
    fn load(&self, pack_name: &str, memory: &VectorMemory) -> ArbiterResult<PackModel> {
        if pack_name.is_empty()
            || pack_name.contains('/')
            || pack_name.contains('\\')
            || pack_name == "."
            || pack_name.contains("..")
        {
            return Err(ArbiterError::Pack(format!("invalid pack name '{pack_name}'")));
        }
        let pack_dir = self.root.join(pack_name);
        let ontology_path = pack_dir.join("ontology.json");
        let ontology_raw = std::fs::read_to_string(&ontology_path).map_err(|e| {
            ArbiterError::Pack(format!("cannot read {}: {e}", ontology_path.display()))
        })?;
        let axioms_path = pack_dir.join("axioms.json");
        let axioms_raw = if axioms_path.exists() {
            Some(std::fs::read_to_string(&axioms_path)?)
        } else {
            None
        };
        let source = PackSource::from_json(&ontology_raw, axioms_raw.as_deref())?;
        PackModel::from_source(pack_name, &source, memory)
    }
}
