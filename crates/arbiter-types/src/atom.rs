// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Atoms and Manifests
// ─────────────────────────────────────────────────────────────────────
//! Structured factual statements and canonically ordered collections
//! of them.
//!
//! An atom's identity is `(subject, predicate, object, is_true)`.
//! Confidence, source span and kind are metadata: they travel with the
//! atom and are hashed into manifests, but never take part in equality
//! or ordering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{ArbiterError, ArbiterResult};

/// Borrowed identity key of an atom.
pub type AtomKey<'a> = (&'a str, &'a str, &'a str, bool);

/// Character range in the source text an atom was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

/// Epistemic category of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomKind {
    Fact,
    Norm,
    Assumption,
}

fn default_true() -> bool {
    true
}

fn default_confidence() -> f64 {
    1.0
}

/// A signed `(subject, predicate, object)` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    pub subject: String,
    pub predicate: String,
    #[serde(rename = "obj")]
    pub object: String,
    #[serde(default = "default_true")]
    pub is_true: bool,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_span: Option<SourceSpan>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AtomKind>,
}

impl Atom {
    /// A true atom with full confidence and no metadata.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            is_true: true,
            confidence: 1.0,
            source_span: None,
            kind: None,
        }
    }

    pub fn negated(mut self) -> Self {
        self.is_true = !self.is_true;
        self
    }

    pub fn with_truth(mut self, is_true: bool) -> Self {
        self.is_true = is_true;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.source_span = Some(SourceSpan { start, end });
        self
    }

    pub fn with_kind(mut self, kind: AtomKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Identity/ordering key.
    pub fn key(&self) -> AtomKey<'_> {
        (&self.subject, &self.predicate, &self.object, self.is_true)
    }

    /// Reject empty roles, out-of-range confidence and inverted spans.
    pub fn validate(&self) -> ArbiterResult<()> {
        for (role, value) in [
            ("subject", &self.subject),
            ("predicate", &self.predicate),
            ("obj", &self.object),
        ] {
            if value.trim().is_empty() {
                return Err(ArbiterError::Validation(format!("atom {role} is empty")));
            }
        }
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(ArbiterError::Validation(format!(
                "atom confidence must be in [0, 1], got {}",
                self.confidence
            )));
        }
        if let Some(span) = self.source_span {
            if span.start > span.end {
                return Err(ArbiterError::Validation(format!(
                    "source span start {} exceeds end {}",
                    span.start, span.end
                )));
            }
        }
        Ok(())
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.subject, self.predicate, self.object, self.is_true
        )
    }
}

#[derive(Deserialize)]
struct ManifestWire {
    atoms: Vec<Atom>,
}

impl From<ManifestWire> for Manifest {
    fn from(wire: ManifestWire) -> Self {
        Manifest::new(wire.atoms)
    }
}

/// Canonically sorted collection of atoms (evidence or claims).
///
/// Duplicate identity keys are kept; construction and deserialization
/// both sort, so two manifests built from permutations of the same atoms
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ManifestWire")]
pub struct Manifest {
    atoms: Vec<Atom>,
}

impl Manifest {
    pub fn new(mut atoms: Vec<Atom>) -> Self {
        atoms.sort();
        Self { atoms }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn into_atoms(self) -> Vec<Atom> {
        self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }
}

impl FromIterator<Atom> for Manifest {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Manifest::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}
