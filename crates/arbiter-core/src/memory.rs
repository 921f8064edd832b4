// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Hypervector Item Memory
// ─────────────────────────────────────────────────────────────────────
//! Lazily populated `token → hypervector` memory.
//!
//! A vector is generated on first access from a ChaCha8 stream seeded
//! with `(base_seed + fnv1a_32(token)) mod 2^32`, drawing 64 components
//! per `next_u64()` word, least significant bit first (1 → +1, 0 → −1).
//!
//! Lifecycle: one memory per verification run, or one shared across
//! runs behind an `Arc`. The map only grows. Generation and anchor
//! overwrites take the write lock, so a token's vector becomes visible
//! atomically and at most one writer touches it at a time.

use std::collections::HashMap;
use std::ops::Neg;
use std::sync::Arc;

use parking_lot::RwLock;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arbiter_types::hashing::fnv1a_32;
use arbiter_types::{ArbiterConfig, ArbiterError, ArbiterResult};

/// Fixed-dimension vector with every component exactly +1 or −1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hypervector {
    data: Vec<i8>,
}

impl Hypervector {
    /// Build from integer components, mapping `>= 0` to +1 and the rest to −1.
    pub fn from_components(components: Vec<i8>) -> Self {
        let data = components
            .into_iter()
            .map(|c| if c >= 0 { 1 } else { -1 })
            .collect();
        Self { data }
    }

    /// Build from real values by sign (`>= 0` → +1, else −1; NaN → −1).
    pub fn from_signs(values: &[f64]) -> Self {
        let data = values.iter().map(|&v| if v >= 0.0 { 1 } else { -1 }).collect();
        Self { data }
    }

    /// Sign of integer sums; ties resolve to +1.
    pub(crate) fn from_sums(sums: &[i32]) -> Self {
        let data = sums.iter().map(|&s| if s >= 0 { 1 } else { -1 }).collect();
        Self { data }
    }

    pub(crate) fn from_bipolar_unchecked(data: Vec<i8>) -> Self {
        debug_assert!(data.iter().all(|&c| c == 1 || c == -1));
        Self { data }
    }

    pub fn dim(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }

    pub fn is_bipolar(&self) -> bool {
        self.data.iter().all(|&c| c == 1 || c == -1)
    }

    pub fn negated(&self) -> Self {
        Self {
            data: self.data.iter().map(|&c| -c).collect(),
        }
    }

    /// True iff `other` is the exact negation of `self`.
    pub fn is_opposite_of(&self, other: &Hypervector) -> bool {
        self.dim() == other.dim() && self.data.iter().zip(&other.data).all(|(a, b)| *a == -*b)
    }
}

impl Neg for &Hypervector {
    type Output = Hypervector;

    fn neg(self) -> Hypervector {
        self.negated()
    }
}

/// Deterministic token → hypervector memory.
pub struct VectorMemory {
    dim: usize,
    seed: u32,
    store: RwLock<HashMap<String, Arc<Hypervector>>>,
}

impl VectorMemory {
    pub fn new(dim: usize, seed: u32) -> Self {
        Self {
            dim,
            seed,
            store: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ArbiterConfig) -> Self {
        Self::new(config.dim, config.seed)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Combined 32-bit seed for a token.
    pub fn token_seed(&self, token: &str) -> u32 {
        self.seed.wrapping_add(fnv1a_32(token))
    }

    fn generate(&self, token: &str) -> Hypervector {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(self.token_seed(token)));
        let mut data = Vec::with_capacity(self.dim);
        while data.len() < self.dim {
            let word = rng.next_u64();
            let take = (self.dim - data.len()).min(64);
            for bit in 0..take {
                data.push(if (word >> bit) & 1 == 1 { 1 } else { -1 });
            }
        }
        Hypervector::from_bipolar_unchecked(data)
    }

    /// Vector for `token`, generating and caching it on first access.
    pub fn get(&self, token: &str) -> Arc<Hypervector> {
        if let Some(vector) = self.store.read().get(token) {
            return Arc::clone(vector);
        }
        let mut store = self.store.write();
        // Another writer may have materialized it between the two locks.
        Arc::clone(
            store
                .entry(token.to_string())
                .or_insert_with(|| Arc::new(self.generate(token))),
        )
    }

    /// Force-overwrite a token's vector.
    pub fn set(&self, token: &str, vector: Hypervector) -> ArbiterResult<()> {
        if vector.dim() != self.dim {
            return Err(ArbiterError::Validation(format!(
                "vector for '{token}' has dim {}, memory dim is {}",
                vector.dim(),
                self.dim
            )));
        }
        self.store.write().insert(token.to_string(), Arc::new(vector));
        Ok(())
    }

    /// Hard-wire `other = −anchor` under a single write lock.
    pub fn anchor_opposite(&self, anchor: &str, other: &str) {
        let mut store = self.store.write();
        let base = Arc::clone(
            store
                .entry(anchor.to_string())
                .or_insert_with(|| Arc::new(self.generate(anchor))),
        );
        store.insert(other.to_string(), Arc::new(base.negated()));
        log::debug!("anchored '{other}' as the negation of '{anchor}'");
    }

    pub fn contains(&self, token: &str) -> bool {
        self.store.read().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Materialized tokens in sorted order.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.store.read().keys().cloned().collect();
        tokens.sort();
        tokens
    }
}

impl Default for VectorMemory {
    fn default() -> Self {
        Self::from_config(&ArbiterConfig::default())
    }
}
