// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Atom Encoder
// ─────────────────────────────────────────────────────────────────────
//! Role-bound atom encoding.
//!
//! `encode(atom) = ρ¹(subject) ⊙ ρ²(predicate) ⊙ ρ³(object) ⊙ ρ⁴(truth)`
//! where ρᵏ is cyclic rotation by k and ⊙ is elementwise product. The
//! distinct shifts make the encoding sensitive to which token fills
//! which role.

use std::sync::Arc;

use arbiter_types::Atom;

use crate::algebra::{bind, bundle, permute};
use crate::memory::{Hypervector, VectorMemory};

pub const SUBJECT_SHIFT: usize = 1;
pub const PREDICATE_SHIFT: usize = 2;
pub const OBJECT_SHIFT: usize = 3;
pub const TRUTH_SHIFT: usize = 4;

pub const TRUE_TOKEN: &str = "TRUE";
pub const FALSE_TOKEN: &str = "FALSE";
/// Stands in for the bundle of an empty manifest.
pub const EMPTY_TOKEN: &str = "__EMPTY__";

/// Encodes atoms and manifests against a shared [`VectorMemory`].
#[derive(Clone)]
pub struct AtomEncoder {
    memory: Arc<VectorMemory>,
}

impl AtomEncoder {
    pub fn new(memory: Arc<VectorMemory>) -> Self {
        Self { memory }
    }

    pub fn memory(&self) -> &Arc<VectorMemory> {
        &self.memory
    }

    pub fn encode_atom(&self, atom: &Atom) -> Hypervector {
        let truth = if atom.is_true { TRUE_TOKEN } else { FALSE_TOKEN };
        let subject = permute(&self.memory.get(&atom.subject), SUBJECT_SHIFT);
        let predicate = permute(&self.memory.get(&atom.predicate), PREDICATE_SHIFT);
        let object = permute(&self.memory.get(&atom.object), OBJECT_SHIFT);
        let truth = permute(&self.memory.get(truth), TRUTH_SHIFT);
        bind(&bind(&subject, &predicate), &bind(&object, &truth))
    }

    /// Bundle of the atom encodings; the sentinel vector when empty.
    pub fn encode_manifest<'a, I>(&self, atoms: I) -> Hypervector
    where
        I: IntoIterator<Item = &'a Atom>,
    {
        let encoded: Vec<Hypervector> = atoms.into_iter().map(|a| self.encode_atom(a)).collect();
        match bundle(encoded.iter()) {
            Some(v) => v,
            None => (*self.memory.get(EMPTY_TOKEN)).clone(),
        }
    }
}
