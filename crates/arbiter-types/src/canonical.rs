// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Token Canonicalization
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeMap;

use crate::atom::Atom;

/// Trim, lowercase and replace spaces with underscores.
pub fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase().replace(' ', "_")
}

/// Normalize, then substitute an alias when one is registered.
pub fn canonicalize_token(token: &str, aliases: &BTreeMap<String, String>) -> String {
    let normalized = normalize_token(token);
    match aliases.get(&normalized) {
        Some(target) => target.clone(),
        None => normalized,
    }
}

/// Canonicalize every role of an atom; metadata is carried over.
pub fn canonicalize_atom(atom: &Atom, aliases: &BTreeMap<String, String>) -> Atom {
    Atom {
        subject: canonicalize_token(&atom.subject, aliases),
        predicate: canonicalize_token(&atom.predicate, aliases),
        object: canonicalize_token(&atom.object, aliases),
        ..atom.clone()
    }
}

/// Sort atoms by identity key.
pub fn sort_atoms<I: IntoIterator<Item = Atom>>(atoms: I) -> Vec<Atom> {
    let mut sorted: Vec<Atom> = atoms.into_iter().collect();
    sorted.sort();
    sorted
}
