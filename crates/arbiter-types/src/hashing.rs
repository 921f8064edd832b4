// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Stable Hashing
// ─────────────────────────────────────────────────────────────────────
//! Frozen hash functions. Changing either one silently changes every
//! generated hypervector, fingerprint and proof id.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ArbiterResult;

const FNV_OFFSET_BASIS_32: u32 = 2_166_136_261;
const FNV_PRIME_32: u32 = 16_777_619;

/// 32-bit FNV-1a over the UTF-8 bytes of `token`.
pub fn fnv1a_32(token: &str) -> u32 {
    let mut hash = FNV_OFFSET_BASIS_32;
    for byte in token.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME_32);
    }
    hash
}

/// Canonical JSON: object keys sorted, no insignificant whitespace.
///
/// Routing through `serde_json::Value` sorts keys because its map is a
/// `BTreeMap`.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> ArbiterResult<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&value)?)
}

/// Lowercase hex SHA-256.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// SHA-256 of the canonical JSON serialization.
pub fn sha256_canonical_json<T: Serialize + ?Sized>(value: &T) -> ArbiterResult<String> {
    Ok(sha256_hex(canonical_json(value)?.as_bytes()))
}
