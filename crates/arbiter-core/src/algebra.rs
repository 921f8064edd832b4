// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Hypervector Algebra
// ─────────────────────────────────────────────────────────────────────
//! Bind, bundle, permute and cosine similarity over bipolar vectors.
//!
//! All operands are assumed to come from the same [`VectorMemory`], so
//! dimensions agree; this is checked in debug builds only.
//!
//! [`VectorMemory`]: crate::memory::VectorMemory

use crate::memory::Hypervector;

/// Guards the cosine denominator against zero norms.
pub const COSINE_EPS: f64 = 1e-8;

/// Elementwise product. Self-inverse: `bind(bind(a, b), b) == a`.
pub fn bind(a: &Hypervector, b: &Hypervector) -> Hypervector {
    debug_assert_eq!(a.dim(), b.dim());
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| x * y)
        .collect();
    Hypervector::from_bipolar_unchecked(data)
}

/// Elementwise sign of the sum; ties resolve to +1.
///
/// Returns `None` for an empty input.
pub fn bundle<'a, I>(vectors: I) -> Option<Hypervector>
where
    I: IntoIterator<Item = &'a Hypervector>,
{
    let mut iter = vectors.into_iter();
    let first = iter.next()?;
    let mut sums: Vec<i32> = first.as_slice().iter().map(|&c| i32::from(c)).collect();
    for v in iter {
        debug_assert_eq!(v.dim(), sums.len());
        for (sum, &c) in sums.iter_mut().zip(v.as_slice()) {
            *sum += i32::from(c);
        }
    }
    Some(Hypervector::from_sums(&sums))
}

/// Cyclic rotation by `shift` positions: `out[i] = v[(i - shift) mod dim]`.
pub fn permute(v: &Hypervector, shift: usize) -> Hypervector {
    let mut data = v.as_slice().to_vec();
    if !data.is_empty() {
        let k = shift % data.len();
        data.rotate_right(k);
    }
    Hypervector::from_bipolar_unchecked(data)
}

/// Inverse of [`permute`].
pub fn unpermute(v: &Hypervector, shift: usize) -> Hypervector {
    let mut data = v.as_slice().to_vec();
    if !data.is_empty() {
        let k = shift % data.len();
        data.rotate_left(k);
    }
    Hypervector::from_bipolar_unchecked(data)
}

/// `dot(a, b) / (‖a‖·‖b‖ + ε)`.
pub fn cosine_similarity(a: &Hypervector, b: &Hypervector) -> f64 {
    debug_assert_eq!(a.dim(), b.dim());
    let dot: i64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| i64::from(x * y))
        .sum();
    // Every component is ±1, so each squared norm is the dimension.
    let norm_a = (a.dim() as f64).sqrt();
    let norm_b = (b.dim() as f64).sqrt();
    dot as f64 / (norm_a * norm_b + COSINE_EPS)
}
