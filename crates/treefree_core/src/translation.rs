use crate::matrix::Sl2;
use crate::valuation::{valuation, Prime};

/// Displacement of `m` along its axis in the Bruhat-Tits tree of `p`.
///
/// Computed as `-2 · min(0, v_p(tr m))`, so it is always even and
/// nonnegative. A zero trace has infinite valuation and length 0.
pub fn translation_length(m: &Sl2, p: &Prime) -> u64 {
    match valuation(&m.trace(), p) {
        Some(v) if v < 0 => 2 * v.unsigned_abs(),
        _ => 0,
    }
}

/// An element fixing a vertex of the tree; it can never sit in a free discrete generating set.
pub fn is_elliptic(m: &Sl2, p: &Prime) -> bool {
    translation_length(m, p) == 0
}
