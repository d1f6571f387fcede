use crate::matrix::Sl2;
use crate::traits::GroupElement;
use crate::translation::translation_length;
use crate::valuation::Prime;

/// The potential `Sum(g)` driving the reduction.
///
/// Adds the translation length of every generator and, for each pair
/// `i < j`, the lengths of `g_i·g_j` and `g_i⁻¹·g_j`. Always recomputed
/// from the whole tuple.
pub fn potential(generators: &[Sl2], p: &Prime) -> u64 {
    let mut total: u64 = generators
        .iter()
        .map(|g| translation_length(g, p))
        .sum();

    for (i, gi) in generators.iter().enumerate() {
        let gi_inv = gi.inverse();
        for gj in &generators[i + 1..] {
            total += translation_length(&gi.compose(gj), p);
            total += translation_length(&gi_inv.compose(gj), p);
        }
    }
    total
}
