//! Product-replacement search over Nielsen rewrites.
//!
//! Candidates are visited in one fixed order:
//! 1. pivot `j` ascending;
//! 2. `left` mask ascending;
//! 3. `right` mask ascending.
//!
//! Bit `k` of a mask refers to the `k`-th index of the tuple once the pivot
//! is removed, in ascending order. The first candidate whose potential is
//! strictly lower wins, so runs are reproducible.

use crate::matrix::Sl2;
use crate::potential::potential;
use crate::traits::GroupElement;
use crate::valuation::Prime;
use serde::Serialize;
use tracing::trace;

/// Largest tuple the `u32` masks can describe.
pub const MAX_SEARCHABLE_GENERATORS: usize = 32;

/// A Nielsen rewrite about a pivot generator.
///
/// Every index in `left` is replaced by `g_pivot · g_i`; afterwards every
/// index in `right` is replaced by `g_i · g_pivot⁻¹`. An index in both
/// receives the left rewrite first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewriteInstruction {
    pub pivot: usize,
    pub left: u32,
    pub right: u32,
}

impl RewriteInstruction {
    /// Tuple indices other than the pivot, in mask-bit order.
    fn others(&self, len: usize) -> impl Iterator<Item = (u32, usize)> + '_ {
        (0..len).filter(move |&i| i != self.pivot).zip(0u32..).map(|(i, bit)| (bit, i))
    }

    pub fn left_indices(&self, len: usize) -> Vec<usize> {
        self.others(len)
            .filter(|(bit, _)| self.left >> bit & 1 == 1)
            .map(|(_, i)| i)
            .collect()
    }

    pub fn right_indices(&self, len: usize) -> Vec<usize> {
        self.others(len)
            .filter(|(bit, _)| self.right >> bit & 1 == 1)
            .map(|(_, i)| i)
            .collect()
    }

    /// Builds the rewritten tuple; the input is left untouched.
    pub fn apply<G: GroupElement>(&self, tuple: &[G]) -> Vec<G> {
        let pivot = &tuple[self.pivot];
        let pivot_inv = pivot.inverse();
        let mut rewritten = tuple.to_vec();

        for (bit, i) in self.others(tuple.len()) {
            if self.left >> bit & 1 == 1 {
                rewritten[i] = pivot.compose(&rewritten[i]);
            }
            if self.right >> bit & 1 == 1 {
                rewritten[i] = rewritten[i].compose(&pivot_inv);
            }
        }
        rewritten
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The first strictly improving rewrite, with the potential it reaches.
    Improved {
        instruction: RewriteInstruction,
        potential: u64,
    },
    /// No rewrite lowers the potential: the tuple is a local minimum.
    Exhausted,
}

/// Number of candidates a full search visits for `n` generators.
pub fn candidate_count(n: usize) -> u128 {
    if n == 0 {
        return 0;
    }
    let per_pivot = 1u128 << (2 * (n - 1));
    n as u128 * (per_pivot - 1)
}

/// Looks for a rewrite with `potential(h) < current`.
///
/// `current` must be the potential of `generators`; the caller already has
/// it and the search never recomputes it.
pub fn find_improving_rewrite(generators: &[Sl2], p: &Prime, current: u64) -> SearchOutcome {
    let n = generators.len();
    if n < 2 || n > MAX_SEARCHABLE_GENERATORS {
        return SearchOutcome::Exhausted;
    }
    let subsets: u32 = 1 << (n - 1);

    for pivot in 0..n {
        for left in 0..subsets {
            for right in 0..subsets {
                if left == 0 && right == 0 {
                    continue;
                }
                let instruction = RewriteInstruction { pivot, left, right };
                let candidate = instruction.apply(generators);
                let score = potential(&candidate, p);
                if score < current {
                    trace!(pivot, left, right, score, current, "improving rewrite found");
                    return SearchOutcome::Improved {
                        instruction,
                        potential: score,
                    };
                }
            }
        }
    }
    SearchOutcome::Exhausted
}

#[cfg(test)]
mod tests {
    use super::{candidate_count, find_improving_rewrite, RewriteInstruction, SearchOutcome};
    use crate::matrix::parse_generators;
    use crate::potential::potential;
    use crate::traits::GroupElement;
    use crate::valuation::prime_from_u64;
    use crate::word::Word;

    #[test]
    fn masks_skip_the_pivot_index() {
        let instruction = RewriteInstruction {
            pivot: 1,
            left: 0b01,
            right: 0b11,
        };
        assert_eq!(instruction.left_indices(3), vec![0]);
        assert_eq!(instruction.right_indices(3), vec![0, 2]);
    }

    #[test]
    fn apply_performs_left_then_right() {
        let words = Word::generators(3);
        let instruction = RewriteInstruction {
            pivot: 0,
            left: 0b11,
            right: 0b10,
        };
        let rewritten = instruction.apply(&words);
        assert_eq!(rewritten[0].to_string(), "x0");
        assert_eq!(rewritten[1].to_string(), "x0 x1");
        assert_eq!(rewritten[2].to_string(), "x0 x2 x0^-1");
    }

    #[test]
    fn apply_matches_on_matrices_and_words() {
        let g = parse_generators(&["4 0; 15/32 1/4", "13/8 3/8; 9/8 7/8", "-1 -6; 3/4 7/2"])
            .unwrap();
        let instruction = RewriteInstruction {
            pivot: 2,
            left: 0b10,
            right: 0b11,
        };
        let matrices = instruction.apply(&g);
        let words = instruction.apply(&Word::generators(3));
        for (m, w) in matrices.iter().zip(&words) {
            assert_eq!(w.evaluate(&g).as_ref(), Some(m));
        }
        assert_eq!(matrices[1], g[2].compose(&g[1]).compose(&g[2].inverse()));
    }

    #[test]
    fn schottky_pair_is_already_minimal() {
        let p = prime_from_u64(2).unwrap();
        let g = parse_generators(&["2 0; 3 1/2", "2 -3/2; 0 1/2"]).unwrap();
        let current = potential(&g, &p);
        assert_eq!(find_improving_rewrite(&g, &p, current), SearchOutcome::Exhausted);
    }

    #[test]
    fn commuting_pair_improves_at_second_pivot() {
        let p = prime_from_u64(2).unwrap();
        let g = parse_generators(&["4 0; 0 1/4", "2 0; 0 1/2"]).unwrap();
        let outcome = find_improving_rewrite(&g, &p, potential(&g, &p));
        assert_eq!(
            outcome,
            SearchOutcome::Improved {
                instruction: RewriteInstruction {
                    pivot: 1,
                    left: 0,
                    right: 1,
                },
                potential: 8,
            }
        );
    }

    #[test]
    fn first_improvement_follows_documented_order() {
        let p = prime_from_u64(2).unwrap();
        let g = parse_generators(&["1/4 -15/4; 0 4", "4 0; -15 1/4", "35/16 -3/16; 27/16 5/16"])
            .unwrap();
        assert_eq!(potential(&g, &p), 66);
        let outcome = find_improving_rewrite(&g, &p, 66);
        assert_eq!(
            outcome,
            SearchOutcome::Improved {
                instruction: RewriteInstruction {
                    pivot: 0,
                    left: 0b11,
                    right: 0b10,
                },
                potential: 62,
            }
        );
    }

    #[test]
    fn single_generator_has_no_candidates() {
        let p = prime_from_u64(2).unwrap();
        let g = parse_generators(&["2 0; 0 1/2"]).unwrap();
        assert_eq!(find_improving_rewrite(&g, &p, 2), SearchOutcome::Exhausted);
        assert_eq!(candidate_count(1), 0);
        assert_eq!(candidate_count(2), 6);
        assert_eq!(candidate_count(3), 45);
    }
}
