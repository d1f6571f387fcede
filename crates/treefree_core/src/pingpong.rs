//! Ping-Pong certification of a reduced generator tuple.
//!
//! Two conditions are checked, pairs first and then unordered triples.
//! Passing both certifies that the tuple generates a free group acting
//! discretely on the tree. Failing either only means this tuple does not
//! witness it.

use crate::matrix::Sl2;
use crate::traits::GroupElement;
use crate::translation::translation_length;
use crate::valuation::Prime;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Exponent `±1` applied to a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => write!(f, "+1"),
            Sign::Minus => write!(f, "-1"),
        }
    }
}

/// Enumeration order for signed triple products; the first minimum wins.
const SIGN_PATTERNS: [[Sign; 3]; 8] = [
    [Sign::Plus, Sign::Plus, Sign::Plus],
    [Sign::Plus, Sign::Plus, Sign::Minus],
    [Sign::Plus, Sign::Minus, Sign::Plus],
    [Sign::Plus, Sign::Minus, Sign::Minus],
    [Sign::Minus, Sign::Plus, Sign::Plus],
    [Sign::Minus, Sign::Plus, Sign::Minus],
    [Sign::Minus, Sign::Minus, Sign::Plus],
    [Sign::Minus, Sign::Minus, Sign::Minus],
];

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum PingPongFailure {
    /// `g_index · g_partner^sign` is too short compared with the two lengths.
    #[error(
        "pair ({index}, {partner}) fails: product with sign {sign} has length {minimum} <= {bound}"
    )]
    Pair {
        index: usize,
        partner: usize,
        sign: Sign,
        minimum: u64,
        bound: u64,
    },
    #[error("triple {indices:?} has an elliptic signed product with signs {signs:?}")]
    EllipticTriple {
        indices: [usize; 3],
        signs: [Sign; 3],
    },
    #[error("triple {indices:?} fails: signed product length {minimum} <= {bound}")]
    Triple {
        indices: [usize; 3],
        signs: [Sign; 3],
        minimum: u64,
        bound: u64,
    },
}

struct Signed<'a> {
    generators: &'a [Sl2],
    inverses: Vec<Sl2>,
    lengths: Vec<u64>,
}

impl<'a> Signed<'a> {
    fn new(generators: &'a [Sl2], p: &Prime) -> Self {
        Self {
            generators,
            inverses: generators.iter().map(GroupElement::inverse).collect(),
            lengths: generators.iter().map(|g| translation_length(g, p)).collect(),
        }
    }

    fn get(&self, index: usize, sign: Sign) -> &Sl2 {
        match sign {
            Sign::Plus => &self.generators[index],
            Sign::Minus => &self.inverses[index],
        }
    }
}

/// Pairwise condition over every ordered pair `(i, j)`, `i != j`.
pub fn check_pairs(generators: &[Sl2], p: &Prime) -> Result<(), PingPongFailure> {
    let signed = Signed::new(generators, p);
    let n = generators.len();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let li = signed.lengths[i];
            let lj = signed.lengths[j];
            let product = translation_length(&generators[i].compose(&generators[j]), p);
            let quotient = translation_length(&generators[i].compose(&signed.inverses[j]), p);
            let (minimum, sign) = if quotient < product {
                (quotient, Sign::Minus)
            } else {
                (product, Sign::Plus)
            };
            let bound = li.abs_diff(lj);
            trace!(i, j, minimum, bound, "pair check");

            if minimum <= bound {
                let (index, partner) = if li >= lj { (i, j) } else { (j, i) };
                return Err(PingPongFailure::Pair {
                    index,
                    partner,
                    sign,
                    minimum,
                    bound,
                });
            }
        }
    }
    Ok(())
}

/// Triple condition over every unordered triple `i < j < k`.
pub fn check_triples(generators: &[Sl2], p: &Prime) -> Result<(), PingPongFailure> {
    let signed = Signed::new(generators, p);
    let n = generators.len();

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                check_triple(&signed, [i, j, k], p)?;
            }
        }
    }
    Ok(())
}

fn check_triple(signed: &Signed<'_>, indices: [usize; 3], p: &Prime) -> Result<(), PingPongFailure> {
    let [i, j, k] = indices;
    let mut best: Option<(u64, [Sign; 3])> = None;
    for signs in SIGN_PATTERNS {
        let abc = signed
            .get(i, signs[0])
            .compose(signed.get(j, signs[1]))
            .compose(signed.get(k, signs[2]));
        let length = translation_length(&abc, p);
        if best.map_or(true, |(current, _)| length < current) {
            best = Some((length, signs));
        }
    }
    let Some((minimum, signs)) = best else {
        return Ok(());
    };

    if minimum == 0 {
        return Err(PingPongFailure::EllipticTriple { indices, signs });
    }

    let a = signed.get(i, signs[0]);
    let b = signed.get(j, signs[1]);
    let c = signed.get(k, signs[2]);
    // Inverting does not change a translation length.
    let (la, lb, lc) = (signed.lengths[i], signed.lengths[j], signed.lengths[k]);
    let bound = [
        translation_length(&a.compose(b), p).abs_diff(lc),
        translation_length(&a.compose(c), p).abs_diff(lb),
        translation_length(&b.compose(c), p).abs_diff(la),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);
    trace!(i, j, k, minimum, bound, "triple check");

    if minimum <= bound {
        return Err(PingPongFailure::Triple {
            indices,
            signs,
            minimum,
            bound,
        });
    }
    Ok(())
}

/// Runs both checks. Tuples of fewer than two generators pass trivially.
pub fn verify_ping_pong(generators: &[Sl2], p: &Prime) -> Result<(), PingPongFailure> {
    if generators.len() < 2 {
        return Ok(());
    }
    check_pairs(generators, p)?;
    check_triples(generators, p)
}
