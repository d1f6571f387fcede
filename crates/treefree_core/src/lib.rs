//! The `treefree_core` crate decides whether a finitely generated subgroup of
//! SL(2, Q) acts discretely and freely on the Bruhat-Tits tree of a prime `p`.
//! All arithmetic is exact: translation lengths come from p-adic valuations of
//! traces of `BigRational` matrices.
//!
//! Key components:
//! - **Valuation / Translation**: `v_p` on rationals and the translation length of a matrix.
//! - **Potential**: the integer score every accepted rewrite strictly lowers.
//! - **Search**: deterministic product-replacement search over Nielsen rewrites.
//! - **Reduction**: the resumable loop that drives the search to a local minimum.
//! - **Ping-Pong**: pair and triple conditions certifying the reduced tuple.
//! - **Word**: persistent words recording every generator in terms of the input.
pub mod error;
pub mod matrix;
pub mod pingpong;
pub mod potential;
pub mod reduction;
pub mod search;
pub mod traits;
pub mod translation;
pub mod valuation;
pub mod word;

pub use error::InputError;
pub use matrix::{parse_generators, parse_matrix, Sl2};
pub use reduction::{decide_discrete_free, ReductionRunner, ReductionSettings, Verdict};
pub use valuation::Prime;
