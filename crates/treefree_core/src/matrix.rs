//! Exact 2×2 matrices of determinant one over the rationals.
//!
//! Entries are `BigRational`, so products never lose precision and the
//! p-adic valuation of a trace is always computed on the exact value.

use crate::error::InputError;
use crate::traits::GroupElement;
use anyhow::{anyhow, bail, Context, Result};
use nalgebra::Matrix2;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{pow, One, Zero};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

/// An element of SL(2, Q).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sl2(Matrix2<BigRational>);

impl Sl2 {
    /// Builds `[[a, b], [c, d]]`, rejecting anything whose determinant is not exactly 1.
    pub fn new(
        a: BigRational,
        b: BigRational,
        c: BigRational,
        d: BigRational,
    ) -> Result<Self, InputError> {
        let determinant = &a * &d - &b * &c;
        if !determinant.is_one() {
            return Err(InputError::Determinant {
                determinant: determinant.to_string(),
            });
        }
        Ok(Self(Matrix2::new(a, b, c, d)))
    }

    pub fn identity() -> Self {
        Self(Matrix2::new(
            BigRational::one(),
            BigRational::zero(),
            BigRational::zero(),
            BigRational::one(),
        ))
    }

    pub fn trace(&self) -> BigRational {
        self.0.trace()
    }

    /// Row-major entries `[a, b, c, d]`.
    pub fn entries(&self) -> [&BigRational; 4] {
        [
            &self.0[(0, 0)],
            &self.0[(0, 1)],
            &self.0[(1, 0)],
            &self.0[(1, 1)],
        ]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl GroupElement for Sl2 {
    fn compose(&self, rhs: &Self) -> Self {
        Self(&self.0 * &rhs.0)
    }

    /// The adjugate, which is the inverse because the determinant is 1.
    fn inverse(&self) -> Self {
        let [a, b, c, d] = self.entries();
        Self(Matrix2::new(d.clone(), -b, -c, a.clone()))
    }
}

impl fmt::Display for Sl2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.entries();
        write!(f, "[[{}, {}], [{}, {}]]", a, b, c, d)
    }
}

impl Serialize for Sl2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        for entry in self.entries() {
            seq.serialize_element(&entry.to_string())?;
        }
        seq.end()
    }
}

/// Parses `"3"`, `"-3/2"` or `"0.25"` into an exact rational.
pub fn parse_rational(input: &str) -> Result<BigRational> {
    let text = input.trim();
    if text.is_empty() {
        bail!("Empty rational literal.");
    }

    if let Some((numer, denom)) = text.split_once('/') {
        let numer: BigInt = numer
            .trim()
            .parse()
            .with_context(|| format!("Invalid numerator in \"{}\".", text))?;
        let denom: BigInt = denom
            .trim()
            .parse()
            .with_context(|| format!("Invalid denominator in \"{}\".", text))?;
        if denom.is_zero() {
            bail!("Zero denominator in \"{}\".", text);
        }
        return Ok(BigRational::new(numer, denom));
    }

    if let Some((whole, frac)) = text.split_once('.') {
        // "-0.5" becomes the digit string "-05", which keeps the sign.
        let digits = format!("{}{}", whole.trim(), frac.trim());
        let scaled: BigInt = digits
            .parse()
            .with_context(|| format!("Invalid decimal literal \"{}\".", text))?;
        let scale = pow(BigInt::from(10u32), frac.trim().len());
        return Ok(BigRational::new(scaled, scale));
    }

    let value: BigInt = text
        .parse()
        .with_context(|| format!("Invalid integer literal \"{}\".", text))?;
    Ok(BigRational::from_integer(value))
}

/// Parses four row-major entries, e.g. `"2 0; 3 1/2"` or `"[[2, 0], [3, 1/2]]"`.
pub fn parse_matrix(input: &str) -> Result<Sl2> {
    let cleaned: String = input
        .chars()
        .map(|c| match c {
            '[' | ']' | ',' | ';' => ' ',
            other => other,
        })
        .collect();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.len() != 4 {
        bail!(
            "Expected 4 matrix entries, found {} in \"{}\".",
            tokens.len(),
            input.trim()
        );
    }

    let mut entries = Vec::with_capacity(4);
    for token in tokens {
        entries.push(parse_rational(token)?);
    }
    let [a, b, c, d]: [BigRational; 4] = entries
        .try_into()
        .map_err(|_| anyhow!("Matrix entries could not be collected."))?;
    Ok(Sl2::new(a, b, c, d)?)
}

/// Parses a whole generator tuple, naming the offending generator on failure.
pub fn parse_generators<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Sl2>> {
    inputs
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            parse_matrix(text.as_ref()).with_context(|| format!("Generator {} is invalid.", idx))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_generators, parse_matrix, parse_rational, Sl2};
    use crate::traits::GroupElement;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err:#}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn parse_rational_accepts_integers_fractions_and_decimals() {
        assert_eq!(parse_rational("7").unwrap(), q(7, 1));
        assert_eq!(parse_rational(" -3/2 ").unwrap(), q(-3, 2));
        assert_eq!(parse_rational("6/4").unwrap(), q(3, 2));
        assert_eq!(parse_rational("0.25").unwrap(), q(1, 4));
        assert_eq!(parse_rational("-0.5").unwrap(), q(-1, 2));
    }

    #[test]
    fn parse_rational_rejects_bad_literals() {
        assert_err_contains(parse_rational("1/0"), "Zero denominator");
        assert_err_contains(parse_rational("x"), "Invalid integer literal");
        assert_err_contains(parse_rational(""), "Empty rational");
    }

    #[test]
    fn parse_matrix_accepts_both_layouts() {
        let flat = parse_matrix("2 0; 3 1/2").unwrap();
        let nested = parse_matrix("[[2, 0], [3, 1/2]]").unwrap();
        assert_eq!(flat, nested);
        assert_eq!(flat.to_string(), "[[2, 0], [3, 1/2]]");
    }

    #[test]
    fn parse_matrix_rejects_wrong_shape_and_determinant() {
        assert_err_contains(parse_matrix("1 2 3"), "Expected 4 matrix entries");
        assert_err_contains(parse_matrix("2 0; 0 1"), "Determinant is 2");
    }

    #[test]
    fn parse_generators_names_the_bad_generator() {
        assert_err_contains(
            parse_generators(&["1 0; 0 1", "1 1; 1 1"]),
            "Generator 1 is invalid",
        );
    }

    #[test]
    fn inverse_and_compose_agree_with_identity() {
        let m = parse_matrix("13/8 3/8; 9/8 7/8").unwrap();
        assert!(m.compose(&m.inverse()).is_identity());
        assert!(m.inverse().compose(&m).is_identity());
        assert_eq!(m.trace(), q(5, 2));
        assert!(Sl2::identity().compose(&m) == m);
    }

    #[test]
    fn new_checks_the_determinant_exactly() {
        assert!(Sl2::new(q(2, 1), q(0, 1), q(0, 1), q(1, 2)).is_ok());
        assert!(Sl2::new(q(2, 1), q(0, 1), q(0, 1), q(1, 3)).is_err());
    }
}
