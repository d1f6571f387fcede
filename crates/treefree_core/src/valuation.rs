use crate::error::InputError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;

/// A rational prime `p`, fixing the Bruhat-Tits tree the group acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prime(BigInt);

impl Prime {
    pub fn new(value: impl Into<BigInt>) -> Result<Self, InputError> {
        let value = value.into();
        if !is_prime(&value) {
            return Err(InputError::NotPrime {
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &BigInt {
        &self.0
    }
}

impl fmt::Display for Prime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_prime(n: &BigInt) -> bool {
    let two = BigInt::from(2);
    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if n.is_even() {
        return false;
    }
    // Trial division; primes here are tree parameters and stay small.
    let mut d = BigInt::from(3);
    while &d * &d <= *n {
        if n.is_multiple_of(&d) {
            return false;
        }
        d += 2u32;
    }
    true
}

/// Exponent of `p` in the factorisation of a nonzero integer.
fn integer_valuation(n: &BigInt, p: &BigInt) -> i64 {
    let mut rest = n.abs();
    let mut count = 0i64;
    loop {
        let (q, r) = rest.div_rem(p);
        if !r.is_zero() {
            return count;
        }
        rest = q;
        count += 1;
    }
}

/// The p-adic valuation of `x`. `None` stands for `+∞`, the valuation of zero.
pub fn valuation(x: &BigRational, p: &Prime) -> Option<i64> {
    if x.is_zero() {
        return None;
    }
    let numer = integer_valuation(x.numer(), p.value());
    let denom = if x.denom().is_one() {
        0
    } else {
        integer_valuation(x.denom(), p.value())
    };
    Some(numer - denom)
}

/// Convenience for small primes given as machine integers.
pub fn prime_from_u64(value: u64) -> Result<Prime, InputError> {
    Prime::new(BigInt::from(value))
}

#[cfg(test)]
mod tests {
    use super::{prime_from_u64, valuation, Prime};
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn prime_rejects_composites_and_small_values() {
        for bad in [-7i64, 0, 1, 4, 9, 15, 91] {
            assert!(Prime::new(bad).is_err(), "{bad} should be rejected");
        }
        for good in [2i64, 3, 5, 7, 13, 97] {
            assert!(Prime::new(good).is_ok(), "{good} should be accepted");
        }
    }

    #[test]
    fn not_prime_message_names_the_value() {
        let err = prime_from_u64(21).expect_err("21 is composite");
        assert_eq!(err.to_string(), "21 is not a prime.");
    }

    #[test]
    fn valuation_counts_numerator_and_denominator() {
        let p = prime_from_u64(2).expect("prime");
        assert_eq!(valuation(&q(12, 1), &p), Some(2));
        assert_eq!(valuation(&q(5, 2), &p), Some(-1));
        assert_eq!(valuation(&q(-3, 16), &p), Some(-4));
        assert_eq!(valuation(&q(7, 9), &p), Some(0));
    }

    #[test]
    fn valuation_of_zero_is_infinite() {
        let p = prime_from_u64(3).expect("prime");
        assert_eq!(valuation(&q(0, 1), &p), None);
    }

    #[test]
    fn valuation_ignores_other_primes() {
        let p = prime_from_u64(3).expect("prime");
        assert_eq!(valuation(&q(18, 5), &p), Some(2));
        assert_eq!(valuation(&q(10, 27), &p), Some(-3));
        assert_eq!(p.to_string(), "3");
    }
}
