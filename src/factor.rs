//! # Factor — Field Order Classification
//!
//! Decides whether an integer n is the order of a finite field, i.e. a prime
//! or a prime power p^k, and produces the matching [`FieldDescriptor`].
//!
//! ## Algorithm
//!
//! 1. n ≤ 1 is rejected outright.
//! 2. A GMP Miller–Rabin test accepts primes as GF(n).
//! 3. A composite that is not a perfect power cannot be p^k and is rejected
//!    without any trial division.
//! 4. Otherwise primes q = 2, 3, 5, … are tried in ascending order while
//!    q² ≤ n. The first q dividing n is the only possible base: n is
//!    stripped of every factor q and accepted iff the quotient is 1.
//! 5. Perfect powers whose smallest prime factor lies beyond the trial
//!    window are resolved by integer roots, largest exponent first. The
//!    first exact root belongs to the maximal exponent, so it is p itself
//!    exactly when n is a prime power.
//!
//! Also provides the small-integer helpers the generator search needs on the
//! multiplicative group order: factorization and Euler's totient.

use rug::integer::IsPrime;
use rug::ops::Pow;
use rug::Integer;

use crate::error::FieldError;

/// Largest prime tried by ascending trial division before falling back to
/// root extraction.
pub const TRIAL_DIVISION_LIMIT: u32 = 1 << 16;

/// GF(p^k): a prime characteristic and a positive extension degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    characteristic: Integer,
    degree: u32,
}

impl FieldDescriptor {
    pub(crate) fn new(characteristic: Integer, degree: u32) -> Self {
        debug_assert!(characteristic > 1 && degree >= 1);
        FieldDescriptor {
            characteristic,
            degree,
        }
    }

    pub fn characteristic(&self) -> &Integer {
        &self.characteristic
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn is_prime_field(&self) -> bool {
        self.degree == 1
    }

    /// Number of field elements, p^k.
    pub fn order(&self) -> Integer {
        self.characteristic.clone().pow(self.degree)
    }

    /// Narrow the field to machine words, refusing orders above `limit`.
    ///
    /// Returns `(p, p^k)`.
    pub fn bounded(&self, limit: u64) -> Result<(u64, u64), FieldError> {
        let order = self.order();
        match order.to_u64() {
            Some(q) if q <= limit => {
                // p ≤ p^k, so the characteristic fits as well.
                let p = self.characteristic.to_u64().unwrap_or(q);
                Ok((p, q))
            }
            _ => Err(FieldError::FieldTooLarge { order, limit }),
        }
    }
}

impl std::fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.degree == 1 {
            write!(f, "GF({})", self.characteristic)
        } else {
            write!(f, "GF({}^{})", self.characteristic, self.degree)
        }
    }
}

/// Classify `n` as GF(p) or GF(p^k).
///
/// `mr_rounds` is the number of Miller–Rabin rounds used for every primality
/// decision (GMP is deterministic below 2^64 regardless).
pub fn classify(n: &Integer, mr_rounds: u32) -> Result<FieldDescriptor, FieldError> {
    if *n <= 1 {
        return Err(FieldError::InvalidInput {
            input: n.to_string(),
        });
    }
    if n.is_probably_prime(mr_rounds) != IsPrime::No {
        return Ok(FieldDescriptor::new(n.clone(), 1));
    }
    if !n.is_perfect_power() {
        return Err(FieldError::NotAFieldOrder { n: n.clone() });
    }

    let mut q = Integer::from(2u32);
    while q <= TRIAL_DIVISION_LIMIT && Integer::from(&q * &q) <= *n {
        if n.is_divisible(&q) {
            let mut rest = n.clone();
            let exponent = rest.remove_factor_mut(&q);
            if rest == 1 {
                return Ok(FieldDescriptor::new(q, exponent));
            }
            return Err(FieldError::NotAFieldOrder { n: n.clone() });
        }
        q.next_prime_mut();
    }

    classify_by_root(n, mr_rounds)
}

fn classify_by_root(n: &Integer, mr_rounds: u32) -> Result<FieldDescriptor, FieldError> {
    for k in (2..=n.significant_bits()).rev() {
        let root = Integer::from(n.root_ref(k));
        if root.clone().pow(k) != *n {
            continue;
        }
        if root.is_probably_prime(mr_rounds) != IsPrime::No {
            return Ok(FieldDescriptor::new(root, k));
        }
        break;
    }
    Err(FieldError::NotAFieldOrder { n: n.clone() })
}

/// Trial-division factorization into (prime, exponent) pairs, ascending.
pub fn prime_factors(mut n: u64) -> Vec<(u64, u32)> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }
    let mut twos = 0u32;
    while n.is_multiple_of(2) {
        n /= 2;
        twos += 1;
    }
    if twos > 0 {
        factors.push((2, twos));
    }
    let mut d = 3u64;
    while d <= n / d {
        if n.is_multiple_of(d) {
            let mut exp = 0u32;
            while n.is_multiple_of(d) {
                n /= d;
                exp += 1;
            }
            factors.push((d, exp));
        }
        d += 2;
    }
    if n > 1 {
        factors.push((n, 1));
    }
    factors
}

/// Euler's totient φ(n). φ(q − 1) is the number of generators of GF(q)*.
pub fn euler_phi(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    prime_factors(n)
        .into_iter()
        .map(|(p, e)| (p - 1) * p.pow(e - 1))
        .product()
}
