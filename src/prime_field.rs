//! # Prime Field — GF(p) Arithmetic Context
//!
//! A `PrimeField` owns the modulus p for one query. Elements are plain `u64`
//! residues in [0, p); every operation goes through the context, so two
//! queries never share modular state.
//!
//! Odd p uses Montgomery exponentiation (see [`crate::montgomery`]); p = 2
//! and all additive operations use u128 intermediates. The same context also
//! supplies the coefficient arithmetic of GF(p^k).

use rug::integer::IsPrime;
use rug::Integer;

use crate::error::FieldError;
use crate::montgomery::Montgomery;
use crate::FiniteField;

/// Arithmetic context for GF(p).
#[derive(Clone, Debug)]
pub struct PrimeField {
    p: u64,
    mont: Option<Montgomery>,
}

impl PrimeField {
    /// Build GF(p). Fails unless p is prime.
    pub fn new(p: u64) -> Result<Self, FieldError> {
        if p < 2 || Integer::from(p).is_probably_prime(30) == IsPrime::No {
            return Err(FieldError::construction(format!(
                "{} is not prime, Z/{}Z is not a field",
                p, p
            )));
        }
        Ok(PrimeField {
            p,
            mont: Montgomery::new(p),
        })
    }

    pub fn characteristic(&self) -> u64 {
        self.p
    }

    #[inline]
    pub fn reduce(&self, a: u64) -> u64 {
        a % self.p
    }

    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        ((a as u128 + b as u128) % self.p as u128) as u64
    }

    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        self.add(a, self.p - b % self.p)
    }

    #[inline]
    pub fn neg(&self, a: u64) -> u64 {
        self.sub(0, a)
    }

    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        (a as u128 * b as u128 % self.p as u128) as u64
    }

    /// a^exp mod p.
    pub fn pow(&self, a: u64, mut exp: u64) -> u64 {
        if let Some(ctx) = &self.mont {
            return ctx.from_mont(ctx.pow(ctx.to_mont(a), exp));
        }
        let mut result = 1 % self.p;
        let mut base = self.reduce(a);
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        result
    }

    /// Inverse via Fermat's little theorem, a^(p-2). `None` for a ≡ 0.
    pub fn inv(&self, a: u64) -> Option<u64> {
        let a = self.reduce(a);
        if a == 0 {
            return None;
        }
        Some(self.pow(a, self.p - 2))
    }
}

impl FiniteField for PrimeField {
    type Elem = u64;

    fn size(&self) -> u64 {
        self.p
    }

    fn one(&self) -> u64 {
        1
    }

    fn mul(&self, a: &u64, b: &u64) -> u64 {
        PrimeField::mul(self, *a, *b)
    }

    fn pow(&self, a: &u64, exp: u64) -> u64 {
        PrimeField::pow(self, *a, exp)
    }

    /// Residues 2..p in ascending order. 1 only generates GF(2)*, which the
    /// search handles before asking for candidates.
    fn candidates(&self) -> impl Iterator<Item = u64> + '_ {
        2..self.p
    }

    fn describe(&self) -> String {
        format!("GF({})", self.p)
    }
}
