//! # Poly — Polynomials over GF(p) and Irreducible Moduli
//!
//! Dense polynomials with coefficients in GF(p), stored constant term first
//! and kept normalized (no trailing zero coefficients; the zero polynomial
//! has no coefficients). All operations borrow the [`PrimeField`] that owns
//! the characteristic.
//!
//! ## Irreducibility: Rabin's Test
//!
//! A monic f of degree k over GF(p) is irreducible iff
//!
//! - x^(p^k) ≡ x (mod f), and
//! - gcd(x^(p^(k/q)) − x, f) = 1 for every prime q dividing k.
//!
//! The powers x^(p^j) are built by repeated p-th powering (Frobenius), so
//! no exponent ever exceeds p.
//!
//! ## Modulus Search
//!
//! [`find_irreducible`] walks the monic degree-k polynomials in a fixed
//! order, reading the lower coefficients as base-p digits (constant term
//! least significant), and returns the first one that passes Rabin's test.
//! The choice is deterministic: GF(9) is always built on x² + 1 and GF(8)
//! on x³ + x + 1.
//!
//! Reference: M. O. Rabin, "Probabilistic Algorithms in Finite Fields",
//! SIAM J. Comput. 9(2):273–280, 1980.

use std::fmt;

use crate::error::FieldError;
use crate::factor::prime_factors;
use crate::prime_field::PrimeField;

/// Polynomial over GF(p), constant term first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Poly {
    coeffs: Vec<u64>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly { coeffs: Vec::new() }
    }

    pub fn one() -> Self {
        Poly { coeffs: vec![1] }
    }

    /// The indeterminate x.
    pub fn x() -> Self {
        Poly { coeffs: vec![0, 1] }
    }

    /// Reduce every coefficient mod p and drop trailing zeros.
    pub fn from_coeffs(field: &PrimeField, coeffs: impl IntoIterator<Item = u64>) -> Self {
        let mut poly = Poly {
            coeffs: coeffs.into_iter().map(|c| field.reduce(c)).collect(),
        };
        poly.normalize();
        poly
    }

    fn normalize(&mut self) {
        while self.coeffs.last() == Some(&0) {
            self.coeffs.pop();
        }
    }

    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Coefficient of x^i (zero past the degree).
    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.coeffs == [1]
    }

    pub fn leading(&self) -> u64 {
        self.coeffs.last().copied().unwrap_or(0)
    }

    pub fn is_monic(&self) -> bool {
        self.leading() == 1
    }

    pub fn add(&self, other: &Poly, field: &PrimeField) -> Poly {
        let len = self.coeffs.len().max(other.coeffs.len());
        Poly::from_coeffs(
            field,
            (0..len).map(|i| field.add(self.coeff(i), other.coeff(i))),
        )
    }

    pub fn sub(&self, other: &Poly, field: &PrimeField) -> Poly {
        let len = self.coeffs.len().max(other.coeffs.len());
        Poly::from_coeffs(
            field,
            (0..len).map(|i| field.sub(self.coeff(i), other.coeff(i))),
        )
    }

    pub fn scale(&self, c: u64, field: &PrimeField) -> Poly {
        Poly::from_coeffs(field, self.coeffs.iter().map(|&a| field.mul(a, c)))
    }

    pub fn mul(&self, other: &Poly, field: &PrimeField) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut out = vec![0u64; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                out[i + j] = field.add(out[i + j], field.mul(a, b));
            }
        }
        let mut poly = Poly { coeffs: out };
        poly.normalize();
        poly
    }

    /// Remainder of division by a nonzero `divisor`.
    pub fn rem(&self, divisor: &Poly, field: &PrimeField) -> Poly {
        self.div_rem(divisor, field).1
    }

    /// Quotient and remainder. Panics on a zero divisor.
    pub fn div_rem(&self, divisor: &Poly, field: &PrimeField) -> (Poly, Poly) {
        let d = divisor
            .degree()
            .expect("polynomial division by zero");
        let lead_inv = field
            .inv(divisor.leading())
            .expect("normalized polynomial has a nonzero leading coefficient");

        let mut rem = self.coeffs.clone();
        if rem.len() <= d {
            return (Poly::zero(), self.clone());
        }
        let mut quot = vec![0u64; rem.len() - d];
        for i in (d..rem.len()).rev() {
            let c = field.mul(rem[i], lead_inv);
            if c == 0 {
                continue;
            }
            quot[i - d] = c;
            for (j, &b) in divisor.coeffs.iter().enumerate() {
                rem[i - d + j] = field.sub(rem[i - d + j], field.mul(c, b));
            }
        }
        rem.truncate(d);
        let mut q = Poly { coeffs: quot };
        let mut r = Poly { coeffs: rem };
        q.normalize();
        r.normalize();
        (q, r)
    }

    /// Scale to a monic polynomial. The zero polynomial stays zero.
    pub fn monic(&self, field: &PrimeField) -> Poly {
        match field.inv(self.leading()) {
            Some(inv) => self.scale(inv, field),
            None => Poly::zero(),
        }
    }

    /// Monic greatest common divisor.
    pub fn gcd(&self, other: &Poly, field: &PrimeField) -> Poly {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = a.rem(&b, field);
            a = b;
            b = r;
        }
        a.monic(field)
    }

    /// (self · other) mod `modulus`.
    pub fn mul_mod(&self, other: &Poly, modulus: &Poly, field: &PrimeField) -> Poly {
        self.mul(other, field).rem(modulus, field)
    }

    /// self^exp mod `modulus`, square-and-multiply.
    pub fn pow_mod(&self, mut exp: u64, modulus: &Poly, field: &PrimeField) -> Poly {
        let mut result = Poly::one().rem(modulus, field);
        let mut base = self.rem(modulus, field);
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul_mod(&base, modulus, field);
            }
            exp >>= 1;
            if exp > 0 {
                base = base.mul_mod(&base, modulus, field);
            }
        }
        result
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, &c) in self.coeffs.iter().enumerate().rev() {
            if c == 0 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match (i, c) {
                (0, c) => write!(f, "{}", c)?,
                (1, 1) => write!(f, "x")?,
                (1, c) => write!(f, "{}x", c)?,
                (i, 1) => write!(f, "x^{}", i)?,
                (i, c) => write!(f, "{}x^{}", c, i)?,
            }
        }
        Ok(())
    }
}

/// Rabin's irreducibility test for a monic polynomial of degree ≥ 1.
pub fn is_irreducible(f: &Poly, field: &PrimeField) -> bool {
    let k = match f.degree() {
        Some(k) if k >= 1 => k,
        _ => return false,
    };
    if !f.is_monic() {
        return false;
    }
    if k == 1 {
        return true;
    }

    let p = field.characteristic();
    let x = Poly::x().rem(f, field);

    // frobenius[j] = x^(p^j) mod f for j = 0..=k
    let mut frobenius = Vec::with_capacity(k + 1);
    frobenius.push(x.clone());
    for j in 1..=k {
        let next = frobenius[j - 1].pow_mod(p, f, field);
        frobenius.push(next);
    }

    if frobenius[k] != x {
        return false;
    }
    prime_factors(k as u64).into_iter().all(|(q, _)| {
        let h = frobenius[k / q as usize].sub(&x, field);
        h.gcd(f, field).is_one()
    })
}

/// First monic irreducible polynomial of degree `k` over `field`.
pub fn find_irreducible(field: &PrimeField, k: u32) -> Result<Poly, FieldError> {
    let p = field.characteristic();
    if k == 0 {
        return Err(FieldError::construction("extension degree must be at least 1"));
    }
    let count = p.checked_pow(k).ok_or_else(|| {
        FieldError::construction(format!("{}^{} candidate moduli overflow u64", p, k))
    })?;

    for index in 0..count {
        let mut digits = Vec::with_capacity(k as usize + 1);
        let mut rest = index;
        for _ in 0..k {
            digits.push(rest % p);
            rest /= p;
        }
        // Divisible by x.
        if k > 1 && digits[0] == 0 {
            continue;
        }
        digits.push(1);
        let candidate = Poly::from_coeffs(field, digits);
        if is_irreducible(&candidate, field) {
            return Ok(candidate);
        }
    }
    Err(FieldError::construction(format!(
        "no monic irreducible polynomial of degree {} over GF({})",
        k, p
    )))
}
