//! # Extension — GF(p^k) Arithmetic Context
//!
//! GF(p^k) is GF(p)[x] / (f) for a monic irreducible f of degree k. The
//! `ExtensionField` context owns both the base field and f for the lifetime
//! of one query; elements are reduced polynomials of degree < k and only
//! meet each other through the context.
//!
//! The field is enumerated deterministically: element number i has the
//! base-p digits of i as coefficients, constant term first, for i in
//! 0..p^k. Zero (i = 0) is part of the enumeration; the generator search
//! drops it together with the other constants.

use std::fmt;

use tracing::debug;

use crate::error::FieldError;
use crate::poly::{find_irreducible, is_irreducible, Poly};
use crate::prime_field::PrimeField;
use crate::FiniteField;

/// Element of GF(p^k): a polynomial of degree < k over GF(p).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtElement(Poly);

impl ExtElement {
    pub fn poly(&self) -> &Poly {
        &self.0
    }

    /// Polynomial degree; `None` for zero. Degree 0 means a base-field constant.
    pub fn degree(&self) -> Option<usize> {
        self.0.degree()
    }

    /// Coefficients padded to `k`, constant term first.
    pub fn coefficients(&self, k: u32) -> Vec<u64> {
        (0..k as usize).map(|i| self.0.coeff(i)).collect()
    }
}

impl fmt::Display for ExtElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Arithmetic context for GF(p^k).
#[derive(Clone, Debug)]
pub struct ExtensionField {
    base: PrimeField,
    modulus: Poly,
    degree: u32,
    size: u64,
}

impl ExtensionField {
    /// Build GF(p^k) on the first monic irreducible polynomial of degree k.
    pub fn new(p: u64, k: u32) -> Result<Self, FieldError> {
        let base = PrimeField::new(p)?;
        let size = field_size(p, k)?;
        let modulus = find_irreducible(&base, k)?;
        debug!(field = %format!("GF({}^{})", p, k), modulus = %modulus, "modulus selected");
        Ok(ExtensionField {
            base,
            modulus,
            degree: k,
            size,
        })
    }

    /// Build GF(p^k) on a caller-supplied modulus, coefficients constant term
    /// first. The modulus must be monic of degree k and irreducible.
    pub fn with_modulus(p: u64, k: u32, coeffs: &[u64]) -> Result<Self, FieldError> {
        let base = PrimeField::new(p)?;
        let size = field_size(p, k)?;
        let modulus = Poly::from_coeffs(&base, coeffs.iter().copied());
        if modulus.degree() != Some(k as usize) {
            return Err(FieldError::construction(format!(
                "modulus {} has degree {}, GF({}^{}) needs degree {}",
                modulus,
                modulus.degree().map_or(-1, |d| d as i64),
                p,
                k,
                k
            )));
        }
        if !modulus.is_monic() {
            return Err(FieldError::construction(format!(
                "modulus {} is not monic",
                modulus
            )));
        }
        if !is_irreducible(&modulus, &base) {
            return Err(FieldError::construction(format!(
                "{} is reducible over GF({})",
                modulus, p
            )));
        }
        Ok(ExtensionField {
            base,
            modulus,
            degree: k,
            size,
        })
    }

    pub fn base(&self) -> &PrimeField {
        &self.base
    }

    pub fn modulus(&self) -> &Poly {
        &self.modulus
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Element with the given coefficients (constant term first), reduced mod f.
    pub fn element(&self, coeffs: &[u64]) -> ExtElement {
        let poly = Poly::from_coeffs(&self.base, coeffs.iter().copied());
        ExtElement(poly.rem(&self.modulus, &self.base))
    }

    /// Element number `index` of the enumeration order.
    fn element_at(&self, mut index: u64) -> ExtElement {
        let p = self.base.characteristic();
        let digits = (0..self.degree).map(|_| {
            let d = index % p;
            index /= p;
            d
        });
        ExtElement(Poly::from_coeffs(&self.base, digits.collect::<Vec<_>>()))
    }

    /// All p^k elements, zero first.
    pub fn elements(&self) -> impl Iterator<Item = ExtElement> + '_ {
        (0..self.size).map(move |i| self.element_at(i))
    }

    pub fn add(&self, a: &ExtElement, b: &ExtElement) -> ExtElement {
        ExtElement(a.0.add(&b.0, &self.base))
    }

    pub fn inv(&self, a: &ExtElement) -> Option<ExtElement> {
        if a.0.is_zero() {
            return None;
        }
        Some(FiniteField::pow(self, a, self.size - 2))
    }
}

fn field_size(p: u64, k: u32) -> Result<u64, FieldError> {
    if k == 0 {
        return Err(FieldError::construction("extension degree must be at least 1"));
    }
    p.checked_pow(k)
        .ok_or_else(|| FieldError::construction(format!("{}^{} does not fit in 64 bits", p, k)))
}

impl FiniteField for ExtensionField {
    type Elem = ExtElement;

    fn size(&self) -> u64 {
        self.size
    }

    fn one(&self) -> ExtElement {
        ExtElement(Poly::one())
    }

    fn mul(&self, a: &ExtElement, b: &ExtElement) -> ExtElement {
        ExtElement(a.0.mul_mod(&b.0, &self.modulus, &self.base))
    }

    fn pow(&self, a: &ExtElement, exp: u64) -> ExtElement {
        ExtElement(a.0.pow_mod(exp, &self.modulus, &self.base))
    }

    /// Non-constant elements in enumeration order. Constants live in GF(p)
    /// and cannot generate GF(p^k)* for k > 1.
    fn candidates(&self) -> impl Iterator<Item = ExtElement> + '_ {
        self.elements().filter(|e| e.degree().is_some_and(|d| d > 0))
    }

    fn describe(&self) -> String {
        format!("GF({}^{})", self.base.characteristic(), self.degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn gf9_uses_x_squared_plus_one() {
        let f = ExtensionField::new(3, 2).unwrap();
        assert_eq!(f.modulus().to_string(), "x^2 + 1");
        assert_eq!(f.size(), 9);
        assert_eq!(f.group_order(), 8);
        assert_eq!(f.describe(), "GF(3^2)");
    }

    #[test]
    fn enumeration_covers_field_once_zero_first() {
        let f = ExtensionField::new(3, 2).unwrap();
        let all: Vec<ExtElement> = f.elements().collect();
        assert_eq!(all.len(), 9);
        assert!(all[0].poly().is_zero());
        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(unique.len(), 9);
        assert_eq!(all[1].to_string(), "1");
        assert_eq!(all[3].to_string(), "x");
        assert_eq!(all[5].to_string(), "x + 2");
    }

    #[test]
    fn candidates_exclude_constants() {
        let f = ExtensionField::new(3, 2).unwrap();
        let cands: Vec<ExtElement> = f.candidates().collect();
        assert_eq!(cands.len(), 6);
        assert!(cands.iter().all(|e| e.degree() == Some(1)));
    }

    #[test]
    fn x_squared_is_minus_one_in_gf9() {
        let f = ExtensionField::new(3, 2).unwrap();
        let x = f.element(&[0, 1]);
        assert_eq!(f.mul(&x, &x), f.element(&[2]));
    }

    #[test]
    fn element_reduces_mod_modulus() {
        let f = ExtensionField::new(3, 2).unwrap();
        // x^2 + x ≡ x - 1 ≡ x + 2
        assert_eq!(f.element(&[0, 1, 1]).to_string(), "x + 2");
        assert_eq!(f.element(&[0, 1, 1]).coefficients(2), vec![2, 1]);
    }

    #[test]
    fn every_nonzero_element_is_invertible() {
        let f = ExtensionField::new(2, 4).unwrap();
        for a in f.elements().skip(1) {
            let inv = f.inv(&a).unwrap();
            assert!(f.mul(&a, &inv).poly().is_one(), "a = {}", a);
        }
        assert!(f.inv(&f.element(&[])).is_none());
    }

    #[test]
    fn add_is_coefficientwise() {
        let f = ExtensionField::new(5, 2).unwrap();
        let a = f.element(&[3, 4]);
        let b = f.element(&[4, 1]);
        assert_eq!(f.add(&a, &b), f.element(&[2, 0]));
    }

    #[test]
    fn user_modulus_accepted_when_irreducible() {
        // x^2 + x + 2 is irreducible over GF(3)
        let f = ExtensionField::with_modulus(3, 2, &[2, 1, 1]).unwrap();
        assert_eq!(f.modulus().to_string(), "x^2 + x + 2");
    }

    #[test]
    fn user_modulus_rejected_when_reducible() {
        let err = ExtensionField::with_modulus(5, 2, &[1, 0, 1]).unwrap_err();
        assert_eq!(
            err,
            FieldError::construction("x^2 + 1 is reducible over GF(5)")
        );
    }

    #[test]
    fn user_modulus_rejected_on_wrong_degree_or_not_monic() {
        assert!(matches!(
            ExtensionField::with_modulus(3, 3, &[1, 0, 1]),
            Err(FieldError::FieldConstruction { .. })
        ));
        assert!(matches!(
            ExtensionField::with_modulus(3, 2, &[1, 0, 2]),
            Err(FieldError::FieldConstruction { .. })
        ));
    }

    #[test]
    fn composite_characteristic_is_rejected() {
        assert!(matches!(
            ExtensionField::new(6, 2),
            Err(FieldError::FieldConstruction { .. })
        ));
    }
}
