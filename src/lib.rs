pub mod config;
pub mod error;
pub mod extension;
pub mod factor;
pub mod montgomery;
pub mod poly;
pub mod prime_field;
pub mod primitive;
pub mod report;

pub use error::FieldError;
pub use extension::{ExtElement, ExtensionField};
pub use factor::{classify, FieldDescriptor};
pub use prime_field::PrimeField;
pub use primitive::{find_all, find_first, run_query, FieldElement, OrderCheck, PrimitiveElementSet};

use std::fmt;

/// Arithmetic context of a finite field GF(q), shared by GF(p) and GF(p^k).
/// The generator search and order checks are written once against this trait.
///
/// Elements are plain values; every operation goes through the context that
/// owns the modulus.
pub trait FiniteField {
    type Elem: Clone + PartialEq + fmt::Debug + fmt::Display;

    /// Number of field elements q.
    fn size(&self) -> u64;

    /// Order of the multiplicative group, q − 1.
    fn group_order(&self) -> u64 {
        self.size() - 1
    }

    fn one(&self) -> Self::Elem;

    fn is_one(&self, a: &Self::Elem) -> bool {
        *a == self.one()
    }

    fn mul(&self, a: &Self::Elem, b: &Self::Elem) -> Self::Elem;

    fn pow(&self, a: &Self::Elem, exp: u64) -> Self::Elem;

    /// Elements worth testing as generators, in output order.
    fn candidates(&self) -> impl Iterator<Item = Self::Elem> + '_;

    /// Human-readable field name, e.g. `GF(3^2)`.
    fn describe(&self) -> String;
}
