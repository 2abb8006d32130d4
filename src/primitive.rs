//! # Primitive — Generator Search over GF(p) and GF(p^k)
//!
//! An element α of GF(q) is primitive when its multiplicative order is the
//! full group order n = q − 1, i.e. its powers run through every nonzero
//! element before returning to 1.
//!
//! ## Order Checks
//!
//! Every candidate first passes the Fermat identity α^n = 1. In a genuine
//! field this never fails for a nonzero α, so it is treated as a consistency
//! check on the arithmetic context: a failure aborts the query with
//! [`FieldError::FieldConstruction`] rather than silently dropping α.
//!
//! - [`OrderCheck::Exhaustive`]: walk α, α², …, α^(n−1) and reject on the
//!   first power equal to 1. O(n) multiplications per candidate, O(q²)
//!   per field.
//! - [`OrderCheck::Factored`] (default): reject iff α^(n/r) = 1 for some prime
//!   r | n. O(ω(n) · log n) multiplications per candidate.
//!
//! Both accept exactly the same candidates: the order of α divides n, and a
//! proper divisor of n always divides some n/r.
//!
//! ## Query State Machine
//!
//! [`run_query`] drives one raw integer through
//! `Init → ClassifyOrder → {PrimeFieldSearch | ExtensionFieldSearch} → Done`,
//! or into `Failed` when classification, the size guard, field construction
//! or a consistency check fails. Each query builds its own field context.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, trace, warn};

use crate::config::SearchConfig;
use crate::error::FieldError;
use crate::extension::{ExtElement, ExtensionField};
use crate::factor::{classify, euler_phi, prime_factors, FieldDescriptor};
use crate::poly::Poly;
use crate::prime_field::PrimeField;
use crate::FiniteField;

/// How a candidate's multiplicative order is verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderCheck {
    /// Only the exponents n/r for primes r | n.
    #[default]
    Factored,
    /// Every exponent 1..n, stopping at the first power equal to 1.
    Exhaustive,
}

impl fmt::Display for OrderCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderCheck::Factored => write!(f, "factored"),
            OrderCheck::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

impl FromStr for OrderCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "factored" => Ok(OrderCheck::Factored),
            "exhaustive" => Ok(OrderCheck::Exhaustive),
            other => Err(format!(
                "unknown order check {:?} (expected \"factored\" or \"exhaustive\")",
                other
            )),
        }
    }
}

/// Generator search over one field context.
pub struct Finder<'a, F: FiniteField> {
    field: &'a F,
    check: OrderCheck,
    group_order: u64,
    /// Distinct primes dividing the group order.
    primes: Vec<u64>,
}

impl<'a, F: FiniteField> Finder<'a, F> {
    pub fn new(field: &'a F, check: OrderCheck) -> Self {
        let group_order = field.group_order();
        let primes = prime_factors(group_order)
            .into_iter()
            .map(|(r, _)| r)
            .collect();
        Finder {
            field,
            check,
            group_order,
            primes,
        }
    }

    fn fermat(&self, alpha: &F::Elem) -> Result<(), FieldError> {
        if self.field.is_one(&self.field.pow(alpha, self.group_order)) {
            return Ok(());
        }
        Err(FieldError::construction(format!(
            "({})^{} != 1 in {}, the context is not a field",
            alpha,
            self.group_order,
            self.field.describe()
        )))
    }

    /// Whether `alpha` generates the multiplicative group.
    pub fn is_primitive(&self, alpha: &F::Elem) -> Result<bool, FieldError> {
        self.fermat(alpha)?;
        match self.check {
            OrderCheck::Exhaustive => {
                let mut power = alpha.clone();
                for exponent in 1..self.group_order {
                    if self.field.is_one(&power) {
                        trace!(candidate = %alpha, exponent, "order below group order");
                        return Ok(false);
                    }
                    power = self.field.mul(&power, alpha);
                }
                Ok(true)
            }
            OrderCheck::Factored => {
                for &r in &self.primes {
                    let exponent = self.group_order / r;
                    if self.field.is_one(&self.field.pow(alpha, exponent)) {
                        trace!(candidate = %alpha, exponent, "order below group order");
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Every primitive element, in candidate order.
    pub fn find_all(&self) -> Result<Vec<F::Elem>, FieldError> {
        // GF(2): the trivial group {1} is generated by 1.
        if self.group_order == 1 {
            return Ok(vec![self.field.one()]);
        }
        let mut found = Vec::new();
        for alpha in self.field.candidates() {
            if self.is_primitive(&alpha)? {
                found.push(alpha);
            }
        }
        let expected = euler_phi(self.group_order);
        if found.len() as u64 != expected {
            warn!(
                field = %self.field.describe(),
                found = found.len(),
                expected,
                "generator count differs from phi(q - 1)"
            );
        }
        Ok(found)
    }

    /// The first primitive element in candidate order.
    pub fn find_first(&self) -> Result<Option<F::Elem>, FieldError> {
        if self.group_order == 1 {
            return Ok(Some(self.field.one()));
        }
        for alpha in self.field.candidates() {
            if self.is_primitive(&alpha)? {
                return Ok(Some(alpha));
            }
        }
        Ok(None)
    }

    /// Multiplicative order of `alpha`; `None` when alpha^n != 1 (zero).
    pub fn multiplicative_order(&self, alpha: &F::Elem) -> Option<u64> {
        if !self.field.is_one(&self.field.pow(alpha, self.group_order)) {
            return None;
        }
        let mut order = self.group_order;
        for &r in &self.primes {
            while order.is_multiple_of(r) && self.field.is_one(&self.field.pow(alpha, order / r)) {
                order /= r;
            }
        }
        Some(order)
    }
}

/// All primitive elements of `field`.
pub fn find_all<F: FiniteField>(field: &F, check: OrderCheck) -> Result<Vec<F::Elem>, FieldError> {
    Finder::new(field, check).find_all()
}

/// The first primitive element of `field` (the least primitive root for GF(p)).
pub fn find_first<F: FiniteField>(
    field: &F,
    check: OrderCheck,
) -> Result<Option<F::Elem>, FieldError> {
    Finder::new(field, check).find_first()
}

pub fn is_primitive<F: FiniteField>(
    field: &F,
    alpha: &F::Elem,
    check: OrderCheck,
) -> Result<bool, FieldError> {
    Finder::new(field, check).is_primitive(alpha)
}

pub fn multiplicative_order<F: FiniteField>(field: &F, alpha: &F::Elem) -> Option<u64> {
    Finder::new(field, OrderCheck::Factored).multiplicative_order(alpha)
}

// ── Query ───────────────────────────────────────────────────────

/// Field element as returned to callers: a residue for GF(p), a reduced
/// polynomial for GF(p^k).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldElement {
    Residue(u64),
    Polynomial(ExtElement),
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldElement::Residue(a) => write!(f, "{}", a),
            FieldElement::Polynomial(e) => e.fmt(f),
        }
    }
}

/// Result of one query. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveElementSet {
    descriptor: FieldDescriptor,
    modulus: Option<Poly>,
    group_order: u64,
    check: OrderCheck,
    first_only: bool,
    elements: Vec<FieldElement>,
}

impl PrimitiveElementSet {
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Defining polynomial of GF(p^k); `None` for prime fields.
    pub fn modulus(&self) -> Option<&Poly> {
        self.modulus.as_ref()
    }

    pub fn group_order(&self) -> u64 {
        self.group_order
    }

    pub fn check(&self) -> OrderCheck {
        self.check
    }

    /// Whether only the first generator was requested.
    pub fn first_only(&self) -> bool {
        self.first_only
    }

    pub fn elements(&self) -> &[FieldElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Phases of a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    ClassifyOrder,
    PrimeFieldSearch,
    ExtensionFieldSearch,
    Done,
    Failed,
}

struct PhaseTracker {
    phase: Phase,
}

impl PhaseTracker {
    fn advance(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "query phase");
        self.phase = next;
    }
}

/// Classify `n`, build its field and search it for generators.
pub fn run_query(n: &Integer, config: &SearchConfig) -> Result<PrimitiveElementSet, FieldError> {
    let span = info_span!("query", n = %n, check = %config.check);
    let _guard = span.enter();
    let start = Instant::now();

    let mut phases = PhaseTracker { phase: Phase::Init };
    let result = search(n, config, &mut phases);
    match &result {
        Ok(set) => {
            phases.advance(Phase::Done);
            info!(
                field = %set.descriptor,
                count = set.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "search complete"
            );
        }
        Err(e) => {
            phases.advance(Phase::Failed);
            debug!(error = %e, "query failed");
        }
    }
    result
}

fn search(
    n: &Integer,
    config: &SearchConfig,
    phases: &mut PhaseTracker,
) -> Result<PrimitiveElementSet, FieldError> {
    phases.advance(Phase::ClassifyOrder);
    let descriptor = classify(n, config.mr_rounds)?;
    let (p, order) = descriptor.bounded(config.max_order)?;
    let k = descriptor.degree();

    if descriptor.is_prime_field() {
        phases.advance(Phase::PrimeFieldSearch);
        if config.modulus.is_some() {
            warn!(field = %descriptor, "modulus ignored for a prime field");
        }
        let field = PrimeField::new(p)?;
        let elements = collect(&field, config)?
            .into_iter()
            .map(FieldElement::Residue)
            .collect();
        return Ok(PrimitiveElementSet {
            descriptor,
            modulus: None,
            group_order: order - 1,
            check: config.check,
            first_only: config.first_only,
            elements,
        });
    }

    phases.advance(Phase::ExtensionFieldSearch);
    let field = match &config.modulus {
        Some(coeffs) => ExtensionField::with_modulus(p, k, coeffs)?,
        None => ExtensionField::new(p, k)?,
    };
    let elements = collect(&field, config)?
        .into_iter()
        .map(FieldElement::Polynomial)
        .collect();
    Ok(PrimitiveElementSet {
        descriptor,
        modulus: Some(field.modulus().clone()),
        group_order: order - 1,
        check: config.check,
        first_only: config.first_only,
        elements,
    })
}

fn collect<F: FiniteField>(field: &F, config: &SearchConfig) -> Result<Vec<F::Elem>, FieldError> {
    let finder = Finder::new(field, config.check);
    if config.first_only {
        Ok(finder.find_first()?.into_iter().collect())
    } else {
        finder.find_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf(p: u64) -> PrimeField {
        PrimeField::new(p).unwrap()
    }

    fn query(n: i64) -> Result<PrimitiveElementSet, FieldError> {
        run_query(&Integer::from(n), &SearchConfig::default())
    }

    fn rendered(set: &PrimitiveElementSet) -> Vec<String> {
        set.elements().iter().map(|e| e.to_string()).collect()
    }

    // ── Prime fields ────────────────────────────────────────────────

    #[test]
    fn gf2_has_single_generator_one() {
        assert_eq!(find_all(&gf(2), OrderCheck::Factored).unwrap(), vec![1]);
        assert_eq!(find_all(&gf(2), OrderCheck::Exhaustive).unwrap(), vec![1]);
        assert_eq!(find_first(&gf(2), OrderCheck::Factored).unwrap(), Some(1));
    }

    #[test]
    fn gf5_generators() {
        assert_eq!(find_all(&gf(5), OrderCheck::Factored).unwrap(), vec![2, 3]);
    }

    #[test]
    fn gf7_generators() {
        assert_eq!(find_all(&gf(7), OrderCheck::Factored).unwrap(), vec![3, 5]);
        assert_eq!(find_all(&gf(7), OrderCheck::Exhaustive).unwrap(), vec![3, 5]);
    }

    #[test]
    fn gf3_generator_is_two() {
        assert_eq!(find_all(&gf(3), OrderCheck::Exhaustive).unwrap(), vec![2]);
    }

    #[test]
    fn strategies_agree_on_small_primes() {
        for p in [3u64, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 97, 101] {
            let f = gf(p);
            assert_eq!(
                find_all(&f, OrderCheck::Factored).unwrap(),
                find_all(&f, OrderCheck::Exhaustive).unwrap(),
                "p = {}",
                p
            );
        }
    }

    #[test]
    fn counts_match_totient() {
        for p in [11u64, 13, 101, 257, 1009, 65537] {
            let all = find_all(&gf(p), OrderCheck::Factored).unwrap();
            assert_eq!(all.len() as u64, euler_phi(p - 1), "p = {}", p);
        }
    }

    #[test]
    fn least_primitive_roots() {
        let known: &[(u64, u64)] = &[(3, 2), (7, 3), (23, 5), (41, 6), (71, 7), (191, 19), (409, 21)];
        for &(p, g) in known {
            assert_eq!(find_first(&gf(p), OrderCheck::Factored).unwrap(), Some(g), "p = {}", p);
            assert_eq!(find_first(&gf(p), OrderCheck::Exhaustive).unwrap(), Some(g), "p = {}", p);
        }
    }

    #[test]
    fn multiplicative_order_mod_7() {
        let f = gf(7);
        let orders: Vec<Option<u64>> = (0..7).map(|a| multiplicative_order(&f, &a)).collect();
        assert_eq!(
            orders,
            vec![None, Some(1), Some(3), Some(6), Some(3), Some(6), Some(2)]
        );
    }

    #[test]
    fn is_primitive_single_candidates() {
        let f = gf(13);
        assert!(is_primitive(&f, &2, OrderCheck::Factored).unwrap());
        assert!(!is_primitive(&f, &3, OrderCheck::Factored).unwrap());
        assert!(!is_primitive(&f, &12, OrderCheck::Exhaustive).unwrap());
    }

    #[test]
    fn fermat_failure_is_a_construction_error() {
        let f = gf(7);
        assert!(matches!(
            is_primitive(&f, &0, OrderCheck::Factored),
            Err(FieldError::FieldConstruction { .. })
        ));
    }

    // ── Extension fields ────────────────────────────────────────────

    #[test]
    fn gf9_has_four_degree_one_generators() {
        let f = ExtensionField::new(3, 2).unwrap();
        let all = find_all(&f, OrderCheck::Factored).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|e| e.degree() == Some(1)));
        let names: Vec<String> = all.iter().map(|e| e.to_string()).collect();
        assert_eq!(names, vec!["x + 1", "x + 2", "2x + 1", "2x + 2"]);
    }

    #[test]
    fn extension_strategies_agree() {
        for (p, k) in [(2u64, 2u32), (2, 3), (2, 4), (3, 2), (3, 3), (5, 2), (7, 2)] {
            let f = ExtensionField::new(p, k).unwrap();
            assert_eq!(
                find_all(&f, OrderCheck::Factored).unwrap(),
                find_all(&f, OrderCheck::Exhaustive).unwrap(),
                "GF({}^{})",
                p,
                k
            );
        }
    }

    #[test]
    fn extension_counts_match_totient() {
        let cases: &[(u64, u32, usize)] = &[(2, 2, 2), (2, 3, 6), (2, 4, 8), (5, 2, 8), (3, 3, 12)];
        for &(p, k, count) in cases {
            let f = ExtensionField::new(p, k).unwrap();
            assert_eq!(find_all(&f, OrderCheck::Factored).unwrap().len(), count, "GF({}^{})", p, k);
        }
    }

    #[test]
    fn extension_generators_have_full_order() {
        let f = ExtensionField::new(2, 4).unwrap();
        for g in find_all(&f, OrderCheck::Factored).unwrap() {
            assert_eq!(multiplicative_order(&f, &g), Some(15), "g = {}", g);
        }
    }

    #[test]
    fn gf8_every_nonconstant_element_generates() {
        // 7 is prime, so all six non-constant elements have order 7.
        let f = ExtensionField::new(2, 3).unwrap();
        let all = find_all(&f, OrderCheck::Exhaustive).unwrap();
        assert_eq!(all, f.candidates().collect::<Vec<_>>());
    }

    // ── Queries ─────────────────────────────────────────────────────

    #[test]
    fn query_prime_fields() {
        assert_eq!(rendered(&query(2).unwrap()), vec!["1"]);
        assert_eq!(rendered(&query(5).unwrap()), vec!["2", "3"]);
        assert_eq!(rendered(&query(7).unwrap()), vec!["3", "5"]);
        let set = query(7).unwrap();
        assert_eq!(set.group_order(), 6);
        assert!(set.modulus().is_none());
    }

    #[test]
    fn query_nine() {
        let set = query(9).unwrap();
        assert_eq!(set.descriptor().degree(), 2);
        assert_eq!(set.len(), 4);
        assert_eq!(set.modulus().unwrap().to_string(), "x^2 + 1");
        assert!(set.elements().iter().all(|e| match e {
            FieldElement::Polynomial(p) => p.degree() == Some(1),
            FieldElement::Residue(_) => false,
        }));
    }

    #[test]
    fn query_twelve_fails() {
        assert!(matches!(query(12), Err(FieldError::NotAFieldOrder { .. })));
        assert!(matches!(query(1), Err(FieldError::InvalidInput { .. })));
    }

    #[test]
    fn query_is_idempotent() {
        assert_eq!(query(49).unwrap(), query(49).unwrap());
        assert_eq!(query(101).unwrap(), query(101).unwrap());
    }

    #[test]
    fn query_respects_size_limit() {
        let config = SearchConfig {
            max_order: 100,
            ..SearchConfig::default()
        };
        assert!(matches!(
            run_query(&Integer::from(101), &config),
            Err(FieldError::FieldTooLarge { limit: 100, .. })
        ));
        assert!(run_query(&Integer::from(97), &config).is_ok());
    }

    #[test]
    fn query_first_only() {
        let config = SearchConfig {
            first_only: true,
            ..SearchConfig::default()
        };
        let set = run_query(&Integer::from(7), &config).unwrap();
        assert!(set.first_only());
        assert_eq!(rendered(&set), vec!["3"]);
        let set = run_query(&Integer::from(9), &config).unwrap();
        assert_eq!(rendered(&set), vec!["x + 1"]);
    }

    #[test]
    fn query_with_user_modulus() {
        let config = SearchConfig {
            modulus: Some(vec![2, 1, 1]),
            ..SearchConfig::default()
        };
        let set = run_query(&Integer::from(9), &config).unwrap();
        assert_eq!(set.modulus().unwrap().to_string(), "x^2 + x + 2");
        // x is a root of a primitive polynomial here, so it generates.
        assert_eq!(set.len(), 4);
        assert!(rendered(&set).contains(&"x".to_string()));
    }

    #[test]
    fn query_with_reducible_modulus_fails() {
        let config = SearchConfig {
            modulus: Some(vec![1, 0, 1]),
            ..SearchConfig::default()
        };
        assert!(matches!(
            run_query(&Integer::from(25), &config),
            Err(FieldError::FieldConstruction { .. })
        ));
    }
}
