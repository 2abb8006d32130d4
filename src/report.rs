//! Rendering of query results for the terminal and as JSON.

use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::FieldError;
use crate::extension::ExtensionField;
use crate::factor::{classify, euler_phi, prime_factors};
use crate::primitive::{FieldElement, PrimitiveElementSet};

/// Serializable summary of a [`PrimitiveElementSet`].
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub field: String,
    pub characteristic: String,
    pub degree: u32,
    pub order: String,
    pub group_order: u64,
    pub modulus: Option<String>,
    pub check: String,
    pub first_only: bool,
    pub count: usize,
    pub expected_count: u64,
    pub elements: Vec<String>,
    /// Coefficient vectors (constant term first) for GF(p^k) elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<Vec<Vec<u64>>>,
}

impl Report {
    pub fn from_set(set: &PrimitiveElementSet) -> Self {
        let descriptor = set.descriptor();
        let degree = descriptor.degree();
        let coefficients = set.modulus().map(|_| {
            set.elements()
                .iter()
                .filter_map(|e| match e {
                    FieldElement::Polynomial(p) => Some(p.coefficients(degree)),
                    FieldElement::Residue(_) => None,
                })
                .collect()
        });
        Report {
            field: descriptor.to_string(),
            characteristic: descriptor.characteristic().to_string(),
            degree,
            order: descriptor.order().to_string(),
            group_order: set.group_order(),
            modulus: set.modulus().map(|m| m.to_string()),
            check: set.check().to_string(),
            first_only: set.first_only(),
            count: set.len(),
            expected_count: euler_phi(set.group_order()),
            elements: set.elements().iter().map(|e| e.to_string()).collect(),
            coefficients,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.first_only {
            match self.elements.first() {
                Some(g) => out.push_str(&format!("Primitive element in {}: {}\n", self.field, g)),
                None => out.push_str(&format!("No primitive element found in {}\n", self.field)),
            }
        } else {
            let noun = if self.count == 1 { "element" } else { "elements" };
            out.push_str(&format!(
                "Found {} primitive {} in {}:\n",
                self.count, noun, self.field
            ));
        }
        if let Some(m) = &self.modulus {
            out.push_str(&format!("modulus: {}\n", m));
        }
        if !self.first_only {
            for e in &self.elements {
                out.push_str(e);
                out.push('\n');
            }
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Facts about the field of order `n`, without running the search.
#[derive(Debug, Clone, Serialize)]
pub struct FieldInfo {
    pub field: String,
    pub characteristic: String,
    pub degree: u32,
    pub order: String,
    pub group_order: u64,
    /// Prime factorization of the group order as (prime, exponent).
    pub group_order_factors: Vec<(u64, u32)>,
    pub expected_generators: u64,
    pub modulus: Option<String>,
}

impl FieldInfo {
    pub fn inspect(n: &rug::Integer, config: &SearchConfig) -> Result<Self, FieldError> {
        let descriptor = classify(n, config.mr_rounds)?;
        let (p, order) = descriptor.bounded(config.max_order)?;
        let modulus = if descriptor.is_prime_field() {
            None
        } else {
            let field = match &config.modulus {
                Some(coeffs) => ExtensionField::with_modulus(p, descriptor.degree(), coeffs)?,
                None => ExtensionField::new(p, descriptor.degree())?,
            };
            Some(field.modulus().to_string())
        };
        let group_order = order - 1;
        Ok(FieldInfo {
            field: descriptor.to_string(),
            characteristic: descriptor.characteristic().to_string(),
            degree: descriptor.degree(),
            order: order.to_string(),
            group_order,
            group_order_factors: prime_factors(group_order),
            expected_generators: euler_phi(group_order),
            modulus,
        })
    }

    pub fn to_text(&self) -> String {
        let factors = if self.group_order_factors.is_empty() {
            "1".to_string()
        } else {
            self.group_order_factors
                .iter()
                .map(|&(q, e)| if e == 1 { q.to_string() } else { format!("{}^{}", q, e) })
                .collect::<Vec<_>>()
                .join(" * ")
        };
        let mut out = format!(
            "field: {}\ncharacteristic: {}\ndegree: {}\norder: {}\ngroup order: {} = {}\nprimitive elements: {}\n",
            self.field,
            self.characteristic,
            self.degree,
            self.order,
            self.group_order,
            factors,
            self.expected_generators
        );
        if let Some(m) = &self.modulus {
            out.push_str(&format!("modulus: {}\n", m));
        }
        out
    }
}
