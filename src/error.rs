//! Errors raised by classification, field construction and the generator search.

use rug::Integer;

/// Failure of a single query. Every variant is terminal for that query;
/// nothing is retried and no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Input is not an integer, or is an integer ≤ 1.
    InvalidInput { input: String },
    /// n is neither a prime nor a prime power.
    NotAFieldOrder { n: Integer },
    /// The field order exceeds the configured search limit.
    FieldTooLarge { order: Integer, limit: u64 },
    /// The defining modulus could not be built or the arithmetic is inconsistent.
    FieldConstruction { reason: String },
}

impl FieldError {
    pub fn construction(reason: impl Into<String>) -> Self {
        FieldError::FieldConstruction {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::InvalidInput { input } => {
                write!(f, "invalid input {:?}: expected an integer greater than 1", input)
            }
            FieldError::NotAFieldOrder { .. } => {
                write!(f, "must be a prime number or a prime power")
            }
            FieldError::FieldTooLarge { order, limit } => write!(
                f,
                "field order {} exceeds the search limit of {} (raise --max-order)",
                order, limit
            ),
            FieldError::FieldConstruction { reason } => {
                write!(f, "field construction failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for FieldError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_field_order_uses_the_user_facing_message() {
        let err = FieldError::NotAFieldOrder {
            n: Integer::from(12),
        };
        assert_eq!(err.to_string(), "must be a prime number or a prime power");
    }

    #[test]
    fn too_large_mentions_both_numbers() {
        let err = FieldError::FieldTooLarge {
            order: Integer::from(1_000_003),
            limit: 1_000_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000003"), "{}", msg);
        assert!(msg.contains("1000000"), "{}", msg);
    }

    #[test]
    fn construction_helper_keeps_reason() {
        let err = FieldError::construction("x^2 + 1 is reducible over GF(5)");
        assert_eq!(
            err.to_string(),
            "field construction failed: x^2 + 1 is reducible over GF(5)"
        );
    }
}
