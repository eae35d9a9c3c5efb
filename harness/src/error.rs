//! Error taxonomy for the harness.

use thiserror::Error;

/// First point at which a candidate output disagrees with its baseline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MismatchError {
    #[error("element {index} differs: expected {expected:e}, got {actual:e}")]
    Value {
        index: usize,
        expected: f64,
        actual: f64,
    },

    #[error("length differs: expected {expected} elements, got {actual}")]
    Length { expected: usize, actual: usize },
}

impl MismatchError {
    /// Index of the offending element, if the lengths agreed.
    pub fn index(&self) -> Option<usize> {
        match self {
            MismatchError::Value { index, .. } => Some(*index),
            MismatchError::Length { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{strategy} / {expression}: output does not match the baseline: {source}")]
    Mismatch {
        strategy: String,
        expression: &'static str,
        #[source]
        source: MismatchError,
    },

    #[error("{strategy} / {expression}: {reason}")]
    Strategy {
        strategy: String,
        expression: &'static str,
        reason: String,
    },

    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        HarnessError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_index() {
        let err = MismatchError::Value {
            index: 7,
            expected: 1.5,
            actual: 1.25,
        };
        assert_eq!(err.index(), Some(7));
        assert!(err.to_string().contains("element 7"));
    }

    #[test]
    fn harness_mismatch_names_strategy_and_expression() {
        let err = HarnessError::Mismatch {
            strategy: "Iterator".to_string(),
            expression: "algebraic",
            source: MismatchError::Length {
                expected: 4,
                actual: 3,
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Iterator / algebraic"));
        assert!(msg.contains("expected 4 elements, got 3"));
    }
}
