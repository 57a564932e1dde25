//! Error taxonomy for evaluation failures.
//!
//! Every failure aborts the current evaluation and carries the operator name
//! plus a short description of the offending operand. `Internal` is reserved
//! for broken invariants inside the evaluator itself.

use std::fmt;
use thiserror::Error;

/// The safety limit that an evaluation ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// Integer result would need more than `max_bits` bits.
    Bits,
    /// Printed integer would have more than `max_digits` digits.
    Digits,
    /// Nested evaluation deeper than `max_stack`.
    Stack,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Bits => write!(f, "maxbits"),
            Limit::Digits => write!(f, "maxdigits"),
            Limit::Stack => write!(f, "maxstack"),
        }
    }
}

/// Coarse classification of an [`EvalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Domain,
    Type,
    Limit,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("{op}: domain error for {operand}: {detail}")]
    Domain {
        op: String,
        operand: String,
        detail: String,
    },
    #[error("{op}: type error for {operand}: {detail}")]
    Type {
        op: String,
        operand: String,
        detail: String,
    },
    #[error("{op}: {limit} exceeded: {detail}")]
    Limit {
        op: String,
        limit: Limit,
        detail: String,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

impl EvalError {
    pub fn domain(op: &str, operand: impl Into<String>, detail: impl Into<String>) -> Self {
        EvalError::Domain {
            op: op.to_string(),
            operand: operand.into(),
            detail: detail.into(),
        }
    }

    pub fn type_error(op: &str, operand: impl Into<String>, detail: impl Into<String>) -> Self {
        EvalError::Type {
            op: op.to_string(),
            operand: operand.into(),
            detail: detail.into(),
        }
    }

    pub fn limit(op: &str, limit: Limit, detail: impl Into<String>) -> Self {
        EvalError::Limit {
            op: op.to_string(),
            limit,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        EvalError::Internal(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Domain { .. } => ErrorKind::Domain,
            EvalError::Type { .. } => ErrorKind::Type,
            EvalError::Limit { .. } => ErrorKind::Limit,
            EvalError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True when the failure points at a bug in the evaluator rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, EvalError::Internal(_))
    }

    /// The operator that raised the error, if any.
    pub fn op(&self) -> Option<&str> {
        match self {
            EvalError::Domain { op, .. } | EvalError::Type { op, .. } | EvalError::Limit { op, .. } => {
                Some(op)
            }
            EvalError::Internal(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = EvalError::domain("!", "Int -3", "negative factorial");
        assert_eq!(e.to_string(), "!: domain error for Int -3: negative factorial");
        let e = EvalError::limit("!", Limit::Bits, "needs 215 bits");
        assert_eq!(e.to_string(), "!: maxbits exceeded: needs 215 bits");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(EvalError::type_error("+", "Char 'a'", "x").kind(), ErrorKind::Type);
        assert_eq!(EvalError::internal("shrink").kind(), ErrorKind::Internal);
        assert!(EvalError::internal("shrink").is_internal());
        assert!(!EvalError::domain("log", "0", "zero").is_internal());
        assert_eq!(EvalError::domain("log", "0", "zero").op(), Some("log"));
        assert_eq!(EvalError::internal("x").op(), None);
    }
}
