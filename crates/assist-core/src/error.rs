//! Error types for Assist Core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Type mismatch: {0}")]
    TypeMismatch(#[from] TypeMismatch),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// A numeric comparison was attempted on a value that is not a decimal number.
///
/// Raised per evaluation. The comparison it came from counts as `false` and the
/// mismatch travels back to the caller alongside the evaluation result.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("element '{element_id}': cannot compare '{answer}' {operator} '{operand}' numerically")]
pub struct TypeMismatch {
    /// Element whose answer was compared
    pub element_id: String,
    /// The answer as supplied by the caller
    pub answer: String,
    /// Comparison operator symbol (">", "<=", ...)
    pub operator: String,
    /// The authored comparison value
    pub operand: String,
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let mismatch = TypeMismatch {
            element_id: "size".to_string(),
            answer: "large".to_string(),
            operator: ">".to_string(),
            operand: "3".to_string(),
        };
        let text = mismatch.to_string();
        assert!(text.contains("size"));
        assert!(text.contains("'large' > '3'"));

        let core: CoreError = mismatch.into();
        assert!(core.to_string().starts_with("Type mismatch"));
    }
}
