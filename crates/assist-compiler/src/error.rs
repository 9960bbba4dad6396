//! Compiler error types

use crate::diagnostics::Defect;
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The module has one or more load-time defects
    #[error("Module has {} defect(s): {}", .0.len(), summarize(.0))]
    Defects(Vec<Defect>),
}

impl CompileError {
    /// All defects carried by this error
    pub fn defects(&self) -> &[Defect] {
        match self {
            CompileError::Defects(defects) => defects,
        }
    }
}

fn summarize(defects: &[Defect]) -> String {
    defects
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
