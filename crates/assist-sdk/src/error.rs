//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Module document could not be parsed
    #[error("Parser error: {0}")]
    ParseError(#[from] assist_parser::ParseError),

    /// Module failed load-time validation
    #[error("Compiler error: {0}")]
    CompileError(#[from] assist_compiler::CompileError),

    /// Invalid value in a request
    #[error("Invalid value: {0}")]
    InvalidValue(#[from] assist_core::CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// No module with this id in the source
    #[error("Module not found: {0}")]
    ModuleNotFound(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
