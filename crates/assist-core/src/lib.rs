//! Assist Core - Core types for reporting module definitions
//!
//! This crate provides the model shared by every other crate in the workspace:
//! - Data elements (global, integer, numeric, choice, multi-choice, computed)
//! - Conditions and decision trees
//! - End points, report text and template content
//! - Answer sets supplied at evaluation time
//! - Error types

pub mod ast;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use ast::{
    Condition, DataElement, DecisionPoint, EndPoint, Module, SectionId, TemplateContent,
    TemplateNode,
};
pub use error::{CoreError, TypeMismatch};
pub use types::{Answer, AnswerSet};
