//! Assist SDK
//!
//! High-level API for loading reporting modules and evaluating answers
//! against them.

pub mod builder;
pub mod cache;
pub mod config;
pub mod element_set;
pub mod engine;
pub mod error;
pub mod source;

// Re-export main types
pub use builder::EngineBuilder;
pub use cache::{CacheStats, ModuleCache, ModuleKey};
pub use config::EngineConfig;
pub use element_set::{element_set, ElementSet, ElementSummary, ElementValue};
pub use engine::{AssistEngine, EvaluationReport, EvaluationRequest};
pub use error::{Result, SdkError};
pub use source::{FileSystemSource, MemorySource, ModuleSource};

// Re-export commonly used types from dependencies
pub use assist_compiler::{Defect, DefectKind, ResolvedModule};
pub use assist_core::{Answer, AnswerSet, SectionId};
