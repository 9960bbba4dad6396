//! Assist Compiler - load-time validation of parsed modules
//!
//! Turns a parsed [`Module`](assist_core::Module) into a [`ResolvedModule`]
//! whose every id reference is known to resolve, or reports the complete list
//! of defects found.

pub mod cycle;
pub mod diagnostics;
pub mod error;
pub mod resolved;
pub mod resolver;

pub use diagnostics::{Defect, DefectKind};
pub use error::{CompileError, Result};
pub use resolved::ResolvedModule;
pub use resolver::ReferenceResolver;
