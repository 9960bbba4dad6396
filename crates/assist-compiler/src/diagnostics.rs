//! Load-time defects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a load-time defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    /// An id reference names nothing declared in the module
    UnresolvedReference,

    /// An id (or a choice value within one element) is declared twice
    DuplicateId,

    /// Template partials include each other in a loop
    CyclicPartialReference,

    /// A comparison has no element of its own and no enclosing scope
    UnscopedComparison,
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefectKind::UnresolvedReference => "unresolved reference",
            DefectKind::DuplicateId => "duplicate id",
            DefectKind::CyclicPartialReference => "cyclic partial reference",
            DefectKind::UnscopedComparison => "unscoped comparison",
        };
        f.write_str(name)
    }
}

/// A single defect found while resolving a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    pub kind: DefectKind,

    /// Slash-separated location inside the module, e.g.
    /// `rules/composition_check/branch[1]/condition/0`
    pub location: String,

    /// Human-readable explanation
    pub reason: String,
}

impl Defect {
    pub fn new(kind: DefectKind, location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.reason)
    }
}
