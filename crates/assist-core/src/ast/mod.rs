//! Model definitions for reporting modules
//!
//! This module contains the node definitions for:
//! - Module metadata and applicability
//! - Data elements
//! - Conditions
//! - Decision trees (rules and computed values)
//! - End points and report text
//! - Template content and partials

pub mod condition;
pub mod decision;
pub mod element;
pub mod endpoint;
pub mod module;
pub mod template;

pub use condition::{Comparison, ComparisonOp, Condition};
pub use decision::{Branch, DecisionPoint, DefaultBranch, EndPointRef, Next};
pub use element::{
    ChoiceOption, DataElement, Diagram, ElementCommon, ElementKind, ImageMap, ImageMapArea,
};
pub use endpoint::{ActionableFinding, EndPoint, ImagingFollowup, ReportText, SectionId};
pub use module::{AgeRange, Applicability, ApplicableExam, Metadata, Module};
pub use template::{TemplateContent, TemplateNode, TemplatePartial};
