//! Assist Runtime - evaluation over resolved modules
//!
//! Everything here is a pure function of a [`ResolvedModule`] and an
//! [`AnswerSet`]: the condition evaluator, the decision tree walker, the
//! computed value evaluator and the template renderer.
//!
//! [`ResolvedModule`]: assist_compiler::ResolvedModule
//! [`AnswerSet`]: assist_core::AnswerSet

pub mod computed;
pub mod condition;
pub mod renderer;
pub mod walker;

pub use computed::{ComputedValueEvaluator, ComputedValues};
pub use condition::ConditionEvaluator;
pub use renderer::{render_end_point, TemplateRenderer};
pub use walker::{walk_tree, DecisionTreeWalker, TreeOutcome, WalkResult};
