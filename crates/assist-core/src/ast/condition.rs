//! Condition expressions used by decision-point branches

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators for single-element comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Equal,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl ComparisonOp {
    /// Whether the operator compares decimals rather than strings
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ComparisonOp::Equal)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::LessThan => "<",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::LessOrEqual => "<=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A comparison of one element's answer against an authored operand.
///
/// `element_id` is only present when the document names the element on the
/// condition itself. Otherwise the comparison is scoped by the enclosing
/// decision point's `data_element_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub op: ComparisonOp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    pub operand: String,
}

impl Comparison {
    pub fn new(op: ComparisonOp, operand: impl Into<String>) -> Self {
        Self {
            op,
            element_id: None,
            operand: operand.into(),
        }
    }

    /// Name the compared element explicitly
    pub fn on(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    /// The element this comparison reads, given the enclosing scope
    pub fn target<'a>(&'a self, scope: Option<&'a str>) -> Option<&'a str> {
        self.element_id.as_deref().or(scope)
    }
}

/// Condition tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Every child holds
    And(Vec<Condition>),
    /// At least one child holds
    Or(Vec<Condition>),
    /// Every child is false
    Not(Vec<Condition>),
    /// Single-element comparison (`Equal`, `GreaterThan`, ...)
    Compare(Comparison),
    /// At least `minimum_choices` values are selected on a multi-choice element
    HasAnyNChoices {
        element_id: String,
        minimum_choices: usize,
    },
    /// The answer contains `operand`
    Contains { element_id: String, operand: String },
    /// The choice element's answer is `choice_value`
    ChoiceRef {
        element_id: String,
        choice_value: String,
    },
}

impl Condition {
    pub fn equal(operand: impl Into<String>) -> Self {
        Condition::Compare(Comparison::new(ComparisonOp::Equal, operand))
    }

    pub fn greater_than(operand: impl Into<String>) -> Self {
        Condition::Compare(Comparison::new(ComparisonOp::GreaterThan, operand))
    }

    pub fn less_than(operand: impl Into<String>) -> Self {
        Condition::Compare(Comparison::new(ComparisonOp::LessThan, operand))
    }

    pub fn greater_or_equal(operand: impl Into<String>) -> Self {
        Condition::Compare(Comparison::new(ComparisonOp::GreaterOrEqual, operand))
    }

    pub fn less_or_equal(operand: impl Into<String>) -> Self {
        Condition::Compare(Comparison::new(ComparisonOp::LessOrEqual, operand))
    }

    pub fn has_any_n_choices(element_id: impl Into<String>, minimum_choices: usize) -> Self {
        Condition::HasAnyNChoices {
            element_id: element_id.into(),
            minimum_choices,
        }
    }

    pub fn contains(element_id: impl Into<String>, operand: impl Into<String>) -> Self {
        Condition::Contains {
            element_id: element_id.into(),
            operand: operand.into(),
        }
    }

    pub fn choice(element_id: impl Into<String>, choice_value: impl Into<String>) -> Self {
        Condition::ChoiceRef {
            element_id: element_id.into(),
            choice_value: choice_value.into(),
        }
    }

    /// Element ids this condition reads directly (explicit ids only)
    pub fn referenced_elements(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_elements(&mut ids);
        ids
    }

    fn collect_elements<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Condition::And(children) | Condition::Or(children) | Condition::Not(children) => {
                for child in children {
                    child.collect_elements(ids);
                }
            }
            Condition::Compare(cmp) => {
                if let Some(id) = cmp.element_id.as_deref() {
                    ids.push(id);
                }
            }
            Condition::HasAnyNChoices { element_id, .. }
            | Condition::Contains { element_id, .. }
            | Condition::ChoiceRef { element_id, .. } => ids.push(element_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_target_prefers_explicit_element() {
        let scoped = Comparison::new(ComparisonOp::GreaterThan, "3");
        assert_eq!(scoped.target(Some("size")), Some("size"));
        assert_eq!(scoped.target(None), None);

        let explicit = scoped.on("count");
        assert_eq!(explicit.target(Some("size")), Some("count"));
    }

    #[test]
    fn test_referenced_elements_walks_groups() {
        let condition = Condition::And(vec![
            Condition::greater_than("3"),
            Condition::Or(vec![
                Condition::choice("margin", "smooth"),
                Condition::has_any_n_choices("foci", 2),
            ]),
        ]);
        assert_eq!(condition.referenced_elements(), vec!["margin", "foci"]);
    }

    #[test]
    fn test_numeric_ops() {
        assert!(!ComparisonOp::Equal.is_numeric());
        assert!(ComparisonOp::LessOrEqual.is_numeric());
        assert_eq!(ComparisonOp::GreaterOrEqual.to_string(), ">=");
    }
}
