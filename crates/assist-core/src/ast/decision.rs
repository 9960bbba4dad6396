//! Decision tree definitions
//!
//! A decision tree is generic over its terminal outcome. Module rules end in
//! an [`EndPointRef`]; computed data elements end in template content that
//! renders to the computed value.

use super::condition::Condition;
use serde::{Deserialize, Serialize};

/// A node of a decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPoint<T> {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Element that comparison conditions without their own element read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_element_id: Option<String>,

    /// Branches, first match wins
    pub branches: Vec<Branch<T>>,

    /// Taken when no branch condition holds
    pub default_branch: DefaultBranch<T>,
}

/// A conditional edge out of a decision point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub condition: Condition,
    /// Elements that stop being relevant when this branch is taken
    #[serde(default)]
    pub not_relevant: Vec<String>,
    pub next: Next<T>,
}

/// The fallback edge out of a decision point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultBranch<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub not_relevant: Vec<String>,
    pub next: Next<T>,
}

/// Where a branch leads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Next<T> {
    Nested(Box<DecisionPoint<T>>),
    Terminal(T),
}

/// Terminal of the module rules tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndPointRef {
    pub end_point_id: String,
}

impl EndPointRef {
    pub fn new(end_point_id: impl Into<String>) -> Self {
        Self {
            end_point_id: end_point_id.into(),
        }
    }
}

impl<T> DecisionPoint<T> {
    /// Create a decision point with no branches, only a default
    pub fn new(id: impl Into<String>, default_branch: DefaultBranch<T>) -> Self {
        Self {
            id: id.into(),
            label: None,
            data_element_id: None,
            branches: Vec::new(),
            default_branch,
        }
    }

    /// Scope comparison conditions to an element
    pub fn scoped_to(mut self, element_id: impl Into<String>) -> Self {
        self.data_element_id = Some(element_id.into());
        self
    }

    /// Append a branch
    pub fn with_branch(mut self, branch: Branch<T>) -> Self {
        self.branches.push(branch);
        self
    }

    /// Longest chain of nested decision points, counting this one
    pub fn depth(&self) -> usize {
        let nested = self
            .branches
            .iter()
            .map(|b| &b.next)
            .chain(std::iter::once(&self.default_branch.next))
            .map(|next| match next {
                Next::Nested(point) => point.depth(),
                Next::Terminal(_) => 0,
            })
            .max()
            .unwrap_or(0);
        nested + 1
    }
}

impl<T> Branch<T> {
    pub fn new(condition: Condition, next: Next<T>) -> Self {
        Self {
            label: None,
            condition,
            not_relevant: Vec::new(),
            next,
        }
    }

    pub fn excluding<I, S>(mut self, element_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_relevant.extend(element_ids.into_iter().map(Into::into));
        self
    }
}

impl<T> DefaultBranch<T> {
    pub fn new(next: Next<T>) -> Self {
        Self {
            label: None,
            not_relevant: Vec::new(),
            next,
        }
    }

    pub fn excluding<I, S>(mut self, element_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_relevant.extend(element_ids.into_iter().map(Into::into));
        self
    }
}

impl Next<EndPointRef> {
    /// Shorthand for a branch that ends at an end point
    pub fn end_point(end_point_id: impl Into<String>) -> Self {
        Next::Terminal(EndPointRef::new(end_point_id))
    }
}

impl<T> Next<T> {
    pub fn nested(point: DecisionPoint<T>) -> Self {
        Next::Nested(Box::new(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_depth() {
        let inner = DecisionPoint::new("inner", DefaultBranch::new(Next::end_point("B")));
        let root = DecisionPoint::new("root", DefaultBranch::new(Next::end_point("C")))
            .scoped_to("size")
            .with_branch(Branch::new(Condition::greater_than("3"), Next::nested(inner)).excluding(["margin"]));

        assert_eq!(root.data_element_id.as_deref(), Some("size"));
        assert_eq!(root.branches[0].not_relevant, vec!["margin".to_string()]);
        assert_eq!(root.depth(), 2);
    }
}
