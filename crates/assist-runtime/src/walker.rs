//! Decision tree walking
//!
//! Rules trees (terminals are end point references) and computed-value trees
//! (terminals are templates) share one walk.

use crate::condition::ConditionEvaluator;
use assist_compiler::ResolvedModule;
use assist_core::ast::{DecisionPoint, Next};
use assist_core::{AnswerSet, TypeMismatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a walk of one tree ended
#[derive(Debug, Clone, PartialEq)]
pub struct TreeOutcome<'a, T> {
    pub terminal: &'a T,

    /// Elements excluded by the branches taken
    pub not_relevant: BTreeSet<String>,

    /// Taken steps, e.g. `["composition_check/branch[1]", "size_check/default"]`
    pub path: Vec<String>,
}

/// Walk from `root` to a terminal.
///
/// At each decision point the first branch whose condition holds is taken,
/// otherwise the default branch. Exclusions of taken branches accumulate;
/// branches not taken contribute nothing.
pub fn walk_tree<'a, T>(
    root: &'a DecisionPoint<T>,
    answers: &AnswerSet,
    mismatches: &mut Vec<TypeMismatch>,
) -> TreeOutcome<'a, T> {
    let mut point = root;
    let mut not_relevant = BTreeSet::new();
    let mut path = Vec::new();

    loop {
        let scope = point.data_element_id.as_deref();
        let matched = point
            .branches
            .iter()
            .enumerate()
            .find(|(_, branch)| ConditionEvaluator::evaluate(&branch.condition, scope, answers, mismatches));

        let (step, excluded, next) = match matched {
            Some((i, branch)) => (
                format!("{}/branch[{}]", point.id, i),
                &branch.not_relevant,
                &branch.next,
            ),
            None => (
                format!("{}/default", point.id),
                &point.default_branch.not_relevant,
                &point.default_branch.next,
            ),
        };

        tracing::debug!("Decision point '{}' took {}", point.id, step);
        path.push(step);
        not_relevant.extend(excluded.iter().cloned());

        match next {
            Next::Nested(nested) => point = &**nested,
            Next::Terminal(terminal) => {
                return TreeOutcome {
                    terminal,
                    not_relevant,
                    path,
                }
            }
        }
    }
}

/// Result of walking a module's rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkResult {
    /// Reached end point; `None` when the module has no rules
    pub end_point_id: Option<String>,
    pub not_relevant: BTreeSet<String>,
    pub path: Vec<String>,
    pub mismatches: Vec<TypeMismatch>,
}

pub struct DecisionTreeWalker;

impl DecisionTreeWalker {
    /// Walk the module's rules tree against `answers`
    pub fn walk(module: &ResolvedModule, answers: &AnswerSet) -> WalkResult {
        let Some(rules) = module.rules() else {
            tracing::debug!("Module '{}' has no rules", module.id());
            return WalkResult::default();
        };

        let mut mismatches = Vec::new();
        let outcome = walk_tree(rules, answers, &mut mismatches);

        tracing::debug!(
            "Module '{}' reached end point '{}' via {:?}",
            module.id(),
            outcome.terminal.end_point_id,
            outcome.path
        );

        WalkResult {
            end_point_id: Some(outcome.terminal.end_point_id.clone()),
            not_relevant: outcome.not_relevant,
            path: outcome.path,
            mismatches,
        }
    }
}
