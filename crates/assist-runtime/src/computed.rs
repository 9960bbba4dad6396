//! Computed data elements
//!
//! A computed element's value is either template content or a decision tree
//! whose terminals are template content. Elements are computed in document
//! order; each sees the computed values of the elements before it.

use crate::renderer::TemplateRenderer;
use crate::walker::walk_tree;
use assist_compiler::ResolvedModule;
use assist_core::ast::{DataElement, Next};
use assist_core::{Answer, AnswerSet, TypeMismatch};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Values of the computed elements of one evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedValues {
    /// Element id to rendered value; elements rendering to nothing are absent
    pub values: BTreeMap<String, String>,

    /// Mismatches met while walking computed-value trees
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<TypeMismatch>,

    /// Computed elements that rendered to nothing; caller answers for these
    /// ids are dropped from the overlay
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub empty: BTreeSet<String>,
}

impl ComputedValues {
    pub fn get(&self, element_id: &str) -> Option<&str> {
        self.values.get(element_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `answers` with the computed values layered on top. A computed element
    /// always replaces the caller's answer, even when it renders empty.
    pub fn overlay(&self, answers: &AnswerSet) -> AnswerSet {
        let mut merged = answers.overlay(
            self.values
                .iter()
                .map(|(id, value)| (id.clone(), Answer::from(value.as_str()))),
        );
        for id in &self.empty {
            merged.remove(id);
        }
        merged
    }
}

pub struct ComputedValueEvaluator;

impl ComputedValueEvaluator {
    /// Compute every computed element of `module`
    pub fn evaluate(module: &ResolvedModule, answers: &AnswerSet) -> ComputedValues {
        let mut computed = ComputedValues::default();
        let mut current = answers.clone();

        for element in module.elements() {
            let DataElement::Computed { common, value_expr } = element else {
                continue;
            };

            let content = match value_expr {
                Next::Terminal(content) => content,
                Next::Nested(point) => {
                    walk_tree(point, &current, &mut computed.mismatches).terminal
                }
            };

            let value = TemplateRenderer::render(content, &current, module);
            tracing::debug!("Computed '{}' = {:?}", common.id, value);

            if value.trim().is_empty() {
                current.remove(&common.id);
                computed.empty.insert(common.id.clone());
                continue;
            }
            current.insert(common.id.clone(), value.as_str());
            computed.values.insert(common.id.clone(), value);
        }

        computed
    }
}
