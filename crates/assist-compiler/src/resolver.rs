//! Reference resolver
//!
//! Indexes every declared id, then checks every reference in the module
//! against those indexes. All defects are collected before failing so authors
//! see the complete list in one pass.

use crate::cycle::find_partial_cycles;
use crate::diagnostics::{Defect, DefectKind};
use crate::error::{CompileError, Result};
use crate::resolved::ResolvedModule;
use assist_core::ast::{
    Condition, DataElement, DecisionPoint, EndPointRef, Module, Next, TemplateContent,
    TemplateNode,
};
use std::collections::{HashMap, HashSet};

/// Reference resolver
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Validate `module` and build its lookup indexes
    pub fn resolve(module: Module) -> Result<ResolvedModule> {
        let mut defects = Vec::new();

        // Pass 1: declarations
        let elements = index_ids(
            module.data_elements.iter().map(DataElement::id),
            "data_elements",
            &mut defects,
        );
        let end_points = index_ids(
            module.end_points.iter().map(|e| e.id.as_str()),
            "end_points",
            &mut defects,
        );
        let partials = index_ids(
            module.partials.iter().map(|p| p.id.as_str()),
            "partials",
            &mut defects,
        );
        for element in &module.data_elements {
            check_choice_values(element, &mut defects);
        }

        // Pass 2: references
        let mut checker = ReferenceChecker {
            module: &module,
            elements: &elements,
            end_points: &end_points,
            partials: &partials,
            defects,
        };
        checker.check_module();
        let mut defects = checker.defects;

        defects.extend(find_partial_cycles(&module.partials, &partials));

        if !defects.is_empty() {
            tracing::warn!(
                "Module '{}' failed resolution with {} defect(s)",
                module.id(),
                defects.len()
            );
            for defect in &defects {
                tracing::debug!("{}", defect);
            }
            return Err(CompileError::Defects(defects));
        }

        tracing::info!(
            "Resolved module '{}' ({} elements, {} end points, {} partials)",
            module.id(),
            elements.len(),
            end_points.len(),
            partials.len()
        );

        Ok(ResolvedModule::new(module, elements, end_points, partials))
    }
}

/// Map ids to positions, reporting repeats; the first declaration wins
fn index_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    collection: &str,
    defects: &mut Vec<Defect>,
) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (pos, id) in ids.enumerate() {
        if index.contains_key(id) {
            defects.push(Defect::new(
                DefectKind::DuplicateId,
                format!("{}/{}", collection, id),
                format!("id '{}' is declared more than once", id),
            ));
        } else {
            index.insert(id.to_string(), pos);
        }
    }
    index
}

fn check_choice_values(element: &DataElement, defects: &mut Vec<Defect>) {
    let mut seen = HashSet::new();
    for option in element.options() {
        if !seen.insert(option.value.as_str()) {
            defects.push(Defect::new(
                DefectKind::DuplicateId,
                format!("data_elements/{}/choice[{}]", element.id(), option.value),
                format!(
                    "choice value '{}' is declared more than once in element '{}'",
                    option.value,
                    element.id()
                ),
            ));
        }
    }
}

/// Terminal payloads of a decision tree that carry references of their own
trait TerminalRefs {
    fn check_refs(&self, checker: &mut ReferenceChecker<'_>, location: &str);
}

impl TerminalRefs for EndPointRef {
    fn check_refs(&self, checker: &mut ReferenceChecker<'_>, location: &str) {
        if !checker.end_points.contains_key(&self.end_point_id) {
            checker.unresolved(
                location,
                format!("end point '{}' is not declared", self.end_point_id),
            );
        }
    }
}

impl TerminalRefs for TemplateContent {
    fn check_refs(&self, checker: &mut ReferenceChecker<'_>, location: &str) {
        checker.check_template(self, location);
    }
}

struct ReferenceChecker<'a> {
    module: &'a Module,
    elements: &'a HashMap<String, usize>,
    end_points: &'a HashMap<String, usize>,
    partials: &'a HashMap<String, usize>,
    defects: Vec<Defect>,
}

impl<'a> ReferenceChecker<'a> {
    fn check_module(&mut self) {
        let module = self.module;

        for element in &module.data_elements {
            if let DataElement::Computed { common, value_expr } = element {
                let location = format!("data_elements/{}", common.id);
                self.check_next(value_expr, &location);
            }
        }

        if let Some(rules) = &module.rules {
            self.check_decision_point(rules, "rules");
        }

        for end_point in &module.end_points {
            for (i, text) in end_point.report_texts.iter().enumerate() {
                let location = format!("end_points/{}/{}[{}]", end_point.id, text.section, i);
                self.check_template(&text.content, &location);
            }
        }

        for partial in &module.partials {
            let location = format!("partials/{}", partial.id);
            self.check_template(&partial.content, &location);
        }
    }

    fn check_decision_point<T: TerminalRefs>(&mut self, point: &DecisionPoint<T>, parent: &str) {
        let location = format!("{}/{}", parent, point.id);
        let scope = point.data_element_id.as_deref();

        if let Some(scope_id) = scope {
            self.check_element(scope_id, &location);
        }

        for (i, branch) in point.branches.iter().enumerate() {
            let branch_location = format!("{}/branch[{}]", location, i);
            self.check_condition(
                &branch.condition,
                scope,
                &format!("{}/condition", branch_location),
            );
            self.check_not_relevant(&branch.not_relevant, &branch_location);
            self.check_next(&branch.next, &branch_location);
        }

        let default_location = format!("{}/default", location);
        self.check_not_relevant(&point.default_branch.not_relevant, &default_location);
        self.check_next(&point.default_branch.next, &default_location);
    }

    fn check_next<T: TerminalRefs>(&mut self, next: &Next<T>, location: &str) {
        match next {
            Next::Nested(point) => self.check_decision_point(point, location),
            Next::Terminal(terminal) => terminal.check_refs(self, location),
        }
    }

    fn check_not_relevant(&mut self, ids: &[String], location: &str) {
        for id in ids {
            self.check_element(id, &format!("{}/not_relevant", location));
        }
    }

    fn check_condition(&mut self, condition: &Condition, scope: Option<&str>, location: &str) {
        match condition {
            Condition::And(children) | Condition::Or(children) | Condition::Not(children) => {
                for (i, child) in children.iter().enumerate() {
                    self.check_condition(child, scope, &format!("{}/{}", location, i));
                }
            }
            Condition::Compare(comparison) => match (&comparison.element_id, scope) {
                (Some(id), _) => self.check_element(id, location),
                // scope itself is checked once at its decision point
                (None, Some(_)) => {}
                (None, None) => self.defects.push(Defect::new(
                    DefectKind::UnscopedComparison,
                    location,
                    format!(
                        "'{}' comparison against '{}' names no data element and has no enclosing scope",
                        comparison.op, comparison.operand
                    ),
                )),
            },
            Condition::HasAnyNChoices { element_id, .. } | Condition::Contains { element_id, .. } => {
                self.check_element(element_id, location);
            }
            Condition::ChoiceRef {
                element_id,
                choice_value,
            } => self.check_choice_ref(element_id, choice_value, location),
        }
    }

    fn check_choice_ref(&mut self, element_id: &str, choice_value: &str, location: &str) {
        let module = self.module;
        let element = match self.elements.get(element_id) {
            Some(&pos) => &module.data_elements[pos],
            None => {
                self.unresolved(location, format!("data element '{}' is not declared", element_id));
                return;
            }
        };

        if !element.is_choice() {
            self.unresolved(
                location,
                format!(
                    "choice '{}' refers to {} element '{}', which has no choices",
                    choice_value,
                    element.kind(),
                    element_id
                ),
            );
        } else if element.option(choice_value).is_none() {
            self.unresolved(
                location,
                format!(
                    "choice '{}' is not declared by element '{}'",
                    choice_value, element_id
                ),
            );
        }
    }

    fn check_template(&mut self, content: &TemplateContent, location: &str) {
        for (i, node) in content.nodes.iter().enumerate() {
            let node_location = format!("{}/{}", location, i);
            match node {
                TemplateNode::Literal(_) => {}
                TemplateNode::InsertValue { element_id, .. } => {
                    self.check_element(element_id, &node_location);
                }
                TemplateNode::InsertPartial { partial_id } => {
                    if !self.partials.contains_key(partial_id) {
                        self.unresolved(
                            &node_location,
                            format!("partial '{}' is not declared", partial_id),
                        );
                    }
                }
                TemplateNode::SectionIf { element_id, body }
                | TemplateNode::SectionIfNot { element_id, body }
                | TemplateNode::SectionIfValue { element_id, body, .. }
                | TemplateNode::SectionIfValueNot { element_id, body, .. } => {
                    self.check_element(element_id, &node_location);
                    self.check_template(body, &node_location);
                }
            }
        }
    }

    fn check_element(&mut self, element_id: &str, location: &str) {
        if !self.elements.contains_key(element_id) {
            self.unresolved(location, format!("data element '{}' is not declared", element_id));
        }
    }

    fn unresolved(&mut self, location: &str, reason: String) {
        self.defects
            .push(Defect::new(DefectKind::UnresolvedReference, location, reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::ast::*;

    fn base() -> Module {
        Module::new(Metadata::new("m", "Module"))
            .with_element(DataElement::Integer {
                common: ElementCommon::new("E1", "Count"),
                min: None,
                max: None,
            })
            .with_end_point(EndPoint::new("A"))
            .with_end_point(EndPoint::new("B"))
    }

    #[test]
    fn test_resolves_clean_module() {
        let module = base().with_rules(
            DecisionPoint::new("dp", DefaultBranch::new(Next::end_point("B")))
                .scoped_to("E1")
                .with_branch(Branch::new(Condition::greater_than("3"), Next::end_point("A"))),
        );

        let resolved = ReferenceResolver::resolve(module).unwrap();
        assert_eq!(resolved.id(), "m");
        assert!(resolved.element("E1").is_some());
        assert!(resolved.end_point("A").is_some());
        assert!(resolved.element("missing").is_none());
    }

    #[test]
    fn test_unscoped_comparison() {
        let module = base().with_rules(
            DecisionPoint::new("dp", DefaultBranch::new(Next::end_point("B")))
                .with_branch(Branch::new(Condition::greater_than("3"), Next::end_point("A"))),
        );

        let err = ReferenceResolver::resolve(module).unwrap_err();
        let defects = err.defects();
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].kind, DefectKind::UnscopedComparison);
        assert_eq!(defects[0].location, "rules/dp/branch[0]/condition");
    }

    #[test]
    fn test_explicit_element_needs_no_scope() {
        let module = base().with_rules(
            DecisionPoint::new("dp", DefaultBranch::new(Next::end_point("B"))).with_branch(
                Branch::new(
                    Condition::Compare(Comparison::new(ComparisonOp::Equal, "1").on("E1")),
                    Next::end_point("A"),
                ),
            ),
        );
        assert!(ReferenceResolver::resolve(module).is_ok());
    }

    #[test]
    fn test_choice_ref_against_non_choice_element() {
        let module = base().with_rules(
            DecisionPoint::new("dp", DefaultBranch::new(Next::end_point("B")))
                .with_branch(Branch::new(Condition::choice("E1", "x"), Next::end_point("A"))),
        );

        let err = ReferenceResolver::resolve(module).unwrap_err();
        assert_eq!(err.defects()[0].kind, DefectKind::UnresolvedReference);
        assert!(err.defects()[0].reason.contains("no choices"));
    }

    #[test]
    fn test_error_message_lists_defects() {
        let module = base().with_end_point(EndPoint::new("A"));
        let err = ReferenceResolver::resolve(module).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Module has 1 defect(s)"));
        assert!(message.contains("end_points/A"));
    }
}
