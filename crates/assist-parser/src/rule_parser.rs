//! Rule parser
//!
//! Parses `DecisionPoint` trees and their conditions. The same tree shape is
//! used by the module rules (terminating in `EndPointRef`) and by computed data
//! elements (terminating in `ComputedValue`); [`Terminal`] selects which.

use crate::error::{ParseError, Result};
use crate::template_parser::TemplateParser;
use crate::xml_parser::{XmlNode, XmlParser};
use assist_core::ast::{
    Branch, Comparison, ComparisonOp, Condition, DecisionPoint, DefaultBranch, EndPointRef, Next,
    TemplateContent,
};

/// Terminal node of a decision tree
pub trait Terminal: Sized {
    /// Element name of the terminal
    const TAG: &'static str;

    fn parse_terminal(node: &XmlNode) -> Result<Self>;
}

impl Terminal for EndPointRef {
    const TAG: &'static str = "EndPointRef";

    fn parse_terminal(node: &XmlNode) -> Result<Self> {
        Ok(EndPointRef {
            end_point_id: XmlParser::get_attr(node, "EndPointId")?,
        })
    }
}

impl Terminal for TemplateContent {
    const TAG: &'static str = "ComputedValue";

    fn parse_terminal(node: &XmlNode) -> Result<Self> {
        TemplateParser::parse_content(node)
    }
}

/// Rule parser
pub struct RuleParser;

impl RuleParser {
    /// Parse a `DecisionPoint` element
    pub fn parse_decision_point<T: Terminal>(node: &XmlNode) -> Result<DecisionPoint<T>> {
        let id = XmlParser::get_attr(node, "Id")?;
        let label = XmlParser::get_attr_or_child(node, "Label");
        let data_element_id = XmlParser::get_optional_attr(node, "DataElementId");

        let branches = node
            .children("Branch")
            .map(Self::parse_branch)
            .collect::<Result<Vec<_>>>()?;

        let mut defaults = node.children("DefaultBranch");
        let default_node = defaults.next().ok_or_else(|| {
            ParseError::malformed(node.path.clone(), "decision point has no DefaultBranch")
        })?;
        if defaults.next().is_some() {
            return Err(ParseError::malformed(
                node.path.clone(),
                "decision point has more than one DefaultBranch",
            ));
        }
        let default_branch = Self::parse_default_branch(default_node)?;

        Ok(DecisionPoint {
            id,
            label,
            data_element_id,
            branches,
            default_branch,
        })
    }

    fn parse_branch<T: Terminal>(node: &XmlNode) -> Result<Branch<T>> {
        reject_unknown_children(node, |name| {
            is_condition_tag(name) || is_branch_part::<T>(name)
        })?;

        let mut conditions = node.elements().filter(|n| is_condition_tag(&n.name));
        let condition_node = conditions
            .next()
            .ok_or_else(|| ParseError::malformed(node.path.clone(), "branch has no condition"))?;
        if conditions.next().is_some() {
            return Err(ParseError::malformed(
                node.path.clone(),
                "branch has more than one condition; combine them with AndCondition or OrCondition",
            ));
        }

        Ok(Branch {
            label: XmlParser::get_attr_or_child(node, "Label"),
            condition: Self::parse_condition(condition_node)?,
            not_relevant: Self::parse_not_relevant(node)?,
            next: Self::parse_next(node)?,
        })
    }

    fn parse_default_branch<T: Terminal>(node: &XmlNode) -> Result<DefaultBranch<T>> {
        reject_unknown_children(node, is_branch_part::<T>)?;

        Ok(DefaultBranch {
            label: XmlParser::get_attr_or_child(node, "Label"),
            not_relevant: Self::parse_not_relevant(node)?,
            next: Self::parse_next(node)?,
        })
    }

    fn parse_not_relevant(node: &XmlNode) -> Result<Vec<String>> {
        match node.child("NotRelevantDataElements") {
            Some(list) => list
                .children("DataElementRef")
                .map(|r| XmlParser::get_attr(r, "DataElementId"))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    fn parse_next<T: Terminal>(node: &XmlNode) -> Result<Next<T>> {
        let mut targets = node
            .elements()
            .filter(|n| n.name == "DecisionPoint" || n.name == T::TAG);

        let target = targets.next().ok_or_else(|| {
            ParseError::malformed(
                node.path.clone(),
                format!("branch leads nowhere; expected DecisionPoint or {}", T::TAG),
            )
        })?;
        if targets.next().is_some() {
            return Err(ParseError::malformed(
                node.path.clone(),
                "branch has more than one target",
            ));
        }

        if target.name == "DecisionPoint" {
            Ok(Next::Nested(Box::new(Self::parse_decision_point(target)?)))
        } else {
            Ok(Next::Terminal(T::parse_terminal(target)?))
        }
    }

    /// Parse a condition element
    pub fn parse_condition(node: &XmlNode) -> Result<Condition> {
        let comparison = |op: ComparisonOp| -> Result<Condition> {
            Ok(Condition::Compare(Comparison {
                op,
                element_id: XmlParser::get_optional_attr(node, "DataElementId"),
                operand: XmlParser::get_attr(node, "ComparisonValue")?,
            }))
        };

        match node.name.as_str() {
            "AndCondition" => {
                let children = Self::parse_children(node)?;
                if children.len() < 2 {
                    return Err(ParseError::malformed(
                        node.path.clone(),
                        "AndCondition needs at least two conditions",
                    ));
                }
                Ok(Condition::And(children))
            }
            "OrCondition" => Ok(Condition::Or(Self::parse_non_empty_children(node)?)),
            "NotCondition" => Ok(Condition::Not(Self::parse_non_empty_children(node)?)),
            "EqualCondition" => comparison(ComparisonOp::Equal),
            "GreaterThanCondition" => comparison(ComparisonOp::GreaterThan),
            "LessThanCondition" => comparison(ComparisonOp::LessThan),
            "GreaterThanOrEqualsCondition" => comparison(ComparisonOp::GreaterOrEqual),
            "LessThanOrEqualsCondition" => comparison(ComparisonOp::LessOrEqual),
            "HasAnyNChoicesCondition" => Ok(Condition::HasAnyNChoices {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                minimum_choices: XmlParser::get_usize(node, "MinimumChoices")?,
            }),
            "ContainsCondition" => Ok(Condition::Contains {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                operand: XmlParser::get_attr(node, "ComparisonValue")?,
            }),
            "ChoiceRef" => Ok(Condition::ChoiceRef {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                choice_value: XmlParser::get_attr(node, "ChoiceValue")?,
            }),
            other => Err(ParseError::malformed(
                node.path.clone(),
                format!("unknown condition '{}'", other),
            )),
        }
    }

    /// Every child of a group is a condition; only `Label` is skipped
    fn parse_children(node: &XmlNode) -> Result<Vec<Condition>> {
        node.elements()
            .filter(|n| n.name != "Label")
            .map(Self::parse_condition)
            .collect()
    }

    fn parse_non_empty_children(node: &XmlNode) -> Result<Vec<Condition>> {
        let children = Self::parse_children(node)?;
        if children.is_empty() {
            return Err(ParseError::malformed(
                node.path.clone(),
                format!("{} needs at least one condition", node.name),
            ));
        }
        Ok(children)
    }
}

/// Condition elements end in `Condition`, plus the `ChoiceRef` shorthand.
fn is_condition_tag(name: &str) -> bool {
    name.ends_with("Condition") || name == "ChoiceRef"
}

fn is_branch_part<T: Terminal>(name: &str) -> bool {
    matches!(name, "Label" | "NotRelevantDataElements" | "DecisionPoint") || name == T::TAG
}

fn reject_unknown_children(node: &XmlNode, allowed: impl Fn(&str) -> bool) -> Result<()> {
    match node.elements().find(|child| !allowed(&child.name)) {
        Some(child) => Err(ParseError::malformed(
            child.path.clone(),
            format!("unexpected element '{}' in {}", child.name, node.name),
        )),
        None => Ok(()),
    }
}
