//! Template rendering
//!
//! Renders template content to report text. Partials are rendered inline, so
//! rendering `InsertPartial(p)` produces exactly what rendering `p`'s content
//! in place would.

use assist_compiler::ResolvedModule;
use assist_core::ast::{DataElement, EndPoint, SectionId, TemplateContent, TemplateNode};
use assist_core::types::{parse_decimal, round_half_up};
use assist_core::AnswerSet;
use std::collections::BTreeMap;

pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Render `content` against `answers`
    pub fn render(content: &TemplateContent, answers: &AnswerSet, module: &ResolvedModule) -> String {
        let mut out = String::new();
        Self::render_into(content, answers, module, &mut out);
        out
    }

    fn render_into(
        content: &TemplateContent,
        answers: &AnswerSet,
        module: &ResolvedModule,
        out: &mut String,
    ) {
        for node in &content.nodes {
            match node {
                TemplateNode::Literal(text) => out.push_str(text),
                TemplateNode::InsertValue {
                    element_id,
                    significant_digits,
                } => out.push_str(&Self::insert_value(
                    element_id,
                    *significant_digits,
                    answers,
                    module,
                )),
                TemplateNode::InsertPartial { partial_id } => match module.partial(partial_id) {
                    Some(partial) => Self::render_into(&partial.content, answers, module, out),
                    None => tracing::warn!("Partial '{}' not found while rendering", partial_id),
                },
                TemplateNode::SectionIf { element_id, body } => {
                    if Self::has_value(element_id, answers, module) {
                        Self::render_into(body, answers, module, out);
                    }
                }
                TemplateNode::SectionIfNot { element_id, body } => {
                    if !Self::has_value(element_id, answers, module) {
                        Self::render_into(body, answers, module, out);
                    }
                }
                TemplateNode::SectionIfValue {
                    element_id,
                    operand,
                    body,
                } => {
                    if Self::value_matches(element_id, operand, answers) {
                        Self::render_into(body, answers, module, out);
                    }
                }
                TemplateNode::SectionIfValueNot {
                    element_id,
                    operand,
                    body,
                } => {
                    if !Self::value_matches(element_id, operand, answers) {
                        Self::render_into(body, answers, module, out);
                    }
                }
            }
        }
    }

    /// Text inserted for an element's answer; empty when unanswered
    fn insert_value(
        element_id: &str,
        significant_digits: Option<u32>,
        answers: &AnswerSet,
        module: &ResolvedModule,
    ) -> String {
        let element = module.element(element_id);

        let Some(answer) = answers.answered(element_id) else {
            return match element {
                Some(DataElement::Global { value, .. }) => value.clone(),
                _ => String::new(),
            };
        };

        answer
            .values()
            .into_iter()
            .map(|value| display_value(element, value, significant_digits))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn has_value(element_id: &str, answers: &AnswerSet, module: &ResolvedModule) -> bool {
        answers.has_answer(element_id)
            || matches!(
                module.element(element_id),
                Some(DataElement::Global { value, .. }) if !value.trim().is_empty()
            )
    }

    fn value_matches(element_id: &str, operand: &str, answers: &AnswerSet) -> bool {
        answers
            .answered(element_id)
            .map(|answer| answer.contains_value(operand))
            .unwrap_or(false)
    }
}

fn display_value(element: Option<&DataElement>, value: &str, significant_digits: Option<u32>) -> String {
    if let Some(option) = element.and_then(|e| e.option(value)) {
        let text = option.display_text();
        if !text.is_empty() {
            return text.to_string();
        }
    }
    if let Some(places) = significant_digits {
        if let Some(number) = parse_decimal(value) {
            return round_half_up(&number, places);
        }
    }
    value.to_string()
}

/// Render the requested sections of an end point.
///
/// Several report texts for one section are concatenated in document order.
/// Sections the end point has no text for are left out; an empty `sections`
/// renders every section the end point defines.
pub fn render_end_point(
    end_point: &EndPoint,
    sections: &[SectionId],
    answers: &AnswerSet,
    module: &ResolvedModule,
) -> BTreeMap<SectionId, String> {
    let wanted = if sections.is_empty() {
        end_point.sections()
    } else {
        sections.to_vec()
    };

    let mut rendered = BTreeMap::new();
    for section in wanted {
        let mut texts = end_point.texts_for(section).peekable();
        if texts.peek().is_none() {
            continue;
        }
        let text: String = texts
            .map(|t| TemplateRenderer::render(&t.content, answers, module))
            .collect();
        rendered.insert(section, text);
    }
    rendered
}
