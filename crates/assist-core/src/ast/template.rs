//! Template content definitions
//!
//! Template content is an ordered list of nodes that renders to report prose.
//! Conditional sections nest their own content, so the structure is a tree.

use serde::{Deserialize, Serialize};

/// Ordered template nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContent {
    pub nodes: Vec<TemplateNode>,
}

/// A single template directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateNode {
    /// Text emitted verbatim
    Literal(String),
    /// The answer of an element
    InsertValue {
        element_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        significant_digits: Option<u32>,
    },
    /// A named partial rendered inline
    InsertPartial { partial_id: String },
    /// `body` when the element has any answer
    SectionIf {
        element_id: String,
        body: TemplateContent,
    },
    /// `body` when the element has no answer
    SectionIfNot {
        element_id: String,
        body: TemplateContent,
    },
    /// `body` when the element's answer equals `operand`
    SectionIfValue {
        element_id: String,
        operand: String,
        body: TemplateContent,
    },
    /// `body` when the element's answer does not equal `operand`
    SectionIfValueNot {
        element_id: String,
        operand: String,
        body: TemplateContent,
    },
}

/// A reusable, named template fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePartial {
    pub id: String,
    pub content: TemplateContent,
}

impl TemplateContent {
    pub fn new(nodes: Vec<TemplateNode>) -> Self {
        Self { nodes }
    }

    /// Content holding one literal
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![TemplateNode::literal(text)])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of partials referenced anywhere in this content, in document order
    pub fn partial_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_partials(&mut refs);
        refs
    }

    fn collect_partials<'a>(&'a self, refs: &mut Vec<&'a str>) {
        for node in &self.nodes {
            match node {
                TemplateNode::InsertPartial { partial_id } => refs.push(partial_id),
                TemplateNode::SectionIf { body, .. }
                | TemplateNode::SectionIfNot { body, .. }
                | TemplateNode::SectionIfValue { body, .. }
                | TemplateNode::SectionIfValueNot { body, .. } => body.collect_partials(refs),
                TemplateNode::Literal(_) | TemplateNode::InsertValue { .. } => {}
            }
        }
    }
}

impl From<Vec<TemplateNode>> for TemplateContent {
    fn from(nodes: Vec<TemplateNode>) -> Self {
        Self::new(nodes)
    }
}

impl TemplateNode {
    pub fn literal(text: impl Into<String>) -> Self {
        TemplateNode::Literal(text.into())
    }

    pub fn insert_value(element_id: impl Into<String>) -> Self {
        TemplateNode::InsertValue {
            element_id: element_id.into(),
            significant_digits: None,
        }
    }

    pub fn insert_rounded(element_id: impl Into<String>, significant_digits: u32) -> Self {
        TemplateNode::InsertValue {
            element_id: element_id.into(),
            significant_digits: Some(significant_digits),
        }
    }

    pub fn insert_partial(partial_id: impl Into<String>) -> Self {
        TemplateNode::InsertPartial {
            partial_id: partial_id.into(),
        }
    }

    pub fn section_if(element_id: impl Into<String>, body: impl Into<TemplateContent>) -> Self {
        TemplateNode::SectionIf {
            element_id: element_id.into(),
            body: body.into(),
        }
    }

    pub fn section_if_not(element_id: impl Into<String>, body: impl Into<TemplateContent>) -> Self {
        TemplateNode::SectionIfNot {
            element_id: element_id.into(),
            body: body.into(),
        }
    }

    pub fn section_if_value(
        element_id: impl Into<String>,
        operand: impl Into<String>,
        body: impl Into<TemplateContent>,
    ) -> Self {
        TemplateNode::SectionIfValue {
            element_id: element_id.into(),
            operand: operand.into(),
            body: body.into(),
        }
    }

    pub fn section_if_value_not(
        element_id: impl Into<String>,
        operand: impl Into<String>,
        body: impl Into<TemplateContent>,
    ) -> Self {
        TemplateNode::SectionIfValueNot {
            element_id: element_id.into(),
            operand: operand.into(),
            body: body.into(),
        }
    }
}

impl TemplatePartial {
    pub fn new(id: impl Into<String>, content: impl Into<TemplateContent>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}
