//! Parser for template content
//!
//! Template content is mixed XML content: text interleaved with directive
//! elements. Whitespace that only lays out the XML (a run of whitespace
//! containing a line break at the start or end of a text node) is dropped;
//! all other text is kept verbatim.

use crate::error::{ParseError, Result};
use crate::xml_parser::{XmlContent, XmlNode, XmlParser};
use assist_core::ast::{TemplateContent, TemplateNode, TemplatePartial};

pub struct TemplateParser;

impl TemplateParser {
    /// Parse the mixed content of `node` into template content
    pub fn parse_content(node: &XmlNode) -> Result<TemplateContent> {
        let mut nodes = Vec::new();

        for item in &node.content {
            match item {
                XmlContent::Text(text) => {
                    let text = strip_layout(text);
                    if !text.is_empty() {
                        nodes.push(TemplateNode::Literal(text.to_string()));
                    }
                }
                XmlContent::Element(child) => nodes.push(Self::parse_directive(child)?),
            }
        }

        Ok(TemplateContent::new(nodes))
    }

    /// Parse a `TemplatePartial` element
    pub fn parse_partial(node: &XmlNode) -> Result<TemplatePartial> {
        let id = XmlParser::get_attr(node, "Id")?;
        let content = Self::parse_content(node)?;
        Ok(TemplatePartial { id, content })
    }

    fn parse_directive(node: &XmlNode) -> Result<TemplateNode> {
        match node.name.as_str() {
            "InsertValue" => Ok(TemplateNode::InsertValue {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                significant_digits: XmlParser::get_optional_u32(node, "SignificantDigits")?,
            }),
            "InsertPartial" => Ok(TemplateNode::InsertPartial {
                partial_id: XmlParser::get_attr(node, "PartialId")?,
            }),
            "SectionIf" => Ok(TemplateNode::SectionIf {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                body: Self::parse_content(node)?,
            }),
            "SectionIfNot" => Ok(TemplateNode::SectionIfNot {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                body: Self::parse_content(node)?,
            }),
            "SectionIfValue" => Ok(TemplateNode::SectionIfValue {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                operand: XmlParser::get_attr(node, "ComparisonValue")?,
                body: Self::parse_content(node)?,
            }),
            "SectionIfValueNot" => Ok(TemplateNode::SectionIfValueNot {
                element_id: XmlParser::get_attr(node, "DataElementId")?,
                operand: XmlParser::get_attr(node, "ComparisonValue")?,
                body: Self::parse_content(node)?,
            }),
            "NewLine" => Ok(TemplateNode::literal("\n")),
            other => Err(ParseError::malformed(
                node.path.clone(),
                format!("unknown template directive '{}'", other),
            )),
        }
    }
}

/// Drop leading and trailing whitespace runs that contain a line break.
fn strip_layout(text: &str) -> &str {
    let start = text.len() - text.trim_start().len();
    let text = if text[..start].contains('\n') {
        &text[start..]
    } else {
        text
    };

    let trimmed_end = text.trim_end();
    if text[trimmed_end.len()..].contains('\n') {
        trimmed_end
    } else {
        text
    }
}
