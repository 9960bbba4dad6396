//! XML Parser
//!
//! Reads XML text into a small element tree and provides typed field helpers
//! for the module parsers. Element and attribute names are stored without their
//! namespace prefix, and namespace declarations are dropped.

use crate::error::{ParseError, Result};
use bigdecimal::BigDecimal;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str::FromStr;

/// An XML element with its attributes and mixed content
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: Vec<XmlContent>,
    /// Location of this element, e.g. `/ReportingModule/DataElements/ChoiceDataElement[margin]`
    pub path: String,
}

/// A piece of element content
#[derive(Debug, Clone, PartialEq)]
pub enum XmlContent {
    Element(XmlNode),
    Text(String),
}

impl XmlNode {
    /// Attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.content.iter().filter_map(|c| match c {
            XmlContent::Element(node) => Some(node),
            XmlContent::Text(_) => None,
        })
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.elements().find(|n| n.name == name)
    }

    /// All child elements with the given name
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.elements().filter(move |n| n.name == name)
    }

    /// Concatenated text content of this element and its descendants, trimmed
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    /// Text directly inside this element, ignoring child elements, trimmed
    pub fn own_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                XmlContent::Text(t) => Some(t.as_str()),
                XmlContent::Element(_) => None,
            })
            .collect::<String>()
            .trim()
            .to_string()
    }

    fn collect_text(&self, out: &mut String) {
        for item in &self.content {
            match item {
                XmlContent::Text(text) => out.push_str(text),
                XmlContent::Element(node) => node.collect_text(out),
            }
        }
    }
}

/// XML parser utilities
pub struct XmlParser;

impl XmlParser {
    /// Parse XML text into its root element
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let parent = stack.last().map(|n| n.path.as_str()).unwrap_or("");
                    let node = Self::open_node(&start, parent)?;
                    stack.push(node);
                }
                Event::Empty(start) => {
                    let parent = stack.last().map(|n| n.path.as_str()).unwrap_or("");
                    let node = Self::open_node(&start, parent)?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| ParseError::malformed("/", "unbalanced closing tag"))?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?.into_owned();
                    Self::attach_text(&mut stack, text)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    Self::attach_text(&mut stack, text)?;
                }
                Event::Eof => break,
                // declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::malformed(
                open.path.clone(),
                "document ended before element was closed",
            ));
        }

        root.ok_or_else(|| ParseError::malformed("/", "document has no root element"))
    }

    fn open_node(start: &BytesStart<'_>, parent_path: &str) -> Result<XmlNode> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let raw_key = attr.key.as_ref();
            if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        let path = match attributes.iter().find(|(k, _)| k == "Id") {
            Some((_, id)) => format!("{}/{}[{}]", parent_path, name, id),
            None => format!("{}/{}", parent_path, name),
        };

        Ok(XmlNode {
            name,
            attributes,
            content: Vec::new(),
            path,
        })
    }

    fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => {
                parent.content.push(XmlContent::Element(node));
                Ok(())
            }
            None if root.is_none() => {
                *root = Some(node);
                Ok(())
            }
            None => Err(ParseError::malformed(
                node.path,
                "document has more than one root element",
            )),
        }
    }

    fn attach_text(stack: &mut [XmlNode], text: String) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => {
                parent.content.push(XmlContent::Text(text));
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(ParseError::malformed("/", "text outside the root element")),
        }
    }

    /// Get a required attribute
    pub fn get_attr(node: &XmlNode, name: &str) -> Result<String> {
        node.attr(name)
            .map(str::to_string)
            .ok_or_else(|| ParseError::MissingField {
                path: node.path.clone(),
                field: name.to_string(),
            })
    }

    /// Get an optional attribute
    pub fn get_optional_attr(node: &XmlNode, name: &str) -> Option<String> {
        node.attr(name).map(str::to_string)
    }

    /// Get an optional boolean attribute (`true`/`false`/`1`/`0`)
    pub fn get_optional_bool(node: &XmlNode, name: &str) -> Result<Option<bool>> {
        match node.attr(name).map(str::trim) {
            None => Ok(None),
            Some("true") | Some("1") => Ok(Some(true)),
            Some("false") | Some("0") => Ok(Some(false)),
            Some(other) => Err(Self::invalid(node, name, format!("'{}' is not a boolean", other))),
        }
    }

    /// Get an optional unsigned integer attribute
    pub fn get_optional_u32(node: &XmlNode, name: &str) -> Result<Option<u32>> {
        Self::get_optional_parsed(node, name, "an unsigned integer")
    }

    /// Get an optional integer attribute
    pub fn get_optional_i64(node: &XmlNode, name: &str) -> Result<Option<i64>> {
        Self::get_optional_parsed(node, name, "an integer")
    }

    /// Get an optional decimal attribute
    pub fn get_optional_decimal(node: &XmlNode, name: &str) -> Result<Option<BigDecimal>> {
        Self::get_optional_parsed(node, name, "a decimal number")
    }

    /// Get a required unsigned attribute
    pub fn get_usize(node: &XmlNode, name: &str) -> Result<usize> {
        Self::get_optional_parsed(node, name, "an unsigned integer")?.ok_or_else(|| {
            ParseError::MissingField {
                path: node.path.clone(),
                field: name.to_string(),
            }
        })
    }

    fn get_optional_parsed<T: FromStr>(
        node: &XmlNode,
        name: &str,
        expected: &str,
    ) -> Result<Option<T>> {
        match node.attr(name).map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| Self::invalid(node, name, format!("'{}' is not {}", raw, expected))),
        }
    }

    /// Trimmed text of an optional child element; blank text counts as absent
    pub fn get_child_text(node: &XmlNode, name: &str) -> Option<String> {
        node.child(name)
            .map(XmlNode::text)
            .filter(|text| !text.is_empty())
    }

    /// A value authored either as an attribute or as a child element
    pub fn get_attr_or_child(node: &XmlNode, name: &str) -> Option<String> {
        Self::get_optional_attr(node, name).or_else(|| Self::get_child_text(node, name))
    }

    /// Required child element
    pub fn get_child<'a>(node: &'a XmlNode, name: &str) -> Result<&'a XmlNode> {
        node.child(name).ok_or_else(|| ParseError::MissingField {
            path: node.path.clone(),
            field: name.to_string(),
        })
    }

    pub fn invalid(node: &XmlNode, field: &str, message: impl Into<String>) -> ParseError {
        ParseError::InvalidValue {
            path: node.path.clone(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_with_attributes_and_text() {
        let xml = r#"<?xml version="1.0"?>
<Root xmlns="urn:test" xmlns:x="urn:x">
  <!-- comment -->
  <Item Id="a" x:Flag="true">Hello &amp; bye</Item>
  <Item Id="b"/>
  <Note><![CDATA[<raw>]]></Note>
</Root>"#;

        let root = XmlParser::parse(xml).unwrap();
        assert_eq!(root.name, "Root");
        assert!(root.attributes.is_empty());
        assert_eq!(root.children("Item").count(), 2);

        let first = root.child("Item").unwrap();
        assert_eq!(first.attr("Id"), Some("a"));
        assert_eq!(first.attr("Flag"), Some("true"));
        assert_eq!(first.text(), "Hello & bye");
        assert_eq!(first.path, "/Root/Item[a]");

        assert_eq!(XmlParser::get_child_text(&root, "Note").as_deref(), Some("<raw>"));
    }

    #[test]
    fn test_mismatched_tags_fail() {
        let result = XmlParser::parse("<Root><A></B></Root>");
        assert!(matches!(result, Err(ParseError::Xml(_))));
    }

    #[test]
    fn test_unclosed_document_fails() {
        let result = XmlParser::parse("<Root><A>");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_document_fails() {
        let result = XmlParser::parse("   ");
        assert!(matches!(result, Err(ParseError::MalformedDocument { .. })));
    }

    #[test]
    fn test_typed_attribute_helpers() {
        let node = XmlParser::parse(
            r#"<E Required="1" Seq="4" Min="-2" Max="2.5" Bad="x" Count="3"/>"#,
        )
        .unwrap();

        assert_eq!(XmlParser::get_optional_bool(&node, "Required").unwrap(), Some(true));
        assert_eq!(XmlParser::get_optional_u32(&node, "Seq").unwrap(), Some(4));
        assert_eq!(XmlParser::get_optional_i64(&node, "Min").unwrap(), Some(-2));
        assert!(XmlParser::get_optional_decimal(&node, "Max").unwrap().is_some());
        assert_eq!(XmlParser::get_usize(&node, "Count").unwrap(), 3);
        assert!(XmlParser::get_optional_u32(&node, "Bad").is_err());
        assert!(XmlParser::get_optional_bool(&node, "Bad").is_err());
        assert!(matches!(
            XmlParser::get_attr(&node, "Missing"),
            Err(ParseError::MissingField { .. })
        ));
    }
}
