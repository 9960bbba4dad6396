//! Data element parser

use crate::error::{ParseError, Result};
use crate::rule_parser::RuleParser;
use crate::template_parser::TemplateParser;
use crate::xml_parser::{XmlNode, XmlParser};
use assist_core::ast::{
    ChoiceOption, DataElement, Diagram, ElementCommon, ImageMap, ImageMapArea, Next,
    TemplateContent,
};

/// Data element parser
pub struct ElementParser;

impl ElementParser {
    /// Parse every element of a `DataElements` block, in document order
    pub fn parse_elements(node: &XmlNode) -> Result<Vec<DataElement>> {
        node.elements().map(Self::parse_element).collect()
    }

    /// Parse a single data element, selected by tag name
    pub fn parse_element(node: &XmlNode) -> Result<DataElement> {
        let common = Self::parse_common(node)?;

        match node.name.as_str() {
            "GlobalValue" => Ok(DataElement::Global {
                value: XmlParser::get_optional_attr(node, "Value")
                    .unwrap_or_else(|| node.own_text()),
                common,
            }),
            "IntegerDataElement" => Ok(DataElement::Integer {
                min: XmlParser::get_optional_i64(node, "Minimum")?,
                max: XmlParser::get_optional_i64(node, "Maximum")?,
                common,
            }),
            "NumericDataElement" => Ok(DataElement::Numeric {
                min: XmlParser::get_optional_decimal(node, "Minimum")?,
                max: XmlParser::get_optional_decimal(node, "Maximum")?,
                units: XmlParser::get_attr_or_child(node, "Units"),
                common,
            }),
            "ChoiceDataElement" => Ok(DataElement::Choice {
                options: Self::parse_options(node)?,
                allow_free_text: XmlParser::get_optional_bool(node, "AllowFreetext")?
                    .unwrap_or(false),
                image_map: Self::parse_image_map(node)?,
                common,
            }),
            "MultiChoiceDataElement" => Ok(DataElement::MultiChoice {
                options: Self::parse_options(node)?,
                image_map: Self::parse_image_map(node)?,
                common,
            }),
            "ComputedDataElement" => Ok(DataElement::Computed {
                value_expr: Self::parse_value_expr(node)?,
                common,
            }),
            other => Err(ParseError::malformed(
                node.path.clone(),
                format!("unknown data element '{}'", other),
            )),
        }
    }

    fn parse_common(node: &XmlNode) -> Result<ElementCommon> {
        let diagrams = match node.child("Diagrams") {
            Some(list) => list
                .children("Diagram")
                .map(|d| {
                    let location = XmlParser::get_attr_or_child(d, "Location").ok_or_else(|| {
                        ParseError::MissingField {
                            path: d.path.clone(),
                            field: "Location".to_string(),
                        }
                    })?;
                    Ok(Diagram {
                        location,
                        label: XmlParser::get_attr_or_child(d, "Label"),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(ElementCommon {
            id: XmlParser::get_attr(node, "Id")?,
            label: XmlParser::get_attr_or_child(node, "Label").unwrap_or_default(),
            hint: XmlParser::get_attr_or_child(node, "Hint"),
            diagrams,
            cde_id: XmlParser::get_optional_attr(node, "CdeId"),
            is_required: XmlParser::get_optional_bool(node, "IsRequired")?,
            display_sequence: XmlParser::get_optional_u32(node, "DisplaySequence")?,
        })
    }

    fn parse_options(node: &XmlNode) -> Result<Vec<ChoiceOption>> {
        let info = XmlParser::get_child(node, "ChoiceInfo")?;
        info.children("Choice")
            .map(|choice| {
                let value = XmlParser::get_attr_or_child(choice, "Value").ok_or_else(|| {
                    ParseError::MissingField {
                        path: choice.path.clone(),
                        field: "Value".to_string(),
                    }
                })?;
                Ok(ChoiceOption {
                    label: XmlParser::get_attr_or_child(choice, "Label")
                        .unwrap_or_else(|| value.clone()),
                    report_text: XmlParser::get_attr_or_child(choice, "ReportText"),
                    is_default: XmlParser::get_optional_bool(choice, "IsDefault")?.unwrap_or(false),
                    value,
                })
            })
            .collect()
    }

    fn parse_image_map(node: &XmlNode) -> Result<Option<ImageMap>> {
        let Some(map) = node.child("ImageMap") else {
            return Ok(None);
        };

        let location = XmlParser::get_attr_or_child(map, "Location").ok_or_else(|| {
            ParseError::MissingField {
                path: map.path.clone(),
                field: "Location".to_string(),
            }
        })?;

        // areas may sit directly under ImageMap or inside a Map wrapper
        let area_parent = map.child("Map").unwrap_or(map);
        let areas = area_parent
            .children("Area")
            .map(|area| {
                Ok(ImageMapArea {
                    shape: XmlParser::get_attr(area, "Shape")?,
                    coords: XmlParser::get_attr(area, "Coords")?,
                    choice_value: XmlParser::get_attr(area, "ChoiceValue")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(ImageMap { location, areas }))
    }

    fn parse_value_expr(node: &XmlNode) -> Result<Next<TemplateContent>> {
        if let Some(dp) = node.child("DecisionPoint") {
            return Ok(Next::Nested(Box::new(RuleParser::parse_decision_point(dp)?)));
        }
        if let Some(value) = node.child("ComputedValue") {
            return Ok(Next::Terminal(TemplateParser::parse_content(value)?));
        }
        Err(ParseError::malformed(
            node.path.clone(),
            "computed element needs a DecisionPoint or ComputedValue",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::ast::ElementKind;

    fn element(xml: &str) -> Result<DataElement> {
        let node = XmlParser::parse(xml)?;
        ElementParser::parse_element(&node)
    }

    #[test]
    fn test_parse_integer_element() {
        let el = element(
            r#"<IntegerDataElement Id="E1" Label="Count" Minimum="0" Maximum="10" IsRequired="true" DisplaySequence="2" CdeId="RDE123">
                 <Hint>Number of nodules</Hint>
               </IntegerDataElement>"#,
        )
        .unwrap();

        match el {
            DataElement::Integer { common, min, max } => {
                assert_eq!(common.id, "E1");
                assert_eq!(common.label, "Count");
                assert_eq!(common.hint.as_deref(), Some("Number of nodules"));
                assert_eq!(common.cde_id.as_deref(), Some("RDE123"));
                assert_eq!(common.is_required, Some(true));
                assert_eq!(common.display_sequence, Some(2));
                assert_eq!(min, Some(0));
                assert_eq!(max, Some(10));
            }
            other => panic!("Expected integer element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_numeric_element() {
        let el = element(r#"<NumericDataElement Id="E2" Minimum="0.1" Units="cm"><Label>Size</Label></NumericDataElement>"#)
            .unwrap();
        match el {
            DataElement::Numeric { common, min, max, units } => {
                assert_eq!(common.label, "Size");
                assert!(min.is_some());
                assert!(max.is_none());
                assert_eq!(units.as_deref(), Some("cm"));
            }
            other => panic!("Expected numeric element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_choice_element_with_image_map() {
        let el = element(
            r#"<ChoiceDataElement Id="E3" Label="Flag" AllowFreetext="true">
                 <Diagrams><Diagram><Location>flag.png</Location><Label>Flag diagram</Label></Diagram></Diagrams>
                 <ChoiceInfo>
                   <Choice IsDefault="true"><Value>no</Value><Label>No</Label></Choice>
                   <Choice><Value>yes</Value><Label>Yes</Label><ReportText>flag present</ReportText></Choice>
                 </ChoiceInfo>
                 <ImageMap><Location>map.png</Location><Map><Area Shape="rect" Coords="0,0,10,10" ChoiceValue="yes"/></Map></ImageMap>
               </ChoiceDataElement>"#,
        )
        .unwrap();

        assert_eq!(el.kind(), ElementKind::Choice);
        assert!(el.allows_free_text());
        assert_eq!(el.options().len(), 2);
        assert!(el.options()[0].is_default);
        assert_eq!(el.option("yes").unwrap().display_text(), "flag present");
        assert_eq!(el.common().diagrams[0].location, "flag.png");

        match el {
            DataElement::Choice { image_map: Some(map), .. } => {
                assert_eq!(map.location, "map.png");
                assert_eq!(map.areas[0].choice_value, "yes");
            }
            other => panic!("Expected choice with image map, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_multi_choice_requires_choice_info() {
        let result = element(r#"<MultiChoiceDataElement Id="E4" Label="Sites"/>"#);
        assert!(matches!(result, Err(ParseError::MissingField { .. })));
    }

    #[test]
    fn test_parse_global_and_computed() {
        let global = element(r#"<GlobalValue Id="G1">ACR TI-RADS</GlobalValue>"#).unwrap();
        assert!(matches!(global, DataElement::Global { ref value, .. } if value == "ACR TI-RADS"));

        let labelled = element(
            r#"<GlobalValue Id="g"><Label>Guideline</Label><Hint>Source</Hint>ACR</GlobalValue>"#,
        )
        .unwrap();
        assert_eq!(labelled.label(), "Guideline");
        assert!(matches!(labelled, DataElement::Global { ref value, .. } if value == "ACR"));

        let computed = element(
            r#"<ComputedDataElement Id="C1" Label="Summary"><ComputedValue>Total <InsertValue DataElementId="E1"/></ComputedValue></ComputedDataElement>"#,
        )
        .unwrap();
        match computed {
            DataElement::Computed { value_expr: Next::Terminal(content), .. } => {
                assert_eq!(content.nodes.len(), 2);
            }
            other => panic!("Expected direct computed value, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_computed_tree() {
        let computed = element(
            r#"<ComputedDataElement Id="C2">
                 <DecisionPoint Id="c2_dp" DataElementId="E1">
                   <Branch><GreaterThanCondition ComparisonValue="2"/><ComputedValue>many</ComputedValue></Branch>
                   <DefaultBranch><ComputedValue>few</ComputedValue></DefaultBranch>
                 </DecisionPoint>
               </ComputedDataElement>"#,
        )
        .unwrap();
        match computed {
            DataElement::Computed { value_expr: Next::Nested(dp), .. } => {
                assert_eq!(dp.default_branch.next, Next::Terminal(TemplateContent::text("few")));
            }
            other => panic!("Expected computed decision tree, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_element_kind() {
        let result = element(r#"<DateDataElement Id="D1"/>"#);
        assert!(matches!(result, Err(ParseError::MalformedDocument { .. })));
    }

    #[test]
    fn test_missing_id() {
        let result = element(r#"<IntegerDataElement Label="Count"/>"#);
        assert!(matches!(result, Err(ParseError::MissingField { ref field, .. }) if field == "Id"));
    }
}
