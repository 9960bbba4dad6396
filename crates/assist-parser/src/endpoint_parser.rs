//! End point parser

use crate::error::{ParseError, Result};
use crate::template_parser::TemplateParser;
use crate::xml_parser::{XmlContent, XmlNode, XmlParser};
use assist_core::ast::{
    ActionableFinding, EndPoint, ImagingFollowup, ReportText, SectionId, TemplatePartial,
};

/// End point parser
pub struct EndPointParser;

impl EndPointParser {
    /// Parse an `EndPoints` block into end points and template partials
    pub fn parse_end_points(node: &XmlNode) -> Result<(Vec<EndPoint>, Vec<TemplatePartial>)> {
        let mut end_points = Vec::new();
        let mut partials = Vec::new();

        for child in node.elements() {
            match child.name.as_str() {
                "EndPoint" => end_points.push(Self::parse_end_point(child)?),
                "TemplatePartial" => partials.push(TemplateParser::parse_partial(child)?),
                other => {
                    return Err(ParseError::malformed(
                        child.path.clone(),
                        format!("unexpected '{}' in EndPoints", other),
                    ))
                }
            }
        }

        Ok((end_points, partials))
    }

    /// Parse an `EndPoint` element
    pub fn parse_end_point(node: &XmlNode) -> Result<EndPoint> {
        // report texts may be wrapped in a ReportTexts element
        let text_parent = node.child("ReportTexts").unwrap_or(node);
        let report_texts = text_parent
            .children("ReportText")
            .map(Self::parse_report_text)
            .collect::<Result<Vec<_>>>()?;

        let actionable_finding = node.child("ActionableFinding").map(|finding| ActionableFinding {
            level: XmlParser::get_optional_attr(finding, "Level"),
            text: finding.text(),
        });

        let imaging_followup = node.child("ImagingFollowup").map(|followup| {
            let text = followup
                .content
                .iter()
                .any(|c| matches!(c, XmlContent::Text(t) if !t.trim().is_empty()))
                .then(|| followup.own_text());
            ImagingFollowup {
                procedure: XmlParser::get_attr_or_child(followup, "Procedure"),
                interval: XmlParser::get_attr_or_child(followup, "Interval"),
                text,
            }
        });

        Ok(EndPoint {
            id: XmlParser::get_attr(node, "Id")?,
            label: XmlParser::get_attr_or_child(node, "Label"),
            diagnosis: XmlParser::get_attr_or_child(node, "Diagnosis"),
            report_texts,
            actionable_finding,
            imaging_followup,
        })
    }

    fn parse_report_text(node: &XmlNode) -> Result<ReportText> {
        let raw = XmlParser::get_attr(node, "SectionId")?;
        let section = raw
            .parse::<SectionId>()
            .map_err(|e| XmlParser::invalid(node, "SectionId", e.to_string()))?;

        Ok(ReportText {
            section,
            content: TemplateParser::parse_content(node)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::ast::TemplateNode;

    #[test]
    fn test_parse_end_point() {
        let node = XmlParser::parse(
            r#"<EndPoint Id="TR5">
                 <Label>TR5</Label>
                 <Diagnosis>Highly suspicious</Diagnosis>
                 <ReportText SectionId="findings">Nodule measuring <InsertValue DataElementId="size"/> cm.</ReportText>
                 <ReportText SectionId="impression">TR5.</ReportText>
                 <ActionableFinding Level="2">Recommend biopsy</ActionableFinding>
                 <ImagingFollowup Procedure="US" Interval="1 year">Annual ultrasound</ImagingFollowup>
               </EndPoint>"#,
        )
        .unwrap();

        let end_point = EndPointParser::parse_end_point(&node).unwrap();
        assert_eq!(end_point.id, "TR5");
        assert_eq!(end_point.label.as_deref(), Some("TR5"));
        assert_eq!(end_point.diagnosis.as_deref(), Some("Highly suspicious"));
        assert_eq!(end_point.report_texts.len(), 2);
        assert_eq!(end_point.report_texts[0].section, SectionId::Findings);
        assert_eq!(
            end_point.report_texts[0].content.nodes[1],
            TemplateNode::insert_value("size")
        );

        let finding = end_point.actionable_finding.unwrap();
        assert_eq!(finding.level.as_deref(), Some("2"));
        assert_eq!(finding.text, "Recommend biopsy");

        let followup = end_point.imaging_followup.unwrap();
        assert_eq!(followup.procedure.as_deref(), Some("US"));
        assert_eq!(followup.interval.as_deref(), Some("1 year"));
        assert_eq!(followup.text.as_deref(), Some("Annual ultrasound"));
    }

    #[test]
    fn test_parse_end_points_with_partials() {
        let node = XmlParser::parse(
            r#"<EndPoints>
                 <TemplatePartial Id="intro">There is a nodule. </TemplatePartial>
                 <EndPoint Id="A"><ReportTexts><ReportText SectionId="impression"><InsertPartial PartialId="intro"/></ReportText></ReportTexts></EndPoint>
               </EndPoints>"#,
        )
        .unwrap();

        let (end_points, partials) = EndPointParser::parse_end_points(&node).unwrap();
        assert_eq!(end_points.len(), 1);
        assert_eq!(end_points[0].report_texts.len(), 1);
        assert_eq!(partials.len(), 1);
        assert_eq!(partials[0].id, "intro");
    }

    #[test]
    fn test_unknown_section_is_invalid() {
        let node = XmlParser::parse(
            r#"<EndPoint Id="A"><ReportText SectionId="summary">x</ReportText></EndPoint>"#,
        )
        .unwrap();
        assert!(matches!(
            EndPointParser::parse_end_point(&node),
            Err(ParseError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_followup_without_text() {
        let node = XmlParser::parse(
            r#"<EndPoint Id="A"><ImagingFollowup><Procedure>CT</Procedure></ImagingFollowup></EndPoint>"#,
        )
        .unwrap();
        let followup = EndPointParser::parse_end_point(&node).unwrap().imaging_followup.unwrap();
        assert_eq!(followup.procedure.as_deref(), Some("CT"));
        assert!(followup.text.is_none());
    }
}
