//! Module parser
//!
//! Entry point of the crate: turns a whole module document into a [`Module`].

use crate::element_parser::ElementParser;
use crate::endpoint_parser::EndPointParser;
use crate::error::{ParseError, Result};
use crate::rule_parser::RuleParser;
use crate::xml_parser::{XmlNode, XmlParser};
use assist_core::ast::{AgeRange, ApplicableExam, EndPointRef, Metadata, Module};

/// Accepted root element names
const ROOT_ELEMENTS: [&str; 2] = ["ReportingModule", "AssistModule"];

/// Module parser
pub struct ModuleParser;

impl ModuleParser {
    /// Parse a module from XML text
    pub fn parse(xml: &str) -> Result<Module> {
        let root = XmlParser::parse(xml)?;
        let module = Self::parse_from_xml(&root)?;
        tracing::debug!(
            module_id = %module.metadata.id,
            elements = module.data_elements.len(),
            end_points = module.end_points.len(),
            partials = module.partials.len(),
            has_rules = module.rules.is_some(),
            "parsed reporting module"
        );
        Ok(module)
    }

    /// Parse a module from an already-read root element
    pub fn parse_from_xml(root: &XmlNode) -> Result<Module> {
        if !ROOT_ELEMENTS.contains(&root.name.as_str()) {
            return Err(ParseError::malformed(
                root.path.clone(),
                format!(
                    "unexpected root element '{}'; expected ReportingModule or AssistModule",
                    root.name
                ),
            ));
        }

        let metadata = Self::parse_metadata(XmlParser::get_child(root, "Metadata")?)?;
        let data_elements =
            ElementParser::parse_elements(XmlParser::get_child(root, "DataElements")?)?;

        let rules = match root.child("Rules") {
            Some(rules) => {
                let mut points = rules.children("DecisionPoint");
                let first = points.next();
                if points.next().is_some() {
                    return Err(ParseError::malformed(
                        rules.path.clone(),
                        "Rules must hold a single root DecisionPoint",
                    ));
                }
                first
                    .map(RuleParser::parse_decision_point::<EndPointRef>)
                    .transpose()?
            }
            None => None,
        };

        let (end_points, partials) = match root.child("EndPoints") {
            Some(node) => EndPointParser::parse_end_points(node)?,
            None => (Vec::new(), Vec::new()),
        };

        Ok(Module {
            metadata,
            data_elements,
            rules,
            end_points,
            partials,
        })
    }

    /// Parse the `Metadata` block
    pub fn parse_metadata(node: &XmlNode) -> Result<Metadata> {
        let id = XmlParser::get_child_text(node, "ID")
            .or_else(|| XmlParser::get_child_text(node, "Id"))
            .ok_or_else(|| ParseError::MissingField {
                path: node.path.clone(),
                field: "ID".to_string(),
            })?;

        let description = XmlParser::get_child_text(node, "Description").or_else(|| {
            node.child("Info")
                .and_then(|info| XmlParser::get_child_text(info, "Description"))
        });

        let applicable_exams = match node.child("ApplicableExams") {
            Some(exams) => exams
                .children("ApplicableExam")
                .map(|exam| {
                    let category = XmlParser::get_child_text(exam, "ExamCategory").ok_or_else(
                        || ParseError::MissingField {
                            path: exam.path.clone(),
                            field: "ExamCategory".to_string(),
                        },
                    )?;
                    Ok(ApplicableExam {
                        category,
                        name: XmlParser::get_child_text(exam, "ExamName"),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let applicable_sexes = node
            .child("ApplicableSexes")
            .map(|sexes| {
                sexes
                    .children("Sex")
                    .map(|s| s.text().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let applicable_age = match node.child("ApplicableAgeGroups") {
            Some(ages) => Some(AgeRange {
                min: XmlParser::get_optional_u32(ages, "MinimumAge")?,
                max: XmlParser::get_optional_u32(ages, "MaximumAge")?,
            }),
            None => None,
        };

        Ok(Metadata {
            label: XmlParser::get_child_text(node, "Label").unwrap_or_default(),
            id,
            schema_version: XmlParser::get_child_text(node, "SchemaVersion"),
            rule_set_version: XmlParser::get_child_text(node, "RuleSetVersion"),
            description,
            report_citation_text: XmlParser::get_child_text(node, "ReportCitationText"),
            applicable_exams,
            applicable_sexes,
            applicable_age,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_module() {
        let xml = r#"<ReportingModule>
  <Metadata><Label>Minimal</Label><ID>minimal</ID></Metadata>
  <DataElements/>
</ReportingModule>"#;

        let module = ModuleParser::parse(xml).unwrap();
        assert_eq!(module.metadata.id, "minimal");
        assert_eq!(module.metadata.label, "Minimal");
        assert!(module.data_elements.is_empty());
        assert!(module.rules.is_none());
        assert!(module.end_points.is_empty());
    }

    #[test]
    fn test_parse_assist_module_root() {
        let xml = r#"<AssistModule><Metadata><ID>m</ID></Metadata><DataElements/></AssistModule>"#;
        assert!(ModuleParser::parse(xml).is_ok());
    }

    #[test]
    fn test_wrong_root_is_malformed() {
        let xml = r#"<Module><Metadata><ID>m</ID></Metadata><DataElements/></Module>"#;
        assert!(matches!(
            ModuleParser::parse(xml),
            Err(ParseError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_missing_data_elements() {
        let xml = r#"<ReportingModule><Metadata><ID>m</ID></Metadata></ReportingModule>"#;
        assert!(matches!(
            ModuleParser::parse(xml),
            Err(ParseError::MissingField { ref field, .. }) if field == "DataElements"
        ));
    }

    #[test]
    fn test_parse_metadata_filters() {
        let xml = r#"<Metadata>
  <Label>Thyroid</Label>
  <ID>thyroid</ID>
  <SchemaVersion>1.0</SchemaVersion>
  <RuleSetVersion>2.1</RuleSetVersion>
  <Info><Description>TI-RADS</Description></Info>
  <ReportCitationText>Tessler FN et al.</ReportCitationText>
  <ApplicableExams><ApplicableExam><ExamCategory>US</ExamCategory><ExamName>Thyroid US</ExamName></ApplicableExam></ApplicableExams>
  <ApplicableSexes><Sex>Female</Sex><Sex>Male</Sex></ApplicableSexes>
  <ApplicableAgeGroups MinimumAge="18"/>
</Metadata>"#;

        let node = XmlParser::parse(xml).unwrap();
        let metadata = ModuleParser::parse_metadata(&node).unwrap();
        assert_eq!(metadata.rule_set_version.as_deref(), Some("2.1"));
        assert_eq!(metadata.schema_version.as_deref(), Some("1.0"));
        assert_eq!(metadata.description.as_deref(), Some("TI-RADS"));
        assert_eq!(metadata.report_citation_text.as_deref(), Some("Tessler FN et al."));
        assert_eq!(metadata.applicable_exams[0].category, "US");
        assert_eq!(metadata.applicable_sexes, vec!["female", "male"]);
        assert_eq!(metadata.applicable_age.unwrap().min, Some(18));
    }

    #[test]
    fn test_two_root_decision_points() {
        let xml = r#"<ReportingModule><Metadata><ID>m</ID></Metadata><DataElements/>
<Rules>
  <DecisionPoint Id="a"><DefaultBranch><EndPointRef EndPointId="A"/></DefaultBranch></DecisionPoint>
  <DecisionPoint Id="b"><DefaultBranch><EndPointRef EndPointId="A"/></DefaultBranch></DecisionPoint>
</Rules></ReportingModule>"#;
        assert!(matches!(
            ModuleParser::parse(xml),
            Err(ParseError::MalformedDocument { .. })
        ));
    }
}
