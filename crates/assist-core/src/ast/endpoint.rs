//! End point definitions
//!
//! An end point is a terminal outcome of the rules tree. It carries the report
//! text templates for each report section plus optional diagnosis and
//! follow-up data.

use super::template::TemplateContent;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Report section a piece of report text belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Findings,
    Impression,
    Recommendation,
    ImpressionRecommendation,
    Citation,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Findings,
        SectionId::Impression,
        SectionId::Recommendation,
        SectionId::ImpressionRecommendation,
        SectionId::Citation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Findings => "findings",
            SectionId::Impression => "impression",
            SectionId::Recommendation => "recommendation",
            SectionId::ImpressionRecommendation => "impressionRecommendation",
            SectionId::Citation => "citation",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = CoreError;

    /// Section names are matched case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidValue(format!("unknown report section '{}'", s)))
    }
}

/// Templated text for one report section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportText {
    pub section: SectionId,
    pub content: TemplateContent,
}

/// Actionable finding attached to an end point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionableFinding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub text: String,
}

/// Follow-up imaging recommended by an end point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingFollowup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Terminal outcome of the module rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndPoint {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,

    /// Report texts in document order
    pub report_texts: Vec<ReportText>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_finding: Option<ActionableFinding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub imaging_followup: Option<ImagingFollowup>,
}

impl EndPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            diagnosis: None,
            report_texts: Vec::new(),
            actionable_finding: None,
            imaging_followup: None,
        }
    }

    /// Add report text for a section
    pub fn with_text(mut self, section: SectionId, content: impl Into<TemplateContent>) -> Self {
        self.report_texts.push(ReportText {
            section,
            content: content.into(),
        });
        self
    }

    /// Report texts of one section, in document order
    pub fn texts_for(&self, section: SectionId) -> impl Iterator<Item = &ReportText> {
        self.report_texts.iter().filter(move |t| t.section == section)
    }

    /// Sections this end point has text for, without repeats
    pub fn sections(&self) -> Vec<SectionId> {
        let mut sections: Vec<SectionId> = Vec::new();
        for text in &self.report_texts {
            if !sections.contains(&text.section) {
                sections.push(text.section);
            }
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_id_parse() {
        assert_eq!("findings".parse::<SectionId>().unwrap(), SectionId::Findings);
        assert_eq!(
            "ImpressionRecommendation".parse::<SectionId>().unwrap(),
            SectionId::ImpressionRecommendation
        );
        assert!("summary".parse::<SectionId>().is_err());
    }

    #[test]
    fn test_section_id_serde_camel_case() {
        let json = serde_json::to_string(&SectionId::ImpressionRecommendation).unwrap();
        assert_eq!(json, r#""impressionRecommendation""#);
    }

    #[test]
    fn test_texts_for_and_sections() {
        let end_point = EndPoint::new("A")
            .with_text(SectionId::Findings, TemplateContent::text("one"))
            .with_text(SectionId::Impression, TemplateContent::text("two"))
            .with_text(SectionId::Findings, TemplateContent::text("three"));

        assert_eq!(end_point.texts_for(SectionId::Findings).count(), 2);
        assert_eq!(
            end_point.sections(),
            vec![SectionId::Findings, SectionId::Impression]
        );
    }
}
