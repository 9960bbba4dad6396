//! Module definition and metadata

use super::decision::{DecisionPoint, EndPointRef};
use super::element::DataElement;
use super::endpoint::EndPoint;
use super::template::TemplatePartial;
use serde::{Deserialize, Serialize};

/// One authored reporting module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub metadata: Metadata,

    /// Data elements in document order
    pub data_elements: Vec<DataElement>,

    /// Root of the rules tree; absent when the module has no relevance gating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<DecisionPoint<EndPointRef>>,

    pub end_points: Vec<EndPoint>,

    pub partials: Vec<TemplatePartial>,
}

impl Module {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            data_elements: Vec::new(),
            rules: None,
            end_points: Vec::new(),
            partials: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn with_element(mut self, element: DataElement) -> Self {
        self.data_elements.push(element);
        self
    }

    pub fn with_rules(mut self, rules: DecisionPoint<EndPointRef>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_end_point(mut self, end_point: EndPoint) -> Self {
        self.end_points.push(end_point);
        self
    }

    pub fn with_partial(mut self, partial: TemplatePartial) -> Self {
        self.partials.push(partial);
        self
    }
}

/// Module metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub label: String,

    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    /// Version of the authored rules, used with `id` as the cache key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_set_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_citation_text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applicable_exams: Vec<ApplicableExam>,

    /// Lower-cased sex values the module applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applicable_sexes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_age: Option<AgeRange>,
}

impl Metadata {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_rule_set_version(mut self, version: impl Into<String>) -> Self {
        self.rule_set_version = Some(version.into());
        self
    }

    /// Whether the module applies to the given exam context.
    ///
    /// Each filter that the module leaves empty matches anything, and each query
    /// field left as `None` is not checked.
    pub fn applies_to(&self, query: &Applicability) -> bool {
        if let Some(category) = &query.exam_category {
            if !self.applicable_exams.is_empty()
                && !self
                    .applicable_exams
                    .iter()
                    .any(|exam| exam.category.eq_ignore_ascii_case(category))
            {
                return false;
            }
        }

        if let Some(sex) = &query.sex {
            if !self.applicable_sexes.is_empty()
                && !self
                    .applicable_sexes
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(sex))
            {
                return false;
            }
        }

        match (query.age, &self.applicable_age) {
            (Some(age), Some(range)) => range.contains(age),
            _ => true,
        }
    }
}

/// An exam the module applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicableExam {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Inclusive patient age range in years
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl AgeRange {
    pub fn contains(&self, age: u32) -> bool {
        self.min.map_or(true, |min| age >= min) && self.max.map_or(true, |max| age <= max)
    }
}

/// Exam context to test a module's applicability against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicability {
    pub exam_category: Option<String>,
    pub sex: Option<String>,
    pub age: Option<u32>,
}
