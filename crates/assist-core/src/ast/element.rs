//! Data element definitions

use super::decision::Next;
use super::template::TemplateContent;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields every data element carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCommon {
    /// Unique id, referenced from conditions and templates
    pub id: String,

    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagrams: Vec<Diagram>,

    /// External common-data-element code, opaque to the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cde_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_sequence: Option<u32>,
}

impl ElementCommon {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }
}

/// An illustration attached to an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Clickable image whose areas select choice values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMap {
    pub location: String,
    pub areas: Vec<ImageMapArea>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMapArea {
    pub shape: String,
    pub coords: String,
    pub choice_value: String,
}

/// One selectable value of a choice or multi-choice element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_text: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            report_text: None,
            is_default: false,
        }
    }

    pub fn with_report_text(mut self, text: impl Into<String>) -> Self {
        self.report_text = Some(text.into());
        self
    }

    /// Text inserted into reports for this option
    pub fn display_text(&self) -> &str {
        self.report_text.as_deref().unwrap_or(&self.label)
    }
}

/// Data element kind without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Global,
    Integer,
    Numeric,
    Choice,
    MultiChoice,
    Computed,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Global => "global",
            ElementKind::Integer => "integer",
            ElementKind::Numeric => "numeric",
            ElementKind::Choice => "choice",
            ElementKind::MultiChoice => "multi_choice",
            ElementKind::Computed => "computed",
        };
        f.write_str(name)
    }
}

/// A clinical input field of a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataElement {
    /// A constant value shared by the module
    Global {
        #[serde(flatten)]
        common: ElementCommon,
        value: String,
    },
    Integer {
        #[serde(flatten)]
        common: ElementCommon,
        min: Option<i64>,
        max: Option<i64>,
    },
    Numeric {
        #[serde(flatten)]
        common: ElementCommon,
        min: Option<BigDecimal>,
        max: Option<BigDecimal>,
        units: Option<String>,
    },
    Choice {
        #[serde(flatten)]
        common: ElementCommon,
        options: Vec<ChoiceOption>,
        #[serde(default)]
        allow_free_text: bool,
        image_map: Option<ImageMap>,
    },
    MultiChoice {
        #[serde(flatten)]
        common: ElementCommon,
        options: Vec<ChoiceOption>,
        image_map: Option<ImageMap>,
    },
    /// Value derived from other answers
    Computed {
        #[serde(flatten)]
        common: ElementCommon,
        value_expr: Next<TemplateContent>,
    },
}

impl DataElement {
    pub fn common(&self) -> &ElementCommon {
        match self {
            DataElement::Global { common, .. }
            | DataElement::Integer { common, .. }
            | DataElement::Numeric { common, .. }
            | DataElement::Choice { common, .. }
            | DataElement::MultiChoice { common, .. }
            | DataElement::Computed { common, .. } => common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }

    pub fn label(&self) -> &str {
        &self.common().label
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            DataElement::Global { .. } => ElementKind::Global,
            DataElement::Integer { .. } => ElementKind::Integer,
            DataElement::Numeric { .. } => ElementKind::Numeric,
            DataElement::Choice { .. } => ElementKind::Choice,
            DataElement::MultiChoice { .. } => ElementKind::MultiChoice,
            DataElement::Computed { .. } => ElementKind::Computed,
        }
    }

    /// Declared options of choice and multi-choice elements; empty otherwise
    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            DataElement::Choice { options, .. } | DataElement::MultiChoice { options, .. } => {
                options
            }
            _ => &[],
        }
    }

    /// Option with the given value
    pub fn option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options().iter().find(|o| o.value == value)
    }

    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            DataElement::Choice { .. } | DataElement::MultiChoice { .. }
        )
    }

    /// Whether the element admits answers outside its declared options
    pub fn allows_free_text(&self) -> bool {
        matches!(
            self,
            DataElement::Choice {
                allow_free_text: true,
                ..
            }
        )
    }
}
