//! Element set summaries
//!
//! Flat description of a module's data elements, shaped for storage by a
//! persistence layer.

use assist_core::ast::{DataElement, ElementKind, Module};
use serde::{Deserialize, Serialize};

/// Summary of one module's data elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSet {
    pub module_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub elements: Vec<ElementSummary>,
}

/// One data element as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSummary {
    pub id: String,
    pub label: String,
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cde_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,
    /// Allowed values of choice elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ElementValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementValue {
    pub value: String,
    pub label: String,
}

/// Summarize `module` for persistence.
///
/// Elements with a display sequence come first in that order, the rest
/// follow in document order.
pub fn element_set(module: &Module) -> ElementSet {
    let mut elements: Vec<&DataElement> = module.data_elements.iter().collect();
    elements.sort_by_key(|e| e.common().display_sequence.unwrap_or(u32::MAX));

    ElementSet {
        module_id: module.id().to_string(),
        name: module.metadata.label.clone(),
        version: module.metadata.rule_set_version.clone(),
        description: module.metadata.description.clone(),
        elements: elements.into_iter().map(summarize).collect(),
    }
}

fn summarize(element: &DataElement) -> ElementSummary {
    let common = element.common();
    let (units, minimum, maximum) = match element {
        DataElement::Integer { min, max, .. } => (
            None,
            min.map(|v| v.to_string()),
            max.map(|v| v.to_string()),
        ),
        DataElement::Numeric { min, max, units, .. } => (
            units.clone(),
            min.as_ref().map(ToString::to_string),
            max.as_ref().map(ToString::to_string),
        ),
        _ => (None, None, None),
    };

    ElementSummary {
        id: common.id.clone(),
        label: common.label.clone(),
        kind: element.kind(),
        cde_id: common.cde_id.clone(),
        hint: common.hint.clone(),
        required: common.is_required.unwrap_or(false),
        units,
        minimum,
        maximum,
        values: element
            .options()
            .iter()
            .map(|o| ElementValue {
                value: o.value.clone(),
                label: o.label.clone(),
            })
            .collect(),
    }
}
