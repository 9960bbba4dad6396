//! A module whose references are known to resolve

use assist_core::ast::{DataElement, DecisionPoint, EndPoint, EndPointRef, Module, TemplatePartial};
use std::collections::HashMap;

/// Validated module with id lookups.
///
/// Owns the parsed [`Module`]; the indexes hold positions into its vectors.
/// Immutable after construction and safe to share behind `Arc`.
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    module: Module,
    elements: HashMap<String, usize>,
    end_points: HashMap<String, usize>,
    partials: HashMap<String, usize>,
}

impl ResolvedModule {
    pub(crate) fn new(
        module: Module,
        elements: HashMap<String, usize>,
        end_points: HashMap<String, usize>,
        partials: HashMap<String, usize>,
    ) -> Self {
        Self {
            module,
            elements,
            end_points,
            partials,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn id(&self) -> &str {
        self.module.id()
    }

    /// Rule set version, when the module declares one
    pub fn version(&self) -> Option<&str> {
        self.module.metadata.rule_set_version.as_deref()
    }

    pub fn rules(&self) -> Option<&DecisionPoint<EndPointRef>> {
        self.module.rules.as_ref()
    }

    /// Look up a data element by id
    pub fn element(&self, id: &str) -> Option<&DataElement> {
        self.elements.get(id).map(|&i| &self.module.data_elements[i])
    }

    pub fn end_point(&self, id: &str) -> Option<&EndPoint> {
        self.end_points.get(id).map(|&i| &self.module.end_points[i])
    }

    pub fn partial(&self, id: &str) -> Option<&TemplatePartial> {
        self.partials.get(id).map(|&i| &self.module.partials[i])
    }

    /// Data elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &DataElement> {
        self.module.data_elements.iter()
    }

    pub fn into_module(self) -> Module {
        self.module
    }
}
