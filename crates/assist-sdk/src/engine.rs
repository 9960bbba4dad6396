//! AssistEngine - loads modules and evaluates answers against them

use crate::cache::{CacheStats, ModuleCache, ModuleKey};
use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::source::{FileSystemSource, ModuleSource};
use assist_compiler::{ReferenceResolver, ResolvedModule};
use assist_core::ast::{ActionableFinding, ImagingFollowup};
use assist_core::{AnswerSet, SectionId, TypeMismatch};
use assist_parser::ModuleParser;
use assist_runtime::{render_end_point, ComputedValueEvaluator, DecisionTreeWalker};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Options for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Sections to render; empty falls back to the engine's default sections
    #[serde(default)]
    pub sections: Vec<SectionId>,
}

impl EvaluationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sections(mut self, sections: Vec<SectionId>) -> Self {
        self.sections = sections;
        self
    }
}

/// Outcome of evaluating one answer set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub module_id: String,

    /// Reached end point; `None` when the module has no rules
    pub end_point_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,

    /// Elements excluded along the taken path
    pub not_relevant: BTreeSet<String>,

    /// Values of computed elements
    pub computed: BTreeMap<String, String>,

    /// Rendered report text by section
    pub sections: BTreeMap<SectionId, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_finding: Option<ActionableFinding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub imaging_followup: Option<ImagingFollowup>,

    /// Decision points visited and the branch taken at each
    pub path: Vec<String>,

    /// Answers that could not be compared numerically
    pub mismatches: Vec<TypeMismatch>,
}

/// Engine for loading and evaluating reporting modules
pub struct AssistEngine {
    config: EngineConfig,
    cache: ModuleCache,
    source: Option<Arc<dyn ModuleSource>>,
}

impl AssistEngine {
    /// Create an engine; a configured module directory becomes its source
    pub fn new(config: EngineConfig) -> Self {
        let source = config
            .module_dir
            .as_ref()
            .map(|dir| Arc::new(FileSystemSource::new(dir.clone())) as Arc<dyn ModuleSource>);
        Self {
            config,
            cache: ModuleCache::new(),
            source,
        }
    }

    /// Create an engine reading modules from `source`
    pub fn with_source(config: EngineConfig, source: Arc<dyn ModuleSource>) -> Self {
        Self {
            config,
            cache: ModuleCache::new(),
            source: Some(source),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Parse and resolve a module document.
    ///
    /// With the cache enabled, a module whose id and rule set version are
    /// already cached is returned without being resolved again.
    pub fn load_str(&self, xml: &str) -> Result<Arc<ResolvedModule>> {
        let module = ModuleParser::parse(xml)?;

        if !self.config.cache_enabled {
            return Ok(Arc::new(ReferenceResolver::resolve(module)?));
        }

        let key = ModuleKey::from(&module);
        let resolved = self
            .cache
            .get_or_try_insert(key, || ReferenceResolver::resolve(module))?;

        tracing::info!(
            "Loaded module '{}' (version {})",
            resolved.id(),
            resolved.version().unwrap_or("unversioned")
        );
        Ok(resolved)
    }

    /// Load a module by id from the configured source
    pub async fn load(&self, id: &str) -> Result<Arc<ResolvedModule>> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| SdkError::ConfigError("no module source configured".to_string()))?;

        let xml = source.fetch(id).await?;
        let module = self.load_str(&xml)?;

        if module.id() != id {
            tracing::warn!("Module stored as '{}' declares id '{}'", id, module.id());
        }
        Ok(module)
    }

    /// Ids of the modules available from the configured source
    pub async fn available_modules(&self) -> Result<Vec<String>> {
        match &self.source {
            Some(source) => source.list().await,
            None => Ok(Vec::new()),
        }
    }

    /// Evaluate `answers` against a loaded module
    pub fn evaluate(
        &self,
        module: &ResolvedModule,
        answers: &AnswerSet,
        request: &EvaluationRequest,
    ) -> EvaluationReport {
        let computed = ComputedValueEvaluator::evaluate(module, answers);
        let answers = computed.overlay(answers);
        let walk = DecisionTreeWalker::walk(module, &answers);

        let sections = if request.sections.is_empty() {
            &self.config.default_sections
        } else {
            &request.sections
        };

        let end_point = walk
            .end_point_id
            .as_deref()
            .and_then(|id| module.end_point(id));

        let rendered = end_point
            .map(|ep| render_end_point(ep, sections, &answers, module))
            .unwrap_or_default();

        let mut mismatches = computed.mismatches;
        mismatches.extend(walk.mismatches);
        for mismatch in &mismatches {
            tracing::warn!("{}", mismatch);
        }

        tracing::info!(
            "Evaluated module '{}': end point {:?}, {} excluded, {} section(s)",
            module.id(),
            walk.end_point_id,
            walk.not_relevant.len(),
            rendered.len()
        );

        EvaluationReport {
            module_id: module.id().to_string(),
            end_point_id: walk.end_point_id.clone(),
            diagnosis: end_point.and_then(|ep| ep.diagnosis.clone()),
            not_relevant: walk.not_relevant,
            computed: computed.values,
            sections: rendered,
            actionable_finding: end_point.and_then(|ep| ep.actionable_finding.clone()),
            imaging_followup: end_point.and_then(|ep| ep.imaging_followup.clone()),
            path: walk.path,
            mismatches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<ReportingModule>
  <Metadata><ID>minimal</ID><RuleSetVersion>1</RuleSetVersion></Metadata>
  <DataElements><IntegerDataElement Id="n" Label="N"/></DataElements>
</ReportingModule>"#;

    #[test]
    fn test_load_str_caches() {
        let engine = AssistEngine::new(EngineConfig::new());
        let first = engine.load_str(MINIMAL).unwrap();
        let second = engine.load_str(MINIMAL).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.cache_stats().hits, 1);
    }

    #[test]
    fn test_load_str_without_cache() {
        let engine = AssistEngine::new(EngineConfig::new().enable_cache(false));
        let first = engine.load_str(MINIMAL).unwrap();
        let second = engine.load_str(MINIMAL).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_module_without_rules_reports_nothing() {
        let engine = AssistEngine::new(EngineConfig::new());
        let module = engine.load_str(MINIMAL).unwrap();
        let report = engine.evaluate(&module, &AnswerSet::new().with("n", 1i64), &EvaluationRequest::new());
        assert_eq!(report.module_id, "minimal");
        assert!(report.end_point_id.is_none());
        assert!(report.sections.is_empty());
    }

    #[tokio::test]
    async fn test_load_without_source() {
        let engine = AssistEngine::new(EngineConfig::new());
        assert!(matches!(engine.load("minimal").await, Err(SdkError::ConfigError(_))));
        assert!(engine.available_modules().await.unwrap().is_empty());
    }
}
