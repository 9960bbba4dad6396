//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use assist_sdk::{AnswerSet, AssistEngine, EngineBuilder, EvaluationReport, EvaluationRequest};
use std::path::Path;

pub const THYROID: &str = include_str!("../../../../fixtures/modules/thyroid_nodule.xml");

/// Engine with the thyroid module preloaded
pub fn thyroid_engine() -> AssistEngine {
    EngineBuilder::new()
        .add_module_content(THYROID)
        .build()
        .expect("fixture module loads")
}

/// Parse answers from JSON
pub fn answers(json: &str) -> AnswerSet {
    serde_json::from_str(json).expect("answers are valid JSON")
}

/// Evaluate the thyroid module with all sections rendered
pub fn evaluate_thyroid(json: &str) -> EvaluationReport {
    let engine = thyroid_engine();
    let module = engine.load_str(THYROID).expect("fixture module loads");
    engine.evaluate(&module, &answers(json), &EvaluationRequest::new())
}

/// Write `xml` as `<dir>/<id>.xml`
pub fn write_module(dir: &Path, id: &str, xml: &str) {
    std::fs::write(dir.join(format!("{}.xml", id)), xml).expect("module file written");
}
