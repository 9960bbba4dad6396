//! Report formatting

use assist_sdk::EvaluationReport;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary followed by the report sections
    #[default]
    Text,
    /// The full evaluation report as JSON
    Json,
}

pub fn format_report(report: &EvaluationReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_text(report: &EvaluationReport) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = writeln!(out, "Module: {}", report.module_id);

    match (&report.end_point_id, &report.diagnosis) {
        (Some(id), Some(diagnosis)) => {
            let _ = writeln!(out, "End point: {} ({})", id, diagnosis);
        }
        (Some(id), None) => {
            let _ = writeln!(out, "End point: {}", id);
        }
        (None, _) => {
            let _ = writeln!(out, "End point: none");
        }
    }

    if !report.not_relevant.is_empty() {
        let excluded: Vec<&str> = report.not_relevant.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Not relevant: {}", excluded.join(", "));
    }
    for (id, value) in &report.computed {
        let _ = writeln!(out, "Computed: {} = {}", id, value);
    }
    if let Some(finding) = &report.actionable_finding {
        match &finding.level {
            Some(level) => {
                let _ = writeln!(out, "Actionable finding (level {}): {}", level, finding.text);
            }
            None => {
                let _ = writeln!(out, "Actionable finding: {}", finding.text);
            }
        }
    }
    if let Some(followup) = &report.imaging_followup {
        let parts: Vec<&str> = [&followup.procedure, &followup.interval, &followup.text]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        let _ = writeln!(out, "Imaging follow-up: {}", parts.join(", "));
    }
    for mismatch in &report.mismatches {
        let _ = writeln!(out, "Warning: {}", mismatch);
    }

    for (section, text) in &report.sections {
        let _ = write!(out, "\n[{}]\n{}\n", section, text.trim());
    }

    out
}
