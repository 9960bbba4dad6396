//! Assist CLI
//!
//! Evaluates a set of answers against a reporting module and prints the
//! resulting report.
//!
//! ```text
//! assist-cli fixtures/modules/thyroid_nodule.xml answers.json --section findings
//! ```

mod config;
mod output;

use anyhow::Context;
use assist_sdk::{AnswerSet, AssistEngine, EvaluationRequest, SectionId, SdkError};
use clap::Parser;
use crate::config::CliConfig;
use crate::output::{format_report, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "assist-cli")]
#[command(about = "Evaluate answers against a reporting module", version)]
struct Cli {
    /// Module XML document
    module: PathBuf,

    /// JSON object mapping element ids to a value or list of values
    answers: PathBuf,

    /// Report section to render; repeat for several
    #[arg(long = "section", value_name = "SECTION")]
    sections: Vec<SectionId>,

    /// Output format; defaults to the configured format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = CliConfig::load()?;
    let config = loaded.config;

    init_tracing(&config.log_level)?;
    if let Some(reason) = loaded.fallback_reason {
        tracing::debug!("No usable configuration ({}), using defaults", reason);
    }

    let engine = AssistEngine::new(config.engine_config());

    let xml = tokio::fs::read_to_string(&cli.module)
        .await
        .with_context(|| format!("Failed to read module {}", cli.module.display()))?;
    let module = match engine.load_str(&xml) {
        Ok(module) => module,
        Err(SdkError::CompileError(err)) => {
            for defect in err.defects() {
                eprintln!("defect: {}", defect);
            }
            anyhow::bail!("Module {} has {} defect(s)", cli.module.display(), err.defects().len());
        }
        Err(err) => return Err(err).context("Failed to load module"),
    };

    let answers_json = tokio::fs::read_to_string(&cli.answers)
        .await
        .with_context(|| format!("Failed to read answers {}", cli.answers.display()))?;
    let answers: AnswerSet =
        serde_json::from_str(&answers_json).context("Answers must be a JSON object")?;

    let request = EvaluationRequest::new().with_sections(cli.sections);
    let report = engine.evaluate(&module, &answers, &request);

    let format = cli.format.unwrap_or(config.format);
    print!("{}", format_report(&report, format)?);
    Ok(())
}

fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
