mod config;
mod logging;
mod output;

use std::path::PathBuf;
use std::time::Instant;

use clap::{ArgAction, Args, Parser, Subcommand};
use hsim_core::SchemaGraph;
use hsim_eval::{
    EvalError, IntegrityVerifier, dataset_json_schema, default_collections, parse_dataset,
    render_report, resolve_collections,
};
use hsim_generate::{GenerationEngine, GenerationError};
use thiserror::Error;

use config::HsimConfig;
use logging::init_logging;
use output::{emit, write_bytes_atomic, write_json_atomic};

#[derive(Debug, Error)]
enum CliError {
    #[error("schema error: {0}")]
    Schema(#[from] hsim_core::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("verification error: {0}")]
    Eval(#[from] EvalError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "hsim", version, about = "Synthetic HTAN dataset generator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic dataset from a JSON-LD schema.
    Generate(GenerateArgs),
    /// Check a dataset's structure and cross-record references.
    Verify(VerifyArgs),
    /// Print the JSON Schema of the dataset document.
    DatasetSchema(DatasetSchemaArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON-LD schema graph.
    #[arg(long)]
    schema: PathBuf,
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output path for the dataset; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Override the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the participants per atlas.
    #[arg(long)]
    participants: Option<usize>,
    /// Override the samples per participant.
    #[arg(long)]
    samples: Option<usize>,
    /// Write the generation report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Dataset document to check.
    #[arg(long)]
    dataset: PathBuf,
    /// TOML configuration file; its templates select the assay collections.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Exit with an error when violations are found.
    #[arg(long)]
    strict: bool,
    /// Write a markdown report.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Violations listed in the report.
    #[arg(long)]
    max_examples: Option<usize>,
}

#[derive(Args, Debug)]
struct DatasetSchemaArgs {
    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Verify(args) => run_verify(args),
        Command::DatasetSchema(args) => run_dataset_schema(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut options = HsimConfig::load(args.config.as_deref())?.generate;
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    if let Some(participants) = args.participants {
        options.participants = participants;
    }
    if let Some(samples) = args.samples {
        options.samples_per_participant = samples;
    }

    let graph = SchemaGraph::load(&args.schema)?;
    tracing::info!(
        schema = %args.schema.display(),
        nodes = graph.len(),
        fingerprint = %graph.fingerprint(),
        "schema loaded"
    );

    let result = GenerationEngine::new(options).run(&graph)?;
    let data = serde_json::to_vec_pretty(&result.dataset)?;
    emit(args.out.as_deref(), &data)?;
    if let Some(path) = args.out.as_deref() {
        tracing::info!(path = %path.display(), bytes = data.len(), "dataset written");
    }

    if let Some(path) = args.report.as_deref() {
        write_json_atomic(path, &result.report)?;
        tracing::info!(path = %path.display(), "generation report written");
    }
    Ok(())
}

fn run_verify(args: VerifyArgs) -> Result<(), CliError> {
    let timer = Instant::now();
    let config = HsimConfig::load(args.config.as_deref())?;
    let strict = args.strict || config.verify.strict;
    let max_examples = args.max_examples.unwrap_or(config.verify.max_examples);

    let content = std::fs::read_to_string(&args.dataset)?;
    let document: serde_json::Value = serde_json::from_str(&content)?;
    let dataset = parse_dataset(&document)?;

    let collections = match args.config {
        Some(_) => resolve_collections(&dataset, &config.generate.templates),
        None => default_collections(),
    };

    let verifier = IntegrityVerifier::new(&dataset, &collections)?;
    for message in verifier.error_list() {
        println!("{message}");
    }

    if let Some(path) = args.report.as_deref() {
        let rendered = render_report(verifier.report(), max_examples);
        write_bytes_atomic(path, rendered.as_bytes())?;
        tracing::info!(path = %path.display(), "verification report written");
    }

    let violations = verifier.report().violation_count();
    tracing::info!(
        dataset = %args.dataset.display(),
        violations,
        warnings = verifier.warnings().len(),
        duration_ms = timer.elapsed().as_millis() as u64,
        "verification finished"
    );

    if strict && violations > 0 {
        return Err(EvalError::Violations(violations).into());
    }
    Ok(())
}

fn run_dataset_schema(args: DatasetSchemaArgs) -> Result<(), CliError> {
    let schema = dataset_json_schema()?;
    let data = serde_json::to_vec_pretty(&schema)?;
    emit(args.out.as_deref(), &data)
}
