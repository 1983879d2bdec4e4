//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - reads settings from the environment / `.env`
//! - installs the tracing subscriber
//! - dispatches to the server or one of the offline subcommands

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::cli::{Command, InspectArgs, PredictArgs, ProbeArgs, ServeArgs};
use crate::config::Settings;
use crate::domain::validation::parse_applicant;
use crate::error::AppError;
use crate::models::{ArtifactError, Pipeline};

pub mod holder;
pub mod server;

/// Entry point for the `credit-api` binary.
pub fn run() -> Result<(), AppError> {
    // `credit-api` and `credit-api --port 9000` both mean `credit-api serve ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let settings = Settings::from_env()?;
    crate::telemetry::init(settings.log_format);

    match cli.command {
        Command::Serve(args) => handle_serve(args, settings),
        Command::Predict(args) => handle_predict(args, settings),
        Command::Inspect(args) => handle_inspect(args, settings),
        Command::Probe(args) => handle_probe(args, settings),
    }
}

fn handle_serve(args: ServeArgs, settings: Settings) -> Result<(), AppError> {
    let settings = settings.with_overrides(args.host, args.port, args.pipeline);
    server::serve(&settings)
}

fn handle_predict(args: PredictArgs, settings: Settings) -> Result<(), AppError> {
    let settings = settings.with_overrides(None, None, args.pipeline);
    let pipeline = load_for_cli(&settings.pipeline_path)?;

    let body = std::fs::read(&args.input)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", args.input.display())))?;

    let record = match parse_applicant(&body) {
        Ok(record) => record,
        Err(errors) => {
            let detail = serde_json::json!({ "detail": errors.errors });
            println!("{}", serde_json::to_string_pretty(&detail).unwrap_or_default());
            return Err(AppError::new(3, errors.to_string()));
        }
    };

    let result = pipeline
        .score(&record)
        .map_err(|e| AppError::new(4, format!("Erro durante a predição: {e}")))?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| AppError::new(4, format!("Failed to encode prediction: {e}")))?;
    println!("{json}");
    Ok(())
}

fn handle_inspect(args: InspectArgs, settings: Settings) -> Result<(), AppError> {
    let settings = settings.with_overrides(None, None, args.pipeline);
    let pipeline = load_for_cli(&settings.pipeline_path)?;
    print!("{}", crate::report::format_pipeline_summary(&pipeline, &settings.pipeline_path));
    Ok(())
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
    pipeline_loaded: bool,
}

fn handle_probe(args: ProbeArgs, settings: Settings) -> Result<(), AppError> {
    let url = args.url.unwrap_or_else(|| health_url(&settings));

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(&url)
        .send()
        .map_err(|e| AppError::new(4, format!("Health check to {url} failed: {e}")))?;
    if !response.status().is_success() {
        return Err(AppError::new(4, format!("Health check to {url} returned {}", response.status())));
    }
    let body: HealthBody = response
        .json()
        .map_err(|e| AppError::new(4, format!("Unexpected health response from {url}: {e}")))?;

    println!("{}", crate::report::format_probe(&url, &body.status, body.pipeline_loaded));
    if body.pipeline_loaded {
        Ok(())
    } else {
        Err(AppError::new(3, "Server is up but the model pipeline is not loaded."))
    }
}

/// Load an artifact for an offline subcommand, mapping failures to exit codes.
fn load_for_cli(path: &Path) -> Result<Pipeline, AppError> {
    crate::io::load_pipeline(path).map_err(|e| match e {
        ArtifactError::Read(_) => AppError::new(2, e.to_string()),
        _ => AppError::new(3, e.to_string()),
    })
}

/// Health URL of the locally configured server. A wildcard bind address is
/// probed through loopback.
fn health_url(settings: &Settings) -> String {
    let host = match settings.host.as_str() {
        "0.0.0.0" => "127.0.0.1",
        "::" | "[::]" => "[::1]",
        other => other,
    };
    let probe = Settings {
        host: host.to_string(),
        ..settings.clone()
    };
    format!("http://{}/health", probe.bind_addr())
}

/// Rewrite argv so `credit-api` defaults to `credit-api serve`.
///
/// Rules:
/// - `credit-api`                     -> `credit-api serve`
/// - `credit-api --port 9000 ...`     -> `credit-api serve --port 9000 ...`
/// - `credit-api --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
    }
    argv
}
