//! Command-line parsing for the loan approval API.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! server and model code. Every flag here is an override; unset flags fall
//! back to the environment (see `config`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "credit-api", version, about = "Loan approval classification API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the model and serve the HTTP API (default).
    Serve(ServeArgs),
    /// Validate and score one applicant JSON file without starting a server.
    Predict(PredictArgs),
    /// Load a model artifact and print a summary of it.
    Inspect(InspectArgs),
    /// Ask a running server whether its model is loaded.
    ///
    /// Exits 0 when the pipeline is loaded, 3 when the server answers but has
    /// no model, and 4 when the server cannot be reached. Suitable as a
    /// container health check.
    Probe(ProbeArgs),
}

#[derive(Debug, Parser, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides APP_HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides APP_PORT).
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Model artifact path (overrides PIPELINE_PATH).
    #[arg(long, value_name = "JSON")]
    pub pipeline: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Applicant JSON file (same body as `POST /predict`).
    #[arg(short = 'i', long, value_name = "JSON")]
    pub input: PathBuf,

    /// Model artifact path (overrides PIPELINE_PATH).
    #[arg(long, value_name = "JSON")]
    pub pipeline: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct InspectArgs {
    /// Model artifact path (overrides PIPELINE_PATH).
    #[arg(long, value_name = "JSON")]
    pub pipeline: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ProbeArgs {
    /// Full health URL. Defaults to `http://APP_HOST:APP_PORT/health`.
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::parse_from(["credit-api", "serve", "--host", "0.0.0.0", "-p", "9000"]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.pipeline, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn predict_requires_input() {
        assert!(Cli::try_parse_from(["credit-api", "predict"]).is_err());
        let cli = Cli::parse_from(["credit-api", "predict", "-i", "a.json"]);
        assert!(matches!(cli.command, Command::Predict(PredictArgs { ref input, .. }) if input == &PathBuf::from("a.json")));
    }

    #[test]
    fn probe_has_default_timeout() {
        let cli = Cli::parse_from(["credit-api", "probe"]);
        match cli.command {
            Command::Probe(args) => {
                assert_eq!(args.timeout, 5);
                assert_eq!(args.url, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
