//! Runtime settings, read once at startup.
//!
//! Sources, highest priority first:
//! - command-line flags (`--host`, `--port`, `--pipeline`)
//! - process environment
//! - a `.env` file (loaded with `dotenvy`, never overriding real variables)
//! - built-in defaults
//!
//! Variable names match in any case, the exact uppercase spelling first.
//!
//! Only type coercion is checked here. Whether the artifact path exists is a
//! question for the model holder at load time.

use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_PIPELINE_PATH: &str = "artifacts/random_forest_class_weight_pipeline.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Log line format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pipeline_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pipeline_path: PathBuf::from(DEFAULT_PIPELINE_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Load `.env` (if any) and read settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let vars: Vec<(String, String)> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::from_lookup(|key| lookup_ignore_case(&vars, key))
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let port = match lookup("APP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::new(
                    2,
                    format!("Invalid APP_PORT '{raw}': expected an integer between 0 and 65535."),
                )
            })?,
            None => defaults.port,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => parse_log_format(&raw)?,
            None => defaults.log_format,
        };

        Ok(Self {
            pipeline_path: lookup("PIPELINE_PATH").map(PathBuf::from).unwrap_or(defaults.pipeline_path),
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port,
            log_format,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>, pipeline: Option<PathBuf>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(pipeline) = pipeline {
            self.pipeline_path = pipeline;
        }
        self
    }

    /// `host:port`, as accepted by `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Exact name first, then any casing of it (`app_port` for `APP_PORT`).
fn lookup_ignore_case(vars: &[(String, String)], key: &str) -> Option<String> {
    vars.iter()
        .find(|(k, _)| k == key)
        .or_else(|| vars.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)))
        .map(|(_, v)| v.clone())
}

fn parse_log_format(raw: &str) -> Result<LogFormat, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "compact" | "text" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => Err(AppError::new(
            2,
            format!("Invalid LOG_FORMAT '{other}': expected `compact` or `json`."),
        )),
    }
}
