//! `credit-risk-api` library crate.
//!
//! The binary (`credit-api`) is a thin wrapper around this library so that:
//!
//! - validation, model execution, and HTTP handlers are testable in-process
//! - the router can be mounted by other hosts or driven directly in tests
//! - offline subcommands reuse exactly the code path the server uses

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod telemetry;
