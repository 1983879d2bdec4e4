//! Domain types used throughout the service.
//!
//! This module defines:
//!
//! - the applicant record and its categorical fields (`applicant`)
//! - payload validation with field-level errors (`validation`)
//! - the prediction answer (`prediction`)

pub mod applicant;
pub mod prediction;
pub mod validation;

pub use applicant::*;
pub use prediction::*;
pub use validation::*;
