//! Mathematical utilities used at inference time.

pub mod activation;

pub use activation::*;
