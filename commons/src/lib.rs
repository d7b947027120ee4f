//! Command-line handling shared by the build launcher.

pub mod configuration;
pub mod converter;
pub mod errors;
pub mod logging;
pub mod options;
pub mod stacktrace;
