// src/lib.rs - Library interface for internal module access

#![allow(non_snake_case)]

pub mod cache;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod font_config;
pub mod pipeline;
pub mod plot_framework;
pub mod plot_functions;
pub mod side_names;
pub mod test_definition;

pub use error::{InsufficientData, KcError, KcResult};
pub use pipeline::{process_report, ResultSet};
pub use test_definition::{Protocol, TestDefinition};

// Expose crate version; a git describe injected at build time wins over the package version.
pub fn crate_version() -> &'static str {
    option_env!("VERGEN_GIT_SEMVER").unwrap_or(env!("CARGO_PKG_VERSION"))
}
