//! xsaccessor CLI library
//!
//! Command implementations are exposed here for programmatic use and testing.

pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use error::CliError;
pub use output::{OutputFormat, Report};
