//! Error types for the xsaccessor CLI

use std::path::PathBuf;
use thiserror::Error;
use xsaccessor_intern::InternError;

/// Errors that can occur while running a command
#[derive(Debug, Error)]
pub enum CliError {
    /// A replay script line could not be parsed
    #[error("{path}:{line}: {message}")]
    Replay {
        /// Script being replayed
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Interning rejected the input
    #[error(transparent)]
    Intern(#[from] InternError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
