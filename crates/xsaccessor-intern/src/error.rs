//! Error types for the interning registries

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type for interning operations
pub type Result<T> = std::result::Result<T, InternError>;

/// Errors that can occur while interning keys or resolving array positions
#[derive(Debug, Error)]
pub enum InternError {
    /// Key length was negative
    #[error("Negative key length: {len}")]
    NegativeLength {
        /// Length supplied by the caller
        len: i32,
    },

    /// Key length runs past the end of the supplied bytes
    #[error("Key length {len} exceeds the {available} bytes supplied")]
    LengthOutOfBounds {
        /// Length supplied by the caller
        len: i32,
        /// Bytes actually available
        available: usize,
    },

    /// External array position was negative
    #[error("Negative array position: {0}")]
    NegativePosition(i64),

    /// Growing a table failed
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// A registry ran out of representable ids
    #[error("Id space exhausted in {registry} registry")]
    IdSpaceExhausted {
        /// Which registry overflowed
        registry: &'static str,
    },

    /// Growth factor below the accepted minimum
    #[error("Invalid growth factor {0}: must be a finite value >= 1.5")]
    InvalidGrowthFactor(f64),

    /// The process-wide context was already created
    #[error("Process-wide interning context is already initialized")]
    AlreadyInitialized,

    /// IO errors while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
