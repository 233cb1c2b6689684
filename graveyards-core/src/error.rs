//! Error types for the graveyards core library.

use thiserror::Error;

/// Top-level error type for all graveyard operations.
#[derive(Error, Debug)]
pub enum GraveyardError {
    /// The name cannot be used as a graveyard (empty, path separators, ...).
    #[error("Invalid graveyard name: {0:?}")]
    InvalidName(String),

    /// A document for this graveyard already exists.
    #[error("Graveyard already exists: {0}")]
    GraveyardExists(String),

    /// No document exists for this graveyard.
    #[error("Graveyard not found: {0}")]
    GraveyardNotFound(String),

    /// A graveyard document could not be parsed.
    #[error("Parse error in {file}: {message}")]
    Parse {
        /// Offending file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// A graveyard document could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, GraveyardError>;
