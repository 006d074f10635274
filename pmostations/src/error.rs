//! Error types for the station catalog

use std::path::PathBuf;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the station table
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The station table could not be read
    #[error("Cannot read station table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error (from pmoconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}
