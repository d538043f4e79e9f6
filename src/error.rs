// error.rs - Error kinds shared by every pipeline step

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building matrices, clustering or writing results
#[derive(Error, Debug)]
pub enum ClusterError {
    /// No sequences, rows or file were supplied to a step
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A configuration value that could not be corrected locally
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An external engine is not compiled in or not installed
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// An external engine ran but failed
    #[error("{tool} failed: {message}")]
    ExternalToolFailure { tool: String, message: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid FASTA record in {path}: {message}")]
    Fasta { path: PathBuf, message: String },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ClusterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClusterError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn tool(tool: &str, message: impl Into<String>) -> Self {
        ClusterError::ExternalToolFailure {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    /// Process exit code for the command-line front end
    pub fn exit_code(&self) -> i32 {
        match self {
            ClusterError::InvalidConfiguration(_) => 2,
            _ => 1,
        }
    }
}

/// Result alias used throughout the crate
pub type ClusterResult<T> = Result<T, ClusterError>;
