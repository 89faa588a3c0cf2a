//! Error types for the frequency pipelines

use std::path::PathBuf;

use thiserror::Error;

use crate::morphology::MorphologyError;

/// Errors surfaced by the core
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    Decode { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("schema mismatch in table `{table}`: {reason}")]
    SchemaMismatch { table: String, reason: String },

    #[error("duplicate key `{key}` in table `{table}`")]
    DuplicateKey { table: String, key: String },

    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("corrupt storage unit: {0}")]
    Corrupt(String),

    #[error("failed to encode storage unit: {0}")]
    Codec(#[from] bincode::Error),

    #[error(transparent)]
    Morphology(#[from] MorphologyError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn schema(table: &str, reason: impl Into<String>) -> Self {
        Error::SchemaMismatch {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
