//! Error types for the planner core. None of these are fatal: callers turn them
//! into "contributes nothing" plus a status line.

use thiserror::Error;

use crate::import::ImportKind;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available in this environment")]
    Unavailable,
    #[error("failed to read `{key}`: {message}")]
    Read { key: String, message: String },
    #[error("failed to write `{key}`: {message}")]
    Write { key: String, message: String },
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Error parsing {filename}: {source}")]
    Parse {
        filename: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Error reading {filename}: {message}")]
    Read { filename: String, message: String },
    #[error("Skipped {filename}: unrecognized shape")]
    Unclassified { filename: String },
    #[error("Skipped {filename}: no {kind} records found")]
    NoRecords { filename: String, kind: ImportKind },
}
