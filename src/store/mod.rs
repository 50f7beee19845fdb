//! Photo snapshot storage.
//!
//! Loads photo snapshots from JSON files or directories, applies
//! evaluation submissions and writes file snapshots back.

pub mod loader;
pub mod snapshot;

pub use loader::{load_snapshot, save_snapshot, LoadedSnapshot, SnapshotSource};
pub use snapshot::{validate_submission, PhotoSnapshot, SubmitOutcome};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, changing or saving a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to walk snapshot directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("snapshot directory {} is read-only; submit against a snapshot file", .0.display())]
    ReadOnlySource(PathBuf),

    #[error("photo not found: {0}")]
    PhotoNotFound(String),

    #[error("evaluation by {0} has no scores")]
    EmptyEvaluation(String),

    #[error("unknown criterion '{0}'")]
    UnknownCriterion(String),

    #[error("score for {criterion} must be an integer between {min} and {max}, got {value}")]
    InvalidScore {
        criterion: String,
        value: String,
        min: i64,
        max: i64,
    },
}
