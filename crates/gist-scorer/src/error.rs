//! Error types for affinity scoring.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoreError>;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error(transparent)]
    Common(#[from] gist_common::GistError),

    #[error(transparent)]
    Extract(#[from] gist_molecules::ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Index {index} out of range for dataset of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Complex {complex_id} has no graph at {path:?}")]
    MissingComplex { complex_id: String, path: PathBuf },

    #[error("Label {label} assigned to both {first} and {second}")]
    DuplicateLabel {
        label: u32,
        first: String,
        second: String,
    },

    #[error("Complex {complex_id} listed more than once")]
    DuplicateComplex { complex_id: String },

    #[error("Label {0} does not belong to any complex")]
    UnknownLabel(u32),

    #[error("Model returned {got} scores for a batch of {expected}")]
    OutputLength { expected: usize, got: usize },

    #[error("Model failed: {0}")]
    Model(String),
}
