//! Error types for job generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JobError>;

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Input(#[from] gist_common::GistError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Job id '{0}' produced by more than one protein-ligand pair")]
    DuplicateJob(String),
}
