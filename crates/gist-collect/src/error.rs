use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectError>;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest error in {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Job {job_id}: missing {}", .missing.join(" and "))]
    MissingArtifacts { job_id: String, missing: Vec<String> },

    #[error("Job {job_id}: relocating {from:?} to {to:?} failed: {source}")]
    Relocate {
        job_id: String,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Job {job_id}: {path:?} not confirmed at destination")]
    Unconfirmed { job_id: String, path: PathBuf },
}
