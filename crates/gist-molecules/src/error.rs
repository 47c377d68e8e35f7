//! Error types for complex extraction.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Common(#[from] gist_common::GistError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ligand chain '{chain}' not found in {structure:?} (chains: {})", .available.join(", "))]
    ChainNotFound {
        structure: PathBuf,
        chain: String,
        available: Vec<String>,
    },

    #[error("Structure toolkit failed on {structure:?}: {message}")]
    Toolkit { structure: PathBuf, message: String },
}
