use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GistError>;

#[derive(Debug, Error)]
pub enum GistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error in {path:?}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Duplicate {kind} id '{id}' in {path:?}")]
    DuplicateId {
        kind: &'static str,
        id: String,
        path: PathBuf,
    },

    #[error("Empty {kind} id in {path:?}")]
    EmptyId { kind: &'static str, path: PathBuf },

    #[error("Invalid structure name '{0}': expected {{protein}}_{{ligand}}_{{replica}}")]
    InvalidStructureName(String),
}

impl GistError {
    pub(crate) fn table(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        GistError::Table {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        fn open(path: &str) -> Result<std::fs::File> {
            Ok(std::fs::File::open(path)?)
        }
        let err = open("/nonexistent/gist/table.csv").unwrap_err();
        assert!(matches!(err, GistError::Io(_)));
    }

    #[test]
    fn test_structure_name_message() {
        let err = GistError::InvalidStructureName("P1_L1".into());
        assert_eq!(
            err.to_string(),
            "Invalid structure name 'P1_L1': expected {protein}_{ligand}_{replica}"
        );
    }
}
