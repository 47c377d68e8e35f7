//! Complex metadata table: the hand-off between extraction and scoring.
//!
//! Columns follow the affinity-dataset convention `pdbid,-logKd/Ki`. At this stage the
//! second column is not an affinity: it is the synthetic integer label the scorer uses
//! as a join key back to the complex id.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GistError, Result};
use crate::ids::ComplexId;

pub const COMPLEX_ID_COLUMN: &str = "pdbid";
pub const LABEL_COLUMN: &str = "-logKd/Ki";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    #[serde(rename = "pdbid")]
    pub complex_id: ComplexId,
    #[serde(rename = "-logKd/Ki")]
    pub label: u32,
}

impl MetadataRow {
    pub fn new(complex_id: ComplexId, label: u32) -> Self {
        Self { complex_id, label }
    }
}

pub fn write_metadata(path: &Path, rows: &[MetadataRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| GistError::table(path, e))?;
    if rows.is_empty() {
        writer
            .write_record([COMPLEX_ID_COLUMN, LABEL_COLUMN])
            .map_err(|e| GistError::table(path, e))?;
    }
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| GistError::table(path, e))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_metadata(path: &Path) -> Result<Vec<MetadataRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| GistError::table(path, e))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<MetadataRow>, _>>()
        .map_err(|e| GistError::table(path, e))
}
