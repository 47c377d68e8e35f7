//! Metadata-indexed dataset of featurized complexes.

use std::path::{Path, PathBuf};

use gist_common::{read_metadata, MetadataRow};
use gist_molecules::{ComplexGraph, COMPLEXES_DIR, METADATA_FILE};
use tracing::{debug, info};

use crate::error::{Result, ScoreError};
use crate::featurize::{featurize, GraphData};

pub struct GraphDataset {
    complexes_dir: PathBuf,
    rows: Vec<MetadataRow>,
    interaction_cutoff: f64,
    dis_threshold: f64,
}

impl GraphDataset {
    pub fn new(
        complexes_dir: impl Into<PathBuf>,
        rows: Vec<MetadataRow>,
        interaction_cutoff: f64,
        dis_threshold: f64,
    ) -> Self {
        Self {
            complexes_dir: complexes_dir.into(),
            rows,
            interaction_cutoff,
            dis_threshold,
        }
    }

    /// Dataset over an extraction output directory (`metadata.csv` + `complexes/`).
    pub fn open(input_dir: &Path, interaction_cutoff: f64, dis_threshold: f64) -> Result<Self> {
        let rows = read_metadata(&input_dir.join(METADATA_FILE))?;
        info!("Loaded {} complexes from {:?}", rows.len(), input_dir);
        Ok(Self::new(
            input_dir.join(COMPLEXES_DIR),
            rows,
            interaction_cutoff,
            dis_threshold,
        ))
    }

    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `{complexes}/{cid}/{cid}_{cutoff}A.complex.json`
    pub fn complex_path(&self, row: &MetadataRow) -> PathBuf {
        self.complexes_dir
            .join(row.complex_id.as_str())
            .join(row.complex_id.complex_file_name(self.interaction_cutoff))
    }

    pub async fn get(&self, index: usize) -> Result<GraphData> {
        let row = self.rows.get(index).ok_or(ScoreError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })?;
        let path = self.complex_path(row);
        if !path.is_file() {
            return Err(ScoreError::MissingComplex {
                complex_id: row.complex_id.to_string(),
                path,
            });
        }
        let complex = ComplexGraph::read(&path).await?;
        debug!(complex = %row.complex_id, label = row.label, "Loaded complex");
        Ok(featurize(&complex, row.label, self.dis_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_past_end_is_error() {
        let dataset = GraphDataset::new("/nowhere", vec![], 4.0, 5.0);
        let err = dataset.get(0).await.unwrap_err();
        assert!(matches!(
            err,
            ScoreError::IndexOutOfRange { index: 0, len: 0 }
        ));
    }
}
