//! Protein and ligand input tables.
//!
//! Both tables are CSV with a header row. Required columns are `id`,`sequence` for
//! proteins and `id`,`smiles` for ligands; any other column is ignored, so the table
//! written by the sequence-fetch step (`id,name,sequence,uniprot`) can be used directly.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{GistError, Result};

/// One protein row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinRecord {
    pub id: String,
    pub sequence: String,
    /// Optional explicit template structure; overrides the template directory lookup.
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl ProteinRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
            template: None,
        }
    }
}

/// One ligand row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigandRecord {
    pub id: String,
    pub smiles: String,
}

impl LigandRecord {
    pub fn new(id: impl Into<String>, smiles: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            smiles: smiles.into(),
        }
    }
}

trait Keyed {
    const KIND: &'static str;
    fn key(&self) -> &str;
}

impl Keyed for ProteinRecord {
    const KIND: &'static str = "protein";
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for LigandRecord {
    const KIND: &'static str = "ligand";
    fn key(&self) -> &str {
        &self.id
    }
}

/// Load the protein table.
pub fn read_proteins(path: &Path) -> Result<Vec<ProteinRecord>> {
    read_table(path)
}

/// Load the ligand table.
pub fn read_ligands(path: &Path) -> Result<Vec<LigandRecord>> {
    read_table(path)
}

fn read_table<T>(path: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned + Keyed,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| GistError::table(path, e))?;

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for row in reader.deserialize::<T>() {
        let row = row.map_err(|e| GistError::table(path, e))?;
        if row.key().is_empty() {
            return Err(GistError::EmptyId {
                kind: T::KIND,
                path: path.to_path_buf(),
            });
        }
        if !seen.insert(row.key().to_string()) {
            return Err(GistError::DuplicateId {
                kind: T::KIND,
                id: row.key().to_string(),
                path: path.to_path_buf(),
            });
        }
        rows.push(row);
    }

    debug!("Loaded {} {} rows from {:?}", rows.len(), T::KIND, path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_proteins_ignores_extra_columns() {
        let file = table("id,name,sequence,uniprot\nKRAS,kras,MTEYKLVVV,P01116\n");
        let proteins = read_proteins(file.path()).unwrap();
        assert_eq!(proteins, vec![ProteinRecord::new("KRAS", "MTEYKLVVV")]);
    }

    #[test]
    fn test_read_proteins_optional_template_column() {
        let file = table("id,sequence,template\nP1,MKT,/data/p1.cif\nP2,MKV,\n");
        let proteins = read_proteins(file.path()).unwrap();
        assert_eq!(proteins[0].template, Some(PathBuf::from("/data/p1.cif")));
        assert_eq!(proteins[1].template, None);
    }

    #[test]
    fn test_read_ligands_keeps_backslashes() {
        let file = table("id,smiles\nL1,F/C=C\\F\n");
        let ligands = read_ligands(file.path()).unwrap();
        assert_eq!(ligands[0].smiles, "F/C=C\\F");
    }

    #[test]
    fn test_missing_column_is_table_error() {
        let file = table("id,seq\nP1,MKT\n");
        let err = read_proteins(file.path()).unwrap_err();
        assert!(matches!(err, GistError::Table { .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let file = table("id,smiles\nL1,CCO\nL1,CCN\n");
        let err = read_ligands(file.path()).unwrap_err();
        assert!(matches!(err, GistError::DuplicateId { kind: "ligand", .. }));
    }
}
