//! Job specification consumed by the structure-prediction engine.

use std::path::Path;

use gist_common::{JobId, LigandRecord, ProteinRecord};
use serde::{Deserialize, Serialize};

use crate::canonical::to_canonical_json;
use crate::error::Result;

/// Fixed model seeds for every job.
pub const MODEL_SEEDS: [u32; 2] = [1, 2];
/// Input dialect understood by the engine.
pub const DIALECT: &str = "alphafold3";
/// Dialect version.
pub const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub name: String,
    pub model_seeds: Vec<u32>,
    pub sequences: Vec<SequenceEntry>,
    pub dialect: String,
    pub version: u32,
}

/// One chain of the job, serialized as `{"protein": {...}}` or `{"ligand": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceEntry {
    Protein(ProteinChain),
    Ligand(LigandChain),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinChain {
    pub id: String,
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<TemplateSpec>>,
    /// Empty string asks the engine to compute the MSA itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_msa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpaired_msa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSpec {
    pub mmcif_path: String,
    pub query_indices: Vec<usize>,
    pub template_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigandChain {
    pub id: String,
    /// Stored verbatim; backslashes are only escaped by the JSON encoding.
    pub smiles: String,
}

impl JobSpec {
    /// Build the spec for one pair, optionally with a full-length ungapped template.
    pub fn new(
        id: &JobId,
        protein: &ProteinRecord,
        ligand: &LigandRecord,
        template: Option<&Path>,
    ) -> Self {
        let mut protein_chain = ProteinChain {
            id: protein.id.clone(),
            sequence: protein.sequence.clone(),
            templates: None,
            paired_msa: None,
            unpaired_msa: None,
        };

        if let Some(path) = template {
            let indices: Vec<usize> = (0..protein.sequence.chars().count()).collect();
            protein_chain.templates = Some(vec![TemplateSpec {
                mmcif_path: path.to_string_lossy().into_owned(),
                query_indices: indices.clone(),
                template_indices: indices,
            }]);
            protein_chain.paired_msa = Some(String::new());
            protein_chain.unpaired_msa = Some(String::new());
        }

        Self {
            name: id.to_string(),
            model_seeds: MODEL_SEEDS.to_vec(),
            sequences: vec![
                SequenceEntry::Protein(protein_chain),
                SequenceEntry::Ligand(LigandChain {
                    id: ligand.id.clone(),
                    smiles: ligand.smiles.clone(),
                }),
            ],
            dialect: DIALECT.to_string(),
            version: VERSION,
        }
    }

    /// Canonical file contents.
    pub fn to_json(&self) -> Result<String> {
        let value = serde_json::to_value(self)?;
        Ok(to_canonical_json(&value))
    }

    pub fn protein(&self) -> Option<&ProteinChain> {
        self.sequences.iter().find_map(|s| match s {
            SequenceEntry::Protein(p) => Some(p),
            SequenceEntry::Ligand(_) => None,
        })
    }

    pub fn ligand(&self) -> Option<&LigandChain> {
        self.sequences.iter().find_map(|s| match s {
            SequenceEntry::Ligand(l) => Some(l),
            SequenceEntry::Protein(_) => None,
        })
    }
}
