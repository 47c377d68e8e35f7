//! Job and complex identity.
//!
//! A [`JobId`] is carried as a structured `(protein_id, ligand_id)` pair; its string form
//! `{protein_id}_{ligand_id}` names files and directories but is never split back into
//! components inside the pipeline. The only place a string is parsed is the predicted
//! structure file name, see [`StructureName::parse`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GistError, Result};

/// Separator between protein and ligand ids in a job id.
pub const JOB_ID_SEPARATOR: char = '_';

/// Identity of one prediction job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId {
    pub protein_id: String,
    pub ligand_id: String,
}

impl JobId {
    pub fn new(protein_id: impl Into<String>, ligand_id: impl Into<String>) -> Self {
        let id = Self {
            protein_id: protein_id.into(),
            ligand_id: ligand_id.into(),
        };
        if !id.is_invertible() {
            warn!(
                protein_id = %id.protein_id,
                ligand_id = %id.ligand_id,
                "Id component contains '{}'; job id '{}' cannot be split unambiguously",
                JOB_ID_SEPARATOR,
                id
            );
        }
        id
    }

    /// True when neither component contains the separator.
    pub fn is_invertible(&self) -> bool {
        !self.protein_id.contains(JOB_ID_SEPARATOR) && !self.ligand_id.contains(JOB_ID_SEPARATOR)
    }

    /// Chain name the prediction engine assigns to the ligand.
    pub fn ligand_chain(&self) -> String {
        self.ligand_id.to_uppercase()
    }

    pub fn complex_id(&self) -> ComplexId {
        ComplexId::new(&self.protein_id, &self.ligand_id)
    }

    /// `{job_id}.json`
    pub fn spec_file_name(&self) -> String {
        format!("{self}.json")
    }

    /// `{job_id}_model.cif`
    pub fn model_file_name(&self) -> String {
        model_file_name(&self.to_string())
    }

    /// `{job_id}_summary_confidences.json`
    pub fn summary_file_name(&self) -> String {
        summary_file_name(&self.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.protein_id, JOB_ID_SEPARATOR, self.ligand_id)
    }
}

/// Structure file produced for a job id string, as found in an engine output directory.
pub fn model_file_name(job_id: &str) -> String {
    format!("{job_id}_model.cif")
}

/// Confidence summary produced for a job id string.
pub fn summary_file_name(job_id: &str) -> String {
    format!("{job_id}_summary_confidences.json")
}

/// Separator-free concatenation of protein and ligand ids. Used only for naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexId(String);

impl ComplexId {
    pub fn new(protein_id: &str, ligand_id: &str) -> Self {
        Self(format!("{protein_id}{ligand_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn pocket_file_name(&self) -> String {
        format!("{}_pocket.pdb", self.0)
    }

    pub fn ligand_file_name(&self) -> String {
        format!("{}_ligand.pdb", self.0)
    }

    /// `{cid}_{cutoff}A.complex.json`, e.g. `P1L1_4A.complex.json`.
    pub fn complex_file_name(&self, cutoff: f64) -> String {
        format!("{}_{}A.complex.json", self.0, format_distance(cutoff))
    }
}

impl From<String> for ComplexId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ComplexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whole distances print without a fractional part.
pub fn format_distance(distance: f64) -> String {
    if distance.fract() == 0.0 {
        format!("{}", distance as i64)
    } else {
        format!("{distance}")
    }
}

/// Parsed stem of a predicted structure file: `{protein}_{ligand}_{replica}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureName {
    pub job: JobId,
    /// Third token (`model`, a seed, or a replica index). Not interpreted.
    pub replica: String,
}

impl StructureName {
    /// Split a file stem into exactly three `_`-separated tokens.
    pub fn parse(stem: &str) -> Result<Self> {
        let parts: Vec<&str> = stem.split(JOB_ID_SEPARATOR).collect();
        match parts.as_slice() {
            [protein, ligand, replica]
                if !protein.is_empty() && !ligand.is_empty() =>
            {
                Ok(Self {
                    job: JobId {
                        protein_id: protein.to_string(),
                        ligand_id: ligand.to_string(),
                    },
                    replica: replica.to_string(),
                })
            }
            _ => Err(GistError::InvalidStructureName(stem.to_string())),
        }
    }
}
