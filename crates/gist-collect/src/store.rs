//! Id-indexed record of collection outcomes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CollectError, Result};

/// The two artifacts kept for a finished job, at their relocated paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultArtifactPair {
    pub job_id: String,
    pub structure: PathBuf,
    pub summary: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Present(ResultArtifactPair),
    /// The engine left nothing for this job: no directory, or an empty one.
    Absent { reason: String },
    /// A directory exists but its artifacts could not be collected. Source left intact.
    Failed { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    entries: BTreeMap<String, JobStatus>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, job_id: impl Into<String>, status: JobStatus) {
        self.entries.insert(job_id.into(), status);
    }

    pub fn get(&self, job_id: &str) -> Option<&JobStatus> {
        self.entries.get(job_id)
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.entries.contains_key(job_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JobStatus)> {
        self.entries.iter()
    }

    pub fn present(&self) -> impl Iterator<Item = &ResultArtifactPair> {
        self.entries.values().filter_map(|s| match s {
            JobStatus::Present(pair) => Some(pair),
            _ => None,
        })
    }

    pub fn absent(&self) -> impl Iterator<Item = (&String, &str)> {
        self.entries.iter().filter_map(|(id, s)| match s {
            JobStatus::Absent { reason } => Some((id, reason.as_str())),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&String, &str)> {
        self.entries.iter().filter_map(|(id, s)| match s {
            JobStatus::Failed { reason } => Some((id, reason.as_str())),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Write `id,cif_path,summary_path`, one row per present job, sorted by job id.
    pub fn write_manifest(&self, path: &Path) -> Result<()> {
        let err = |source| CollectError::Manifest {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(err)?;
        writer
            .write_record(["id", "cif_path", "summary_path"])
            .map_err(err)?;
        for pair in self.present() {
            let structure = pair.structure.to_string_lossy();
            let summary = pair.summary.to_string_lossy();
            writer
                .write_record([pair.job_id.as_str(), &*structure, &*summary])
                .map_err(err)?;
        }
        writer.flush()?;
        Ok(())
    }
}
