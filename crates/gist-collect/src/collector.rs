//! Relocation of engine outputs into a flat results directory.
//!
//! Each job goes through four phases: verify both source artifacts, move them, confirm
//! them at the destination, then delete the source directory. A job that fails any phase
//! before the last keeps its source directory untouched and is recorded as failed; other
//! jobs are unaffected.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use gist_common::ids::{model_file_name, summary_file_name};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::error::{CollectError, Result};
use crate::store::{JobStatus, ResultArtifactPair, ResultStore};

pub struct ResultCollector {
    output_dir: PathBuf,
    expected: Option<BTreeSet<String>>,
}

impl ResultCollector {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            expected: None,
        }
    }

    /// Job ids that should have produced output; those without a directory are recorded
    /// as absent instead of being silently missing from the store.
    pub fn with_expected_jobs<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Collect every job directory under `input_dir`.
    pub async fn collect(&self, input_dir: &Path) -> Result<ResultStore> {
        info!("Collecting prediction results from {:?}", input_dir);
        fs::create_dir_all(&self.output_dir).await?;

        let mut job_dirs = Vec::new();
        let mut entries = fs::read_dir(input_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                job_dirs.push(entry.path());
            } else {
                debug!("Skipping non-directory entry {:?}", entry.path());
            }
        }
        job_dirs.sort();

        let mut store = ResultStore::new();
        for dir in job_dirs {
            let Some(job_id) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let status = self.collect_job(&job_id, &dir).await;
            store.insert(job_id, status);
        }

        if let Some(expected) = &self.expected {
            for job_id in expected {
                if !store.contains(job_id) {
                    debug!(job_id = %job_id, "No output directory");
                    store.insert(
                        job_id.clone(),
                        JobStatus::Absent {
                            reason: "no output directory".to_string(),
                        },
                    );
                }
            }
        }

        info!(
            "Collection finished: {} present, {} absent, {} failed",
            store.present().count(),
            store.absent().count(),
            store.failed().count()
        );
        Ok(store)
    }

    async fn collect_job(&self, job_id: &str, dir: &Path) -> JobStatus {
        match is_empty_dir(dir).await {
            Ok(true) => {
                debug!(job_id = %job_id, "Output directory is empty");
                return JobStatus::Absent {
                    reason: "empty output directory".to_string(),
                };
            }
            Ok(false) => {}
            Err(e) => {
                warn!(job_id = %job_id, "Could not read {:?}: {}", dir, e);
                return JobStatus::Failed {
                    reason: e.to_string(),
                };
            }
        }

        match self.relocate_job(job_id, dir).await {
            Ok(pair) => {
                debug!(job_id = %job_id, "Collected {:?}", pair.structure);
                JobStatus::Present(pair)
            }
            Err(e) => {
                warn!(job_id = %job_id, "Collection failed, source kept: {}", e);
                JobStatus::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn relocate_job(&self, job_id: &str, dir: &Path) -> Result<ResultArtifactPair> {
        let structure_name = model_file_name(job_id);
        let summary_name = summary_file_name(job_id);
        let structure_src = dir.join(&structure_name);
        let summary_src = dir.join(&summary_name);

        // 1. both artifacts must exist before anything moves
        let mut missing = Vec::new();
        let structure_len = file_len(&structure_src).await;
        let summary_len = file_len(&summary_src).await;
        if structure_len.is_none() {
            missing.push(structure_name.clone());
        }
        if summary_len.is_none() {
            missing.push(summary_name.clone());
        }
        let (Some(structure_len), Some(summary_len)) = (structure_len, summary_len) else {
            return Err(CollectError::MissingArtifacts {
                job_id: job_id.to_string(),
                missing,
            });
        };

        // 2. move, putting the first artifact back if the second cannot follow
        let structure = self.output_dir.join(&structure_name);
        let summary = self.output_dir.join(&summary_name);
        relocate(job_id, &structure_src, &structure).await?;
        if let Err(e) = relocate(job_id, &summary_src, &summary).await {
            restore(job_id, &[(structure.as_path(), structure_src.as_path())]).await;
            return Err(e);
        }

        // 3. confirm, or put both artifacts back
        for (path, expected_len) in [(&structure, structure_len), (&summary, summary_len)] {
            if file_len(path).await != Some(expected_len) {
                restore(
                    job_id,
                    &[
                        (structure.as_path(), structure_src.as_path()),
                        (summary.as_path(), summary_src.as_path()),
                    ],
                )
                .await;
                return Err(CollectError::Unconfirmed {
                    job_id: job_id.to_string(),
                    path: path.clone(),
                });
            }
        }

        // 4. the artifacts are safe; the rest of the engine output goes with the directory
        if let Err(e) = fs::remove_dir_all(dir).await {
            warn!(job_id = %job_id, "Collected, but could not remove {:?}: {}", dir, e);
        }

        Ok(ResultArtifactPair {
            job_id: job_id.to_string(),
            structure,
            summary,
        })
    }
}

async fn is_empty_dir(dir: &Path) -> std::io::Result<bool> {
    let mut entries = fs::read_dir(dir).await?;
    Ok(entries.next_entry().await?.is_none())
}

async fn file_len(path: &Path) -> Option<u64> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Some(meta.len()),
        _ => None,
    }
}

/// Move each `(moved, original)` back to its original path. Failures are logged.
async fn restore(job_id: &str, moves: &[(&Path, &Path)]) {
    for (moved, original) in moves {
        if let Err(e) = relocate(job_id, moved, original).await {
            error!(job_id = %job_id, "Could not restore {:?}: {}", original, e);
        }
    }
}

/// Rename, falling back to copy and remove when the rename is refused (e.g. across
/// filesystems).
async fn relocate(job_id: &str, from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    let wrap = |source| CollectError::Relocate {
        job_id: job_id.to_string(),
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    fs::copy(from, to).await.map_err(wrap)?;
    fs::remove_file(from).await.map_err(wrap)?;
    Ok(())
}

/// Job ids named by the job-spec files in `dir` (`*.json`), including one level of
/// per-ligand subdirectories.
pub async fn expected_jobs_from_specs(dir: &Path) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut pending = vec![(dir.to_path_buf(), 0usize)];

    while let Some((current, depth)) = pending.pop() {
        let mut entries = fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                if depth == 0 {
                    pending.push((path, depth + 1));
                }
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem() {
                    ids.push(stem.to_string_lossy().into_owned());
                }
            }
        }
    }

    ids.sort();
    Ok(ids)
}
