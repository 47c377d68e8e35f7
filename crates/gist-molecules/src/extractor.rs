//! Per-structure extraction loop and metadata table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gist_common::{write_metadata, ComplexId, JobId, MetadataRow, StructureName};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, Result};
use crate::graph::ComplexGraph;
use crate::pdb::MoleculeParser;
use crate::toolkit::{ExtractionRequest, StructureToolkit};

pub const COMPLEXES_DIR: &str = "complexes";
pub const METADATA_FILE: &str = "metadata.csv";

const STRUCTURE_EXTENSION: &str = "cif";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StructureOutcome {
    Accepted { complex_id: ComplexId, label: u32 },
    /// Ligand or pocket did not parse; the complex directory is gone.
    Rejected { reason: String },
    /// Another replica of the same pair was already accepted.
    Skipped { reason: String },
    /// Unparseable name, toolkit failure, or a complex id already taken by another pair.
    Failed { error: String },
}

#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// In processing order.
    pub outcomes: Vec<(PathBuf, StructureOutcome)>,
    pub metadata: Vec<MetadataRow>,
    pub metadata_path: PathBuf,
}

impl ExtractionReport {
    pub fn accepted(&self) -> usize {
        self.metadata.len()
    }

    pub fn count(&self, pred: impl Fn(&StructureOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

enum ComplexCheck {
    Valid,
    Invalid(Vec<PathBuf>),
}

pub struct ComplexExtractor<T, P> {
    toolkit: T,
    parser: P,
    config: ExtractionConfig,
}

impl<T: StructureToolkit, P: MoleculeParser> ComplexExtractor<T, P> {
    pub fn new(toolkit: T, parser: P, config: ExtractionConfig) -> Self {
        Self {
            toolkit,
            parser,
            config,
        }
    }

    /// Extract every `.cif` under `input_dir` into `{output_dir}/complexes/`
    /// and write `{output_dir}/metadata.csv`.
    ///
    /// With strict chains, a structure missing its ligand chain aborts the
    /// run before any metadata is written.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<ExtractionReport> {
        let complexes_dir = output_dir.join(COMPLEXES_DIR);
        fs::create_dir_all(&complexes_dir).await?;

        let structures = list_structures(input_dir).await?;
        info!(
            "Extracting {} structures from {:?}",
            structures.len(),
            input_dir
        );

        let mut report = ExtractionReport {
            metadata_path: output_dir.join(METADATA_FILE),
            ..Default::default()
        };
        let mut accepted_from: HashMap<ComplexId, (JobId, PathBuf)> = HashMap::new();

        for structure in structures {
            let outcome = self
                .process(&structure, &complexes_dir, &mut accepted_from, report.metadata.len())
                .await?;
            if let StructureOutcome::Accepted { complex_id, label } = &outcome {
                report
                    .metadata
                    .push(MetadataRow::new(complex_id.clone(), *label));
            }
            report.outcomes.push((structure, outcome));
        }

        write_metadata(&report.metadata_path, &report.metadata)?;
        info!(
            accepted = report.accepted(),
            rejected = report.count(|o| matches!(o, StructureOutcome::Rejected { .. })),
            skipped = report.count(|o| matches!(o, StructureOutcome::Skipped { .. })),
            failed = report.count(|o| matches!(o, StructureOutcome::Failed { .. })),
            "Wrote metadata to {:?}",
            report.metadata_path
        );
        Ok(report)
    }

    async fn process(
        &self,
        structure: &Path,
        complexes_dir: &Path,
        accepted_from: &mut HashMap<ComplexId, (JobId, PathBuf)>,
        next_label: usize,
    ) -> Result<StructureOutcome> {
        let stem = structure
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match StructureName::parse(&stem) {
            Ok(name) => name,
            Err(e) => {
                warn!("Skipping {:?}: {}", structure, e);
                return Ok(StructureOutcome::Failed {
                    error: e.to_string(),
                });
            }
        };

        let complex_id = name.job.complex_id();
        if let Some((first_job, first)) = accepted_from.get(&complex_id) {
            if *first_job != name.job {
                warn!(
                    "Complex id {} of {} collides with {} from {:?}",
                    complex_id, name.job, first_job, first
                );
                return Ok(StructureOutcome::Failed {
                    error: format!(
                        "complex id {complex_id} collides with {first_job} extracted from {first:?}"
                    ),
                });
            }
            debug!("Complex {} already extracted from {:?}", complex_id, first);
            return Ok(StructureOutcome::Skipped {
                reason: format!("complex {complex_id} already extracted from {first:?}"),
            });
        }

        let complex_dir = complexes_dir.join(complex_id.as_str());
        let checked = self.extract_complex(structure, &name, &complex_dir).await;
        match checked {
            Ok(ComplexCheck::Valid) => {
                let label = next_label as u32;
                debug!("Accepted {} with label {}", complex_id, label);
                accepted_from.insert(complex_id.clone(), (name.job, structure.to_path_buf()));
                Ok(StructureOutcome::Accepted { complex_id, label })
            }
            Ok(ComplexCheck::Invalid(files)) => {
                remove_complex_dir(&complex_dir).await?;
                let names: Vec<String> = files.iter().map(|f| format!("{f:?}")).collect();
                Ok(StructureOutcome::Rejected {
                    reason: format!("no molecule parsed from {}", names.join(" and ")),
                })
            }
            Err(e @ ExtractError::ChainNotFound { .. }) if self.config.strict_chains => {
                error!("{}", e);
                remove_complex_dir(&complex_dir).await?;
                Err(e)
            }
            Err(e) => {
                warn!("Extraction failed for {:?}: {}", structure, e);
                remove_complex_dir(&complex_dir).await?;
                Ok(StructureOutcome::Failed {
                    error: e.to_string(),
                })
            }
        }
    }

    async fn extract_complex(
        &self,
        structure: &Path,
        name: &StructureName,
        complex_dir: &Path,
    ) -> Result<ComplexCheck> {
        let complex_id = name.job.complex_id();
        fs::create_dir_all(complex_dir).await?;

        let ligand_path = complex_dir.join(complex_id.ligand_file_name());
        let pocket_path = complex_dir.join(complex_id.pocket_file_name());
        let ligand_chain = name.job.ligand_chain();

        self.toolkit
            .extract(&ExtractionRequest {
                structure,
                ligand_chain: &ligand_chain,
                pocket_radius: self.config.pocket_radius,
                ligand_out: &ligand_path,
                pocket_out: &pocket_path,
            })
            .await?;

        let ligand = self.parser.parse(&ligand_path)?;
        let pocket = self.parser.parse(&pocket_path)?;

        let (ligand, pocket) = match (ligand, pocket) {
            (Some(ligand), Some(pocket)) => (ligand, pocket),
            (ligand, pocket) => {
                let mut failed = Vec::new();
                if ligand.is_none() {
                    failed.push(ligand_path);
                }
                if pocket.is_none() {
                    failed.push(pocket_path);
                }
                for path in &failed {
                    warn!("No molecule found for {:?}", path);
                }
                return Ok(ComplexCheck::Invalid(failed));
            }
        };

        let complex = ComplexGraph {
            complex_id: complex_id.clone(),
            cutoff: self.config.interaction_cutoff,
            ligand,
            pocket,
        };
        complex
            .write(&complex_dir.join(complex_id.complex_file_name(self.config.interaction_cutoff)))
            .await?;
        Ok(ComplexCheck::Valid)
    }
}

/// Regular `.cif` files directly under `dir`, sorted by name.
async fn list_structures(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut structures = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_structure = path
            .extension()
            .map(|ext| ext == STRUCTURE_EXTENSION)
            .unwrap_or(false);
        if is_structure && entry.file_type().await?.is_file() {
            structures.push(path);
        } else {
            debug!("Ignoring {:?}", path);
        }
    }
    structures.sort();
    Ok(structures)
}

async fn remove_complex_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_structures_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["P2_L1_model.cif", "P1_L1_model.cif", ".DS_Store", "notes.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.cif")).unwrap();

        let found = list_structures(dir.path()).await.unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["P1_L1_model.cif", "P2_L1_model.cif"]);
    }

    #[tokio::test]
    async fn test_remove_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        remove_complex_dir(&dir.path().join("absent")).await.unwrap();
    }
}
