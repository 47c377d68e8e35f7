//! Cross-product job generation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gist_common::{JobId, LigandRecord, ProteinRecord};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{JobError, Result};
use crate::spec::JobSpec;

/// Where job files land inside the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// `{out}/{job_id}.json`
    #[default]
    Flat,
    /// `{out}/{ligand_id}/{job_id}.json`
    ByLigand,
}

/// Template outcome for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum TemplateStatus {
    /// No template directory and no explicit template path.
    NotRequested,
    Attached(PathBuf),
    /// A template was requested but the file does not exist; the job carries no template.
    Missing(PathBuf),
}

/// A job ready to be written.
#[derive(Debug, Clone)]
pub struct PlannedJob {
    pub id: JobId,
    pub spec: JobSpec,
    pub template: TemplateStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub jobs_written: usize,
    pub files: Vec<PathBuf>,
    pub templates: Vec<(String, TemplateStatus)>,
}

impl GenerationReport {
    pub fn missing_templates(&self) -> impl Iterator<Item = &(String, TemplateStatus)> {
        self.templates
            .iter()
            .filter(|(_, s)| matches!(s, TemplateStatus::Missing(_)))
    }
}

/// Builds and writes one job spec per protein-ligand pair.
#[derive(Debug, Clone, Default)]
pub struct JobGenerator {
    template_dir: Option<PathBuf>,
    layout: OutputLayout,
}

impl JobGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up templates as `{dir}/{protein_id}.cif`.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    fn resolve_template(&self, protein: &ProteinRecord) -> TemplateStatus {
        let candidate = match (&protein.template, &self.template_dir) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(dir)) => dir.join(format!("{}.cif", protein.id)),
            (None, None) => return TemplateStatus::NotRequested,
        };

        if candidate.is_file() {
            TemplateStatus::Attached(candidate)
        } else {
            warn!(
                protein_id = %protein.id,
                "Template {:?} not found; jobs for this protein run without a template",
                candidate
            );
            TemplateStatus::Missing(candidate)
        }
    }

    /// Plan every pair of the cross product, proteins outer, ligands inner.
    pub fn plan(
        &self,
        proteins: &[ProteinRecord],
        ligands: &[LigandRecord],
    ) -> Result<Vec<PlannedJob>> {
        let mut seen = HashSet::new();
        let mut jobs = Vec::with_capacity(proteins.len() * ligands.len());

        for protein in proteins {
            let template = self.resolve_template(protein);
            let template_path = match &template {
                TemplateStatus::Attached(path) => Some(path.as_path()),
                _ => None,
            };

            for ligand in ligands {
                let id = JobId::new(&protein.id, &ligand.id);
                let key = id.to_string();
                if !seen.insert(key.clone()) {
                    return Err(JobError::DuplicateJob(key));
                }

                let spec = JobSpec::new(&id, protein, ligand, template_path);
                jobs.push(PlannedJob {
                    id,
                    spec,
                    template: template.clone(),
                });
            }
        }

        debug!(
            "Planned {} jobs ({} proteins x {} ligands)",
            jobs.len(),
            proteins.len(),
            ligands.len()
        );
        Ok(jobs)
    }

    fn job_path(&self, outdir: &Path, id: &JobId) -> PathBuf {
        match self.layout {
            OutputLayout::Flat => outdir.join(id.spec_file_name()),
            OutputLayout::ByLigand => outdir.join(&id.ligand_id).join(id.spec_file_name()),
        }
    }

    /// Write planned jobs, creating directories as needed. Existing files are overwritten.
    pub async fn write(&self, outdir: &Path, jobs: &[PlannedJob]) -> Result<GenerationReport> {
        fs::create_dir_all(outdir).await?;

        let mut report = GenerationReport::default();
        for job in jobs {
            let path = self.job_path(outdir, &job.id);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, job.spec.to_json()?).await?;

            report.jobs_written += 1;
            report.files.push(path);
            report.templates.push((job.id.to_string(), job.template.clone()));
        }

        info!("Wrote {} job files to {:?}", report.jobs_written, outdir);
        Ok(report)
    }

    pub async fn run(
        &self,
        proteins: &[ProteinRecord],
        ligands: &[LigandRecord],
        outdir: &Path,
    ) -> Result<GenerationReport> {
        let jobs = self.plan(proteins, ligands)?;
        self.write(outdir, &jobs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plan_cross_product_order() {
        let proteins = vec![ProteinRecord::new("P1", "MK"), ProteinRecord::new("P2", "MV")];
        let ligands = vec![LigandRecord::new("L1", "C"), LigandRecord::new("L2", "N")];
        let jobs = JobGenerator::new().plan(&proteins, &ligands).unwrap();
        let ids: Vec<String> = jobs.iter().map(|j| j.id.to_string()).collect();
        assert_eq!(ids, vec!["P1_L1", "P1_L2", "P2_L1", "P2_L2"]);
        assert!(jobs.iter().all(|j| j.template == TemplateStatus::NotRequested));
    }

    #[test]
    fn test_plan_rejects_colliding_job_ids() {
        // "A_B" + "C" and "A" + "B_C" both render as "A_B_C".
        let proteins = vec![ProteinRecord::new("A_B", "MK"), ProteinRecord::new("A", "MV")];
        let ligands = vec![LigandRecord::new("C", "C"), LigandRecord::new("B_C", "N")];
        let err = JobGenerator::new().plan(&proteins, &ligands).unwrap_err();
        assert!(matches!(err, JobError::DuplicateJob(id) if id == "A_B_C"));
    }

    #[test]
    fn test_missing_template_reported() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("P1.cif"), "data_P1\n").unwrap();

        let proteins = vec![ProteinRecord::new("P1", "MK"), ProteinRecord::new("P2", "MV")];
        let ligands = vec![LigandRecord::new("L1", "C")];
        let jobs = JobGenerator::new()
            .with_template_dir(dir.path())
            .plan(&proteins, &ligands)
            .unwrap();

        assert_eq!(jobs[0].template, TemplateStatus::Attached(dir.path().join("P1.cif")));
        assert_eq!(jobs[1].template, TemplateStatus::Missing(dir.path().join("P2.cif")));
        assert!(jobs[1].spec.protein().unwrap().templates.is_none());
    }

    #[tokio::test]
    async fn test_by_ligand_layout() {
        let out = tempdir().unwrap();
        let proteins = vec![ProteinRecord::new("P1", "MK")];
        let ligands = vec![LigandRecord::new("L1", "C"), LigandRecord::new("L2", "N")];
        let report = JobGenerator::new()
            .with_layout(OutputLayout::ByLigand)
            .run(&proteins, &ligands, out.path())
            .await
            .unwrap();

        assert_eq!(report.jobs_written, 2);
        assert!(out.path().join("L1").join("P1_L1.json").is_file());
        assert!(out.path().join("L2").join("P1_L2.json").is_file());
    }
}
