//! Subcommand bodies.

use std::path::{Path, PathBuf};

use anyhow::Context;
use gist_collect::{expected_jobs_from_specs, ResultCollector};
use gist_common::{read_ligands, read_proteins};
use gist_jobs::{JobGenerator, OutputLayout};
use gist_molecules::{ComplexExtractor, ExtractionConfig, PdbGraphParser, PymolToolkit};
use gist_scorer::{
    predict as score, write_predictions, DataLoader, ExternalModel, GraphDataset, ScorerConfig,
};
use tracing::{error, info, warn};

pub async fn create_jobs(
    proteins: &Path,
    ligands: &Path,
    outdir: &Path,
    template_dir: Option<PathBuf>,
    by_ligand: bool,
) -> anyhow::Result<()> {
    let proteins = read_proteins(proteins)?;
    let ligands = read_ligands(ligands)?;
    info!("{} proteins x {} ligands", proteins.len(), ligands.len());

    let mut generator = JobGenerator::new();
    if let Some(dir) = template_dir {
        generator = generator.with_template_dir(dir);
    }
    if by_ligand {
        generator = generator.with_layout(OutputLayout::ByLigand);
    }

    let report = generator.run(&proteins, &ligands, outdir).await?;
    let missing = report.missing_templates().count();
    if missing > 0 {
        warn!("{} jobs written without their requested template", missing);
    }
    info!("Wrote {} jobs to {:?}", report.jobs_written, outdir);
    Ok(())
}

pub async fn collect(
    input: &Path,
    output: &Path,
    manifest: Option<&Path>,
    jobs_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut collector = ResultCollector::new(output);
    if let Some(dir) = jobs_dir {
        let expected = expected_jobs_from_specs(dir)
            .await
            .with_context(|| format!("reading job specs from {}", dir.display()))?;
        collector = collector.with_expected_jobs(expected);
    }

    let store = collector.collect(input).await?;
    if let Some(path) = manifest {
        store.write_manifest(path)?;
    }

    for (job_id, reason) in store.failed() {
        error!("{}: {}", job_id, reason);
    }
    if store.has_failures() {
        anyhow::bail!(
            "{} of {} jobs could not be collected",
            store.failed().count(),
            store.len()
        );
    }
    Ok(())
}

pub async fn extract(
    input: &Path,
    output: &Path,
    config: ExtractionConfig,
    pymol: &Path,
) -> anyhow::Result<()> {
    let extractor = ComplexExtractor::new(PymolToolkit::new(pymol), PdbGraphParser::new(), config);
    let report = extractor.run(input, output).await?;
    info!(
        "{} of {} structures extracted",
        report.accepted(),
        report.outcomes.len()
    );
    Ok(())
}

pub async fn predict(
    input: &Path,
    output: &Path,
    model: &Path,
    config: ScorerConfig,
    runner: &Path,
) -> anyhow::Result<()> {
    let dataset = GraphDataset::open(input, config.interaction_cutoff, config.dis_threshold)?;
    let loader = DataLoader::new(dataset, &config);
    let model = ExternalModel::new(runner, model, config.device.clone());

    let predictions = score(&model, &loader).await?;
    write_predictions(output, &predictions)?;
    Ok(())
}
