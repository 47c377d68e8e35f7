//! gist — protein–ligand prediction pipeline, one stage per subcommand.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "gist")]
#[command(about = "Protein–ligand structure prediction and affinity scoring pipeline", long_about = None)]
struct Cli {
    /// Config TOML file (defaults to ./gist.toml when present)
    #[arg(long, global = true, env = "GIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one prediction job file per protein–ligand pair
    CreateJobs {
        /// Protein table (columns: id, sequence[, template])
        proteins: PathBuf,
        /// Ligand table (columns: id, smiles)
        ligands: PathBuf,
        /// Output directory for job files
        outdir: PathBuf,
        /// Directory holding `{protein_id}.cif` templates
        #[arg(long, value_name = "DIR")]
        template_dir: Option<PathBuf>,
        /// Group job files into one subdirectory per ligand
        #[arg(long)]
        by_ligand: bool,
    },

    /// Move finished prediction artifacts into a flat results directory
    Collect {
        /// Prediction engine output directory (one subdirectory per job)
        input: PathBuf,
        /// Results directory
        output: PathBuf,
        /// Write an id,cif_path,summary_path manifest
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,
        /// Job spec directory; jobs without output are reported absent
        #[arg(long, value_name = "DIR")]
        jobs_dir: Option<PathBuf>,
    },

    /// Cut ligand and pocket from each predicted structure
    Extract {
        /// Directory of `{protein}_{ligand}_{replica}.cif` structures
        #[arg(short, long)]
        input: PathBuf,
        /// Output directory for metadata.csv and complexes/
        #[arg(short, long)]
        output: PathBuf,
        /// Record a missing ligand chain as a failure instead of aborting
        #[arg(long)]
        lenient_chains: bool,
    },

    /// Score extracted complexes with a pretrained model
    Predict {
        /// Extraction output directory
        #[arg(short, long)]
        input: PathBuf,
        /// Prediction table (pred,label)
        #[arg(short, long)]
        output: PathBuf,
        /// Model artifact
        #[arg(short, long)]
        model: PathBuf,
        /// Concurrent complex loads
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        device: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gist=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    info!("gist {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::CreateJobs {
            proteins,
            ligands,
            outdir,
            template_dir,
            by_ligand,
        } => {
            let template_dir = template_dir.or(config.jobs.template_dir);
            let by_ligand = by_ligand || config.jobs.by_ligand;
            commands::create_jobs(&proteins, &ligands, &outdir, template_dir, by_ligand).await
        }
        Command::Collect {
            input,
            output,
            manifest,
            jobs_dir,
        } => commands::collect(&input, &output, manifest.as_deref(), jobs_dir.as_deref()).await,
        Command::Extract {
            input,
            output,
            lenient_chains,
        } => {
            let mut extraction = config.extraction;
            if lenient_chains {
                extraction.strict_chains = false;
            }
            commands::extract(&input, &output, extraction, &config.tools.pymol).await
        }
        Command::Predict {
            input,
            output,
            model,
            workers,
            batch_size,
            device,
        } => {
            let mut scoring = config.scoring;
            if let Some(workers) = workers {
                scoring = scoring.with_num_workers(workers);
            }
            if let Some(batch_size) = batch_size {
                scoring = scoring.with_batch_size(batch_size);
            }
            if let Some(device) = device {
                scoring = scoring.with_device(device);
            }
            commands::predict(&input, &output, &model, scoring, &config.tools.model_runner).await
        }
    }
}
