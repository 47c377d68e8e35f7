//! Configuration loading for gist.
//! Reads the file given by `--config` / GIST_CONFIG, else gist.toml in the
//! current directory if present, else built-in defaults.

use std::path::{Path, PathBuf};

use gist_molecules::ExtractionConfig;
use gist_scorer::ScorerConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "gist.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub scoring: ScorerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsConfig {
    pub template_dir: Option<PathBuf>,
    #[serde(default)]
    pub by_ligand: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_pymol")]
    pub pymol: PathBuf,
    /// Runner invoked as `{model_runner} {model} --device {device}`.
    #[serde(default = "default_model_runner")]
    pub model_runner: PathBuf,
}

fn default_pymol() -> PathBuf { PathBuf::from("pymol") }
fn default_model_runner() -> PathBuf { PathBuf::from("gist-model") }

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            pymol: default_pymol(),
            model_runner: default_model_runner(),
        }
    }
}

impl Config {
    /// An explicit path must exist; the implicit gist.toml is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::from_file(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
