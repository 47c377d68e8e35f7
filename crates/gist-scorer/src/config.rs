//! Configuration for affinity scoring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Complexes per model call (default: 128)
    pub batch_size: usize,

    /// Concurrent complex loads (default: 1)
    pub num_workers: usize,

    /// Ligand–pocket edge distance, in Å (default: 5)
    pub dis_threshold: f64,

    /// Interaction distance the complex files were written for, in Å (default: 4)
    pub interaction_cutoff: f64,

    /// Passed through to the model runner.
    pub device: String,

    /// Training mode. Only enables shuffling.
    pub create: bool,

    /// Shuffle seed; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            batch_size: 128,
            num_workers: 1,
            dis_threshold: 5.0,
            interaction_cutoff: 4.0,
            device: "cpu".to_string(),
            create: false,
            seed: None,
        }
    }
}

impl ScorerConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
