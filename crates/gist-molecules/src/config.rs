//! Configuration for complex extraction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Radius around the ligand chain for pocket residue selection, in Å (default: 5)
    pub pocket_radius: f64,

    /// Interaction distance recorded in the complex file name, in Å (default: 4)
    pub interaction_cutoff: f64,

    /// Abort the run when a structure lacks its ligand chain (default: true)
    pub strict_chains: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pocket_radius: 5.0,
            interaction_cutoff: 4.0,
            strict_chains: true,
        }
    }
}

impl ExtractionConfig {
    /// Record a missing ligand chain as a failed structure and keep going.
    pub fn lenient() -> Self {
        Self {
            strict_chains: false,
            ..Default::default()
        }
    }

    pub fn with_pocket_radius(mut self, radius: f64) -> Self {
        self.pocket_radius = radius;
        self
    }

    pub fn with_interaction_cutoff(mut self, cutoff: f64) -> Self {
        self.interaction_cutoff = cutoff;
        self
    }

    pub fn with_strict_chains(mut self, strict: bool) -> Self {
        self.strict_chains = strict;
        self
    }
}
