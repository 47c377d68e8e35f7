//! gist-jobs — Structure-prediction job generation.
//!
//! Builds one job specification per `(protein, ligand)` pair of the full cross product
//! and writes it as `{job_id}.json` in the schema the prediction engine expects:
//! sorted keys, 4-space indentation, identical bytes for identical inputs.

pub mod canonical;
pub mod error;
pub mod generator;
pub mod spec;

pub use error::{JobError, Result};
pub use generator::{GenerationReport, JobGenerator, OutputLayout, PlannedJob, TemplateStatus};
pub use spec::{JobSpec, DIALECT, MODEL_SEEDS, VERSION};
