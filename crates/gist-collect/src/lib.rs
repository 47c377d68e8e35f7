//! Gist Result Collector
//!
//! The engine leaves one directory per job, `{job_id}/`, holding `{job_id}_model.cif`
//! and `{job_id}_summary_confidences.json` among other files. The collector moves those
//! two artifacts into a flat results directory, records a status for every job id, and
//! removes a job's source directory only after both artifacts are confirmed in place.

pub mod collector;
pub mod error;
pub mod store;

pub use collector::{expected_jobs_from_specs, ResultCollector};
pub use error::{CollectError, Result};
pub use store::{JobStatus, ResultArtifactPair, ResultStore};
