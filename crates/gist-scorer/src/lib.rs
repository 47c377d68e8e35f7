//! Affinity scoring over extracted complexes.
//!
//! Loads the complexes listed in a metadata table as featurized graphs,
//! batches them, runs a pretrained model per batch, and joins every score
//! back to its complex id through the synthetic label.

pub mod batch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod featurize;
pub mod labels;
pub mod model;
pub mod predict;

pub use batch::{BatchIterator, DataLoader, GraphBatch};
pub use config::ScorerConfig;
pub use dataset::GraphDataset;
pub use error::{Result, ScoreError};
pub use featurize::{featurize, GraphData, NODE_FEATURE_DIM};
pub use labels::LabelMap;
pub use model::{AffinityModel, ExternalModel};
pub use predict::{predict, write_predictions, Prediction};
