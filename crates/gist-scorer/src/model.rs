//! Pretrained affinity models.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::batch::GraphBatch;
use crate::error::{Result, ScoreError};

/// One score per graph in the batch, in graph order.
#[async_trait]
pub trait AffinityModel: Send + Sync {
    async fn score(&self, batch: &GraphBatch) -> Result<Vec<f64>>;
}

/// Model served by an external runner.
///
/// Invoked as `{executable} {model_path} --device {device}` once per batch.
/// The batch is written to stdin as JSON; stdout must be a JSON array of
/// numbers.
pub struct ExternalModel {
    executable_path: PathBuf,
    model_path: PathBuf,
    device: String,
}

impl ExternalModel {
    pub fn new<P: AsRef<Path>, M: AsRef<Path>>(
        executable_path: P,
        model_path: M,
        device: impl Into<String>,
    ) -> Self {
        let model = Self {
            executable_path: executable_path.as_ref().to_path_buf(),
            model_path: model_path.as_ref().to_path_buf(),
            device: device.into(),
        };
        info!(
            "Using model {:?} on {} via {:?}",
            model.model_path, model.device, model.executable_path
        );
        model
    }
}

#[async_trait]
impl AffinityModel for ExternalModel {
    async fn score(&self, batch: &GraphBatch) -> Result<Vec<f64>> {
        let input = serde_json::to_vec(batch)?;

        let mut child = Command::new(&self.executable_path)
            .arg(&self.model_path)
            .arg("--device")
            .arg(&self.device)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A runner that exits early is reported through its status below.
            if let Err(e) = stdin.write_all(&input).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScoreError::Model(stderr.trim().to_string()));
        }

        let scores: Vec<f64> = serde_json::from_slice(&output.stdout)?;
        debug!(graphs = batch.num_graphs, "Scored batch");
        Ok(scores)
    }
}
