//! Batch inference and the score/complex-id join.

use std::path::Path;

use gist_common::ComplexId;
use serde::Serialize;
use tracing::{debug, info};

use crate::batch::DataLoader;
use crate::error::{Result, ScoreError};
use crate::labels::LabelMap;
use crate::model::AffinityModel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub pred: f64,
    #[serde(rename = "label")]
    pub complex_id: ComplexId,
}

/// Score every complex the loader yields, in batch order.
///
/// The label map is built before any loading so a broken metadata join
/// fails the run up front.
pub async fn predict<M>(model: &M, loader: &DataLoader) -> Result<Vec<Prediction>>
where
    M: AffinityModel + ?Sized,
{
    let labels = LabelMap::from_rows(loader.dataset().rows())?;
    let plan = loader.plan();
    info!(
        complexes = loader.dataset().len(),
        batches = plan.len(),
        "Starting prediction"
    );

    let mut preds = Vec::with_capacity(loader.dataset().len());
    let mut ys = Vec::with_capacity(loader.dataset().len());
    for (batch_index, indices) in plan.iter().enumerate() {
        let batch = loader.load(indices).await?;
        let scores = model.score(&batch).await?;
        if scores.len() != batch.num_graphs {
            return Err(ScoreError::OutputLength {
                expected: batch.num_graphs,
                got: scores.len(),
            });
        }
        debug!(batch = batch_index, graphs = batch.num_graphs, "Batch scored");
        preds.extend(scores);
        ys.extend(batch.y);
    }

    rejoin(preds, &ys, &labels)
}

/// Pair each score with the complex its label was assigned to.
pub fn rejoin(preds: Vec<f64>, labels: &[u32], map: &LabelMap) -> Result<Vec<Prediction>> {
    preds
        .into_iter()
        .zip(labels)
        .map(|(pred, &label)| {
            Ok(Prediction {
                pred,
                complex_id: map.resolve(label)?.clone(),
            })
        })
        .collect()
}

/// `pred,label` table, rows in the order given.
pub fn write_predictions(path: &Path, predictions: &[Prediction]) -> Result<()> {
    let to_output = |source| ScoreError::Output {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_output)?;
    if predictions.is_empty() {
        writer.write_record(["pred", "label"]).map_err(to_output)?;
    }
    for prediction in predictions {
        writer.serialize(prediction).map_err(to_output)?;
    }
    writer.flush()?;
    info!("Wrote {} predictions to {:?}", predictions.len(), path);
    Ok(())
}
