//! Batching and collation of dataset items.

use futures::stream::{self, StreamExt, TryStreamExt};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use crate::config::ScorerConfig;
use crate::dataset::GraphDataset;
use crate::error::Result;
use crate::featurize::GraphData;

/// Groups items of an iterator into fixed-size batches; the last may be short.
pub struct BatchIterator<T, I>
where
    I: Iterator<Item = T>,
{
    source: I,
    batch_size: usize,
}

impl<T, I> BatchIterator<T, I>
where
    I: Iterator<Item = T>,
{
    pub fn new(source: I, batch_size: usize) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
        }
    }
}

impl<T, I> Iterator for BatchIterator<T, I>
where
    I: Iterator<Item = T>,
{
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<T> = self.source.by_ref().take(self.batch_size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

/// Disjoint union of the graphs in one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphBatch {
    pub x: Vec<Vec<f32>>,
    pub pos: Vec<[f64; 3]>,
    /// Edge endpoints shifted by each graph's node offset.
    pub edge_index_intra: Vec<[usize; 2]>,
    pub edge_index_inter: Vec<[usize; 2]>,
    /// Graph index of every node.
    pub batch: Vec<usize>,
    pub y: Vec<u32>,
    pub num_graphs: usize,
}

impl GraphBatch {
    pub fn collate(graphs: Vec<GraphData>) -> Self {
        let mut out = Self::default();
        for (graph_index, graph) in graphs.into_iter().enumerate() {
            let offset = out.x.len();
            let shift = |[a, b]: [usize; 2]| [a + offset, b + offset];
            out.edge_index_intra
                .extend(graph.edge_index_intra.into_iter().map(shift));
            out.edge_index_inter
                .extend(graph.edge_index_inter.into_iter().map(shift));
            out.batch
                .extend(std::iter::repeat(graph_index).take(graph.x.len()));
            out.x.extend(graph.x);
            out.pos.extend(graph.pos);
            out.y.push(graph.y);
            out.num_graphs += 1;
        }
        out
    }
}

pub struct DataLoader {
    dataset: GraphDataset,
    batch_size: usize,
    shuffle: bool,
    num_workers: usize,
    seed: Option<u64>,
}

impl DataLoader {
    /// Shuffling follows `config.create`; inference keeps metadata order.
    pub fn new(dataset: GraphDataset, config: &ScorerConfig) -> Self {
        Self {
            dataset,
            batch_size: config.batch_size.max(1),
            shuffle: config.create,
            num_workers: config.num_workers,
            seed: config.seed,
        }
    }

    pub fn dataset(&self) -> &GraphDataset {
        &self.dataset
    }

    pub fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    /// Dataset indices per batch, in yield order.
    pub fn plan(&self) -> Vec<Vec<usize>> {
        let mut indices: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            indices.shuffle(&mut rng);
        }
        BatchIterator::new(indices.into_iter(), self.batch_size).collect()
    }

    /// Up to `num_workers` loads in flight; graphs keep their index order.
    pub async fn load(&self, indices: &[usize]) -> Result<GraphBatch> {
        let graphs: Vec<GraphData> = stream::iter(indices.iter().copied())
            .map(|index| self.dataset.get(index))
            .buffered(self.num_workers.max(1))
            .try_collect()
            .await?;
        debug!(graphs = graphs.len(), "Collated batch");
        Ok(GraphBatch::collate(graphs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: usize, y: u32) -> GraphData {
        GraphData {
            x: vec![vec![0.0; 2]; nodes],
            pos: vec![[0.0; 3]; nodes],
            edge_index_intra: vec![[0, 1], [1, 0]],
            edge_index_inter: vec![],
            y,
        }
    }

    #[test]
    fn test_batch_iterator() {
        let batches: Vec<Vec<i32>> = BatchIterator::new(1..=7, 3).collect();
        assert_eq!(batches, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn test_collate_offsets_edges() {
        let batch = GraphBatch::collate(vec![graph(2, 5), graph(3, 9)]);
        assert_eq!(batch.num_graphs, 2);
        assert_eq!(batch.x.len(), 5);
        assert_eq!(batch.batch, vec![0, 0, 1, 1, 1]);
        assert_eq!(batch.edge_index_intra, vec![[0, 1], [1, 0], [2, 3], [3, 2]]);
        assert_eq!(batch.y, vec![5, 9]);
    }

    #[test]
    fn test_plan_keeps_order_without_create() {
        let rows = (0..5)
            .map(|i| gist_common::MetadataRow::new(format!("P{i}L1").into(), i))
            .collect();
        let dataset = GraphDataset::new("/nowhere", rows, 4.0, 5.0);
        let loader = DataLoader::new(dataset, &ScorerConfig::default().with_batch_size(2));
        assert_eq!(loader.plan(), vec![vec![0, 1], vec![2, 3], vec![4]]);
        assert_eq!(loader.num_batches(), 3);
    }

    #[test]
    fn test_plan_shuffles_with_create() {
        let rows = (0..50)
            .map(|i| gist_common::MetadataRow::new(format!("P{i}L1").into(), i))
            .collect();
        let dataset = GraphDataset::new("/nowhere", rows, 4.0, 5.0);
        let config = ScorerConfig::default()
            .with_batch_size(50)
            .with_create(true)
            .with_seed(7);
        let plan = DataLoader::new(dataset, &config).plan();
        let mut sorted = plan[0].clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(plan[0], sorted);
    }
}
