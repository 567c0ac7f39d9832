//! K-Nearest Neighbors implementation
//!
//! Majority-vote KNN classifier over mixed numeric/text records.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::distance::DistanceMetric;
use crate::data::{Attribute, Record};
use crate::error::{KolosalError, Result};

/// K-Nearest Neighbors Classifier
///
/// Holds no training data of its own; every call ranks the pool it is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KNNClassifier {
    n_neighbors: usize,
    label_index: usize,
    metric: DistanceMetric,
}

impl KNNClassifier {
    /// Classifier voting over `n_neighbors`, with the label at `label_index`
    /// masked out of distance computation
    pub fn new(n_neighbors: usize, label_index: usize) -> Result<Self> {
        if n_neighbors == 0 {
            return Err(KolosalError::InvalidParameter {
                name: "n_neighbors".to_string(),
                value: "0".to_string(),
                reason: "at least one neighbor is required".to_string(),
            });
        }
        Ok(Self {
            n_neighbors,
            label_index,
            metric: DistanceMetric::masking(label_index),
        })
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn label_index(&self) -> usize {
        self.label_index
    }

    /// The `n_neighbors` closest pool records, nearest first.
    ///
    /// The whole pool is sorted; records at equal distance keep pool order.
    /// A pool smaller than `n_neighbors` is returned whole.
    pub fn nearest<'a>(&self, query: &Record, pool: &[&'a Record]) -> Result<Vec<(f64, &'a Record)>> {
        let mut ranked = pool
            .iter()
            .map(|&candidate| {
                self.metric
                    .distance(query, candidate)
                    .map(|d| (d, candidate))
            })
            .collect::<Result<Vec<_>>>()?;

        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(self.n_neighbors);
        Ok(ranked)
    }

    /// Predict the label of `query` by majority vote of its nearest neighbors
    pub fn classify(&self, query: &Record, pool: &[&Record]) -> Result<Attribute> {
        if query.get(self.label_index).is_none() {
            return Err(KolosalError::ShapeMismatch {
                expected: format!("more than {} fields", self.label_index),
                actual: format!("{} fields", query.len()),
            });
        }
        if pool.is_empty() {
            return Err(KolosalError::EmptyTrainingPool);
        }

        let neighbors = self.nearest(query, pool)?;
        vote(&neighbors, self.label_index)
    }

    /// Classify many queries against one pool (parallelized over queries).
    /// Predictions come back in query order.
    pub fn predict(&self, queries: &[&Record], pool: &[&Record]) -> Result<Vec<Attribute>> {
        queries
            .par_iter()
            .map(|query| self.classify(query, pool))
            .collect()
    }
}

/// Classify `query` against `pool` with `k` neighbors and the label at `label_index`
pub fn classify(query: &Record, pool: &[&Record], k: usize, label_index: usize) -> Result<Attribute> {
    KNNClassifier::new(k, label_index)?.classify(query, pool)
}

// ============================================================================
// Voting
// ============================================================================

/// Most frequent label among `neighbors`.
///
/// Ties go to the label encountered first while tallying in neighbor order.
fn vote(neighbors: &[(f64, &Record)], label_index: usize) -> Result<Attribute> {
    let mut tally: Vec<(&Attribute, usize)> = Vec::new();

    for (_, record) in neighbors {
        let label = record.get(label_index).ok_or_else(|| KolosalError::ShapeMismatch {
            expected: format!("more than {} fields", label_index),
            actual: format!("{} fields", record.len()),
        })?;
        match tally.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(&Attribute, usize)> = None;
    for &(label, count) in &tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((label, count));
        }
    }

    best.map(|(label, _)| label.clone())
        .ok_or(KolosalError::EmptyTrainingPool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, label: &str) -> Record {
        Record::new(
            vec![Attribute::numeric(x), Attribute::numeric(y), Attribute::text(label)],
            2,
        )
        .unwrap()
    }

    fn create_classification_data() -> Vec<Record> {
        let mut records = Vec::new();
        for i in 0..10 {
            let offset = i as f64 * 0.15;
            records.push(point(1.0 + offset, 1.0 + offset, "low"));
            records.push(point(8.0 + offset, 8.0 + offset, "high"));
        }
        records
    }

    #[test]
    fn test_knn_classifier() {
        let data = create_classification_data();
        let pool: Vec<&Record> = data.iter().collect();
        let knn = KNNClassifier::new(3, 2).unwrap();

        let predictions = knn.predict(&pool, &pool).unwrap();
        let correct = data
            .iter()
            .zip(predictions.iter())
            .filter(|(r, p)| r.label() == *p)
            .count();

        let accuracy = correct as f64 / data.len() as f64;
        assert!(accuracy > 0.9, "Accuracy ({}) should be above 90%", accuracy);
    }

    #[test]
    fn test_majority_beats_nearest() {
        let data = vec![point(0.0, 0.0, "X"), point(0.2, 0.0, "X"), point(5.0, 5.0, "Y")];
        let pool: Vec<&Record> = data.iter().collect();
        let query = point(0.1, 0.1, "?");

        assert_eq!(classify(&query, &pool, 2, 2).unwrap(), Attribute::text("X"));
        // Y is farthest but still outvoted at k=3
        assert_eq!(classify(&query, &pool, 3, 2).unwrap(), Attribute::text("X"));
    }

    #[test]
    fn test_k1_returns_nearest_label() {
        let data = vec![point(3.0, 3.0, "far"), point(1.0, 1.0, "near"), point(2.0, 2.0, "mid")];
        let pool: Vec<&Record> = data.iter().collect();
        let query = point(0.0, 0.0, "?");
        assert_eq!(classify(&query, &pool, 1, 2).unwrap(), Attribute::text("near"));
    }

    #[test]
    fn test_equal_distance_keeps_pool_order() {
        let data = vec![point(1.0, 0.0, "first"), point(-1.0, 0.0, "second")];
        let pool: Vec<&Record> = data.iter().collect();
        let query = point(0.0, 0.0, "?");
        assert_eq!(classify(&query, &pool, 1, 2).unwrap(), Attribute::text("first"));
    }

    #[test]
    fn test_tie_goes_to_first_seen_label() {
        // Sorted neighbors: B, A, A, B -> tie 2:2, B seen first
        let data = vec![
            point(1.0, 0.0, "B"),
            point(2.0, 0.0, "A"),
            point(3.0, 0.0, "A"),
            point(4.0, 0.0, "B"),
        ];
        let pool: Vec<&Record> = data.iter().collect();
        let query = point(0.0, 0.0, "?");
        assert_eq!(classify(&query, &pool, 4, 2).unwrap(), Attribute::text("B"));
    }

    #[test]
    fn test_small_pool_uses_everything() {
        let data = vec![point(0.0, 0.0, "X"), point(9.0, 9.0, "Y"), point(8.0, 8.0, "Y")];
        let pool: Vec<&Record> = data.iter().collect();
        let query = point(0.0, 0.0, "?");

        let knn = KNNClassifier::new(10, 2).unwrap();
        assert_eq!(knn.nearest(&query, &pool).unwrap().len(), 3);
        assert_eq!(knn.classify(&query, &pool).unwrap(), Attribute::text("Y"));
    }

    #[test]
    fn test_label_is_masked() {
        // Identical features; the label text differs by a lot from the query's
        let data = vec![point(0.0, 0.0, "a-very-long-label"), point(0.5, 0.0, "b")];
        let pool: Vec<&Record> = data.iter().collect();
        let query = point(0.0, 0.0, "b");

        let knn = KNNClassifier::new(1, 2).unwrap();
        let nearest = knn.nearest(&query, &pool).unwrap();
        assert_eq!(nearest[0].0, 0.0);
        assert_eq!(knn.classify(&query, &pool).unwrap(), Attribute::text("a-very-long-label"));
    }

    #[test]
    fn test_errors() {
        let query = point(0.0, 0.0, "?");
        assert!(matches!(
            classify(&query, &[], 3, 2),
            Err(KolosalError::EmptyTrainingPool)
        ));
        assert!(KNNClassifier::new(0, 2).is_err());

        let short = Record::new(vec![Attribute::numeric(1.0), Attribute::text("x")], 1).unwrap();
        assert!(matches!(
            classify(&query, &[&short], 1, 2),
            Err(KolosalError::ShapeMismatch { .. })
        ));
    }
}
