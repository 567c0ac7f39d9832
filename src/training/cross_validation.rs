//! Stratified k-fold cross-validation of the KNN classifier

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::category::CategoryIndex;
use super::config::KNNConfig;
use super::folds::{Fold, FoldPartitioner};
use super::knn::KNNClassifier;
use crate::data::{Attribute, Record};
use crate::error::{KolosalError, Result};
use crate::metrics::ConfusionMatrix;

/// Drives train / partition / classify / tally over the categorized dataset
#[derive(Debug, Clone, Default)]
pub struct CrossValidator {
    config: KNNConfig,
    index: Option<CategoryIndex>,
}

impl CrossValidator {
    /// Create a new cross-validator
    pub fn new(config: KNNConfig) -> Self {
        Self { config, index: None }
    }

    pub fn config(&self) -> &KNNConfig {
        &self.config
    }

    /// Categorized dataset, once trained
    pub fn index(&self) -> Option<&CategoryIndex> {
        self.index.as_ref()
    }

    /// Group `records` by the label at `label_index`, replacing any earlier dataset
    pub fn train(&mut self, records: Vec<Record>, label_index: usize) {
        info!(records = records.len(), label_index, "Categorizing records");
        self.index = Some(CategoryIndex::group(records, label_index));
    }

    /// Run cross-validation with the configured fold count
    pub fn evaluate(&self) -> Result<CVResults> {
        self.run(self.config.n_folds)
    }

    /// Run `n_folds`-fold cross-validation.
    ///
    /// Each fold is held out once and classified against the union of the
    /// others. A fresh matrix is built per run. A pass whose pool is empty
    /// classifies nothing and reports no fold accuracy.
    pub fn run(&self, n_folds: usize) -> Result<CVResults> {
        let index = self.index.as_ref().ok_or(KolosalError::NotTrained)?;
        let partitioner = FoldPartitioner::new(n_folds)?;
        let knn = KNNClassifier::new(self.config.n_neighbors, index.label_index())?;

        let folds = partitioner.partition(index);
        let mut matrix = ConfusionMatrix::new(index.labels());
        let mut fold_accuracies = Vec::with_capacity(n_folds);

        for (pass, test) in folds.iter().enumerate() {
            let start = Instant::now();
            let pool = training_pool(&folds, pass);
            if pool.is_empty() && !test.is_empty() {
                warn!(pass = pass + 1, test = test.len(), "Training pool is empty, skipping pass");
                fold_accuracies.push(None);
                continue;
            }
            let predictions = knn.predict(test.records(), &pool)?;

            let mut correct = 0usize;
            for (record, predicted) in test.iter().zip(&predictions) {
                let actual = &record.fields()[index.label_index()];
                matrix.increment(predicted, actual)?;
                if predicted == actual {
                    correct += 1;
                }
            }

            let fold_accuracy = if test.is_empty() {
                None
            } else {
                Some(correct as f64 / test.len() as f64)
            };
            fold_accuracies.push(fold_accuracy);

            info!(
                pass = pass + 1,
                test = test.len(),
                train = pool.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Pass complete"
            );
        }

        let results = CVResults::new(
            matrix,
            folds.iter().map(Fold::len).collect(),
            fold_accuracies,
        );
        info!(accuracy = ?results.accuracy, "Cross-validation complete");
        Ok(results)
    }

    /// Classify one record against the full trained dataset
    pub fn classify_one(&self, query: &Record) -> Result<Attribute> {
        let index = self.index.as_ref().ok_or(KolosalError::NotTrained)?;
        let knn = KNNClassifier::new(self.config.n_neighbors, index.label_index())?;
        let pool: Vec<&Record> = index.records().collect();
        knn.classify(query, &pool)
    }

    /// Time `iterations` classifications of the first record of fold 0
    /// against folds `1..k`
    pub fn measure_classification(&self, iterations: usize) -> Result<Duration> {
        let index = self.index.as_ref().ok_or(KolosalError::NotTrained)?;
        let partitioner = FoldPartitioner::new(self.config.n_folds)?;
        let knn = KNNClassifier::new(self.config.n_neighbors, index.label_index())?;

        let folds = partitioner.partition(index);
        let query = folds[0]
            .records()
            .first()
            .copied()
            .ok_or_else(|| KolosalError::DataError("first fold is empty".to_string()))?;
        let pool = training_pool(&folds, 0);

        debug!(iterations, pool = pool.len(), "Measuring classification time");
        let start = Instant::now();
        for _ in 0..iterations {
            std::hint::black_box(knn.classify(query, &pool)?);
        }
        Ok(start.elapsed())
    }
}

/// Concatenation of every fold except `held_out`
fn training_pool<'a>(folds: &[Fold<'a>], held_out: usize) -> Vec<&'a Record> {
    folds
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != held_out)
        .flat_map(|(_, fold)| fold.iter())
        .collect()
}

/// Cross-validation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CVResults {
    /// Counts over every held-out prediction
    pub matrix: ConfusionMatrix,
    /// Overall accuracy, `None` when nothing was classified
    pub accuracy: Option<f64>,
    /// Number of folds
    pub n_folds: usize,
    /// Records per fold
    pub fold_sizes: Vec<usize>,
    /// Accuracy per fold, `None` for an empty fold
    pub fold_accuracies: Vec<Option<f64>>,
    /// Mean of the defined fold accuracies
    pub mean_fold_accuracy: Option<f64>,
    /// Standard deviation of the defined fold accuracies
    pub std_fold_accuracy: Option<f64>,
}

impl CVResults {
    fn new(matrix: ConfusionMatrix, fold_sizes: Vec<usize>, fold_accuracies: Vec<Option<f64>>) -> Self {
        let scores: Vec<f64> = fold_accuracies.iter().flatten().copied().collect();
        let (mean, std) = if scores.is_empty() {
            (None, None)
        } else {
            let n = scores.len() as f64;
            let mean = scores.iter().sum::<f64>() / n;
            let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
            (Some(mean), Some(variance.sqrt()))
        };

        Self {
            accuracy: matrix.accuracy(),
            matrix,
            n_folds: fold_sizes.len(),
            fold_sizes,
            fold_accuracies,
            mean_fold_accuracy: mean,
            std_fold_accuracy: std,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64, label: &str) -> Record {
        Record::new(vec![Attribute::numeric(x), Attribute::text(label)], 1).unwrap()
    }

    fn separable() -> Vec<Record> {
        let mut records = Vec::new();
        for i in 0..6 {
            records.push(row(i as f64 * 0.1, "low"));
            records.push(row(10.0 + i as f64 * 0.1, "high"));
        }
        records
    }

    #[test]
    fn test_run_requires_training() {
        let cv = CrossValidator::new(KNNConfig::new(1, 2));
        assert!(matches!(cv.run(2), Err(KolosalError::NotTrained)));
        assert!(matches!(cv.classify_one(&row(0.0, "?")), Err(KolosalError::NotTrained)));
    }

    #[test]
    fn test_separable_data_is_perfect() {
        let mut cv = CrossValidator::new(KNNConfig::new(3, 3));
        cv.train(separable(), 1);

        let results = cv.evaluate().unwrap();
        assert_eq!(results.n_folds, 3);
        assert_eq!(results.fold_sizes, vec![4, 4, 4]);
        assert_eq!(results.matrix.total(), 12);
        assert_eq!(results.accuracy, Some(1.0));
        assert_eq!(results.mean_fold_accuracy, Some(1.0));
        assert_eq!(results.std_fold_accuracy, Some(0.0));
    }

    #[test]
    fn test_repeated_runs_do_not_accumulate() {
        let mut cv = CrossValidator::new(KNNConfig::new(1, 2));
        cv.train(separable(), 1);

        let first = cv.run(2).unwrap();
        let second = cv.run(2).unwrap();
        assert_eq!(first.matrix.total(), 12);
        assert_eq!(second.matrix.total(), 12);
        assert_eq!(first.matrix, second.matrix);
    }

    #[test]
    fn test_invalid_fold_count() {
        let mut cv = CrossValidator::new(KNNConfig::default());
        cv.train(separable(), 1);
        assert!(matches!(cv.run(1), Err(KolosalError::InvalidParameter { .. })));
    }

    #[test]
    fn test_classify_one_uses_full_dataset() {
        let mut cv = CrossValidator::new(KNNConfig::new(3, 2));
        cv.train(separable(), 1);
        assert_eq!(cv.classify_one(&row(9.7, "?")).unwrap(), Attribute::text("high"));
        assert_eq!(cv.classify_one(&row(0.2, "?")).unwrap(), Attribute::text("low"));
    }

    #[test]
    fn test_measure_classification() {
        let mut cv = CrossValidator::new(KNNConfig::new(3, 2));
        cv.train(separable(), 1);
        assert!(cv.measure_classification(10).is_ok());
    }

    #[test]
    fn test_empty_dataset_yields_empty_matrix() {
        let mut cv = CrossValidator::new(KNNConfig::new(3, 2));
        cv.train(Vec::new(), 0);
        let results = cv.run(2).unwrap();
        assert_eq!(results.matrix.n_categories(), 0);
        assert_eq!(results.accuracy, None);
        assert_eq!(results.fold_accuracies, vec![None, None]);
    }

    #[test]
    fn test_singleton_categories_skip_empty_pool() {
        // Every category has one record, so fold 0 holds all of them
        let mut cv = CrossValidator::new(KNNConfig::new(3, 2));
        cv.train(vec![row(0.0, "a"), row(1.0, "b"), row(2.0, "c")], 1);

        let results = cv.run(2).unwrap();
        assert_eq!(results.fold_sizes, vec![3, 0]);
        assert_eq!(results.fold_accuracies, vec![None, None]);
        assert_eq!(results.matrix.n_categories(), 3);
        assert_eq!(results.matrix.total(), 0);
        assert_eq!(results.accuracy, None);
        assert_eq!(results.mean_fold_accuracy, None);
    }
}
