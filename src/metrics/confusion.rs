//! Confusion matrix over a fixed category list

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::Attribute;
use crate::error::{KolosalError, Result};

/// Square count table indexed `[actual][predicted]` by category position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    categories: Vec<Attribute>,
    counts: Array2<u64>,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix for `categories`
    pub fn new(categories: Vec<Attribute>) -> Self {
        let n = categories.len();
        Self {
            categories,
            counts: Array2::zeros((n, n)),
        }
    }

    pub fn categories(&self) -> &[Attribute] {
        &self.categories
    }

    pub fn counts(&self) -> ArrayView2<'_, u64> {
        self.counts.view()
    }

    pub fn n_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn position(&self, label: &Attribute) -> Option<usize> {
        self.categories.iter().position(|c| c == label)
    }

    /// Tally one prediction.
    ///
    /// Labels outside the category list return [`KolosalError::UnknownCategory`]
    /// and leave the counts untouched.
    pub fn increment(&mut self, predicted: &Attribute, actual: &Attribute) -> Result<()> {
        let p = self
            .position(predicted)
            .ok_or_else(|| KolosalError::UnknownCategory(predicted.to_string()))?;
        let a = self
            .position(actual)
            .ok_or_else(|| KolosalError::UnknownCategory(actual.to_string()))?;
        self.counts[[a, p]] += 1;
        Ok(())
    }

    /// Zero all counts, keeping the categories
    pub fn reset(&mut self) {
        self.counts.fill(0);
    }

    pub fn get(&self, actual: usize, predicted: usize) -> Option<u64> {
        self.counts.get([actual, predicted]).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    pub fn correct(&self) -> u64 {
        self.counts.diag().sum()
    }

    /// Diagonal over total, `None` while the matrix is empty
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.correct() as f64 / total as f64)
    }

    /// Share of category `i`'s records predicted as `i`
    pub fn recall(&self, i: usize) -> Option<f64> {
        if i >= self.n_categories() {
            return None;
        }
        let row = self.counts.index_axis(Axis(0), i);
        ratio(self.counts[[i, i]], row.sum())
    }

    /// Share of predictions of category `i` that were `i`
    pub fn precision(&self, i: usize) -> Option<f64> {
        if i >= self.n_categories() {
            return None;
        }
        let col = self.counts.index_axis(Axis(1), i);
        ratio(self.counts[[i, i]], col.sum())
    }
}

fn ratio(hits: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(hits as f64 / total as f64)
    }
}
