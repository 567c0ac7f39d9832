//! Classifier and evaluation configuration

use serde::{Deserialize, Serialize};

use crate::error::{KolosalError, Result};

/// Configuration for kNN classification and cross-validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KNNConfig {
    /// Number of neighbors consulted per vote
    pub n_neighbors: usize,

    /// Number of stratified folds
    pub n_folds: usize,
}

impl Default for KNNConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 10,
            n_folds: 10,
        }
    }
}

impl KNNConfig {
    pub fn new(n_neighbors: usize, n_folds: usize) -> Self {
        Self { n_neighbors, n_folds }
    }

    pub fn with_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_neighbors == 0 {
            return Err(KolosalError::InvalidParameter {
                name: "n_neighbors".to_string(),
                value: "0".to_string(),
                reason: "at least one neighbor is required".to_string(),
            });
        }
        if self.n_folds < 2 {
            return Err(KolosalError::InvalidParameter {
                name: "n_folds".to_string(),
                value: self.n_folds.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        Ok(())
    }
}
