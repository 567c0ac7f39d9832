//! Kolosal kNN - stratified cross-validation for a mixed-type KNN classifier
//!
//! Records hold numeric and text attributes side by side. Distances combine a
//! Euclidean term over numeric fields with Levenshtein edit distance over text
//! fields, and the classifier is scored by stratified k-fold cross-validation
//! into a confusion matrix.
//!
//! # Modules
//!
//! - [`data`] - Attributes, records, delimited-file reader
//! - [`training`] - Distance, categories, folds, KNN, cross-validation
//! - [`metrics`] - Confusion matrix and accuracy
//! - [`config`] - JSON experiment configuration
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core modules
pub mod data;
pub mod training;
pub mod metrics;
pub mod config;

// Services
pub mod cli;

pub use error::{KolosalError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{KolosalError, Result};

    // Data
    pub use crate::data::{Attribute, AttributeKind, DataReader, ReaderConfig, Record};

    // Training
    pub use crate::training::{
        CVResults, CategoryIndex, CrossValidator, DistanceMetric, FoldPartitioner, KNNClassifier,
        KNNConfig,
    };

    // Metrics
    pub use crate::metrics::ConfusionMatrix;

    // Configuration
    pub use crate::config::ExperimentConfig;
}
