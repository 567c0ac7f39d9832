//! Model training module
//!
//! Provides the mixed-type KNN classifier and its evaluation:
//! - Mixed numeric/text distance (Euclidean + Levenshtein)
//! - Grouping of records into label categories
//! - Stratified fold partitioning
//! - Majority-vote K-Nearest Neighbors
//! - K-fold cross-validation driving the above

mod config;
pub mod category;
pub mod cross_validation;
pub mod distance;
pub mod folds;
pub mod knn;

pub use config::KNNConfig;
pub use category::{Category, CategoryIndex};
pub use cross_validation::{CrossValidator, CVResults};
pub use distance::{levenshtein, DistanceMetric};
pub use folds::{Fold, FoldPartitioner};
pub use knn::KNNClassifier;
