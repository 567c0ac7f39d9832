//! Evaluation metrics

pub mod confusion;

pub use confusion::ConfusionMatrix;
