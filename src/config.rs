//! Experiment configuration: ingestion settings plus classifier settings

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::ReaderConfig;
use crate::error::Result;
use crate::training::KNNConfig;

/// Everything needed to run one evaluation, loadable from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub reader: ReaderConfig,
    pub knn: KNNConfig,
}

impl ExperimentConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate both halves
    pub fn validate(&self) -> Result<()> {
        self.reader.validate()?;
        self.knn.validate()
    }
}
