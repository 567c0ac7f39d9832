//! Delimited-file ingestion into typed records

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use super::attribute::Attribute;
use super::record::Record;
use crate::error::{KolosalError, Result};

/// Reader configuration. Column and row numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Field delimiter (single ASCII character)
    pub delimiter: char,
    /// Row where the data begins, counting non-blank lines (first line = 1)
    pub data_begin_row: usize,
    /// Column holding the label (first column = 1)
    pub label_column: Option<usize>,
    /// Columns dropped before classification (first column = 1)
    pub ignored_columns: Vec<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            data_begin_row: 1,
            label_column: None,
            ignored_columns: Vec::new(),
        }
    }
}

impl ReaderConfig {
    /// Check the settings and return the delimiter as a byte
    pub fn validate(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            return Err(KolosalError::ConfigError(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.data_begin_row == 0 {
            return Err(KolosalError::ConfigError(
                "data_begin_row is 1-based and must be at least 1".to_string(),
            ));
        }
        let label_column = self.label_column.ok_or_else(|| {
            KolosalError::ConfigError("label column must be set (first column = 1)".to_string())
        })?;
        if label_column == 0 || self.ignored_columns.contains(&0) {
            return Err(KolosalError::ConfigError(
                "column numbers are 1-based".to_string(),
            ));
        }
        if self.ignored_columns.contains(&label_column) {
            return Err(KolosalError::ConfigError(format!(
                "label column {} cannot be ignored",
                label_column
            )));
        }
        Ok(self.delimiter as u8)
    }

    /// Position of the label among the fields that survive column filtering
    pub fn effective_label_index(&self) -> Result<usize> {
        self.validate()?;
        let label_column = self.label_column.unwrap_or_default();
        let mut ignored: Vec<usize> = self.ignored_columns.clone();
        ignored.sort_unstable();
        ignored.dedup();
        let before = ignored.iter().filter(|&&c| c < label_column).count();
        Ok(label_column - 1 - before)
    }
}

/// Reads delimited rows into [`Record`]s, sniffing each cell's type
#[derive(Debug, Clone, Default)]
pub struct DataReader {
    config: ReaderConfig,
}

impl DataReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn with_data_begin_row(mut self, row: usize) -> Self {
        self.config.data_begin_row = row;
        self
    }

    pub fn with_label_column(mut self, column: usize) -> Self {
        self.config.label_column = Some(column);
        self
    }

    pub fn with_ignored_column(mut self, column: usize) -> Self {
        self.config.ignored_columns.push(column);
        self
    }

    pub fn with_ignored_columns(mut self, columns: &[usize]) -> Self {
        self.config.ignored_columns.extend_from_slice(columns);
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Label position in the records this reader produces
    pub fn label_index(&self) -> Result<usize> {
        self.config.effective_label_index()
    }

    /// Read all records from a file
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<Record>> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading data");
        let file = File::open(path)?;
        self.read_from(file)
    }

    /// Read all records from any byte source
    pub fn read_from<R: Read>(&self, source: R) -> Result<Vec<Record>> {
        let delimiter = self.config.validate()?;
        let label_index = self.config.effective_label_index()?;
        let label_column = self.config.label_column.unwrap_or_default();
        let start = Instant::now();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true)
            .quoting(false)
            .from_reader(source);

        let mut records = Vec::new();
        let mut expected_width: Option<usize> = None;
        let mut skipped = 0;

        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            if skipped + 1 < self.config.data_begin_row {
                skipped += 1;
                continue;
            }

            if row.len() < label_column {
                return Err(KolosalError::DataError(format!(
                    "line {}: {} columns, label column is {}",
                    line,
                    row.len(),
                    label_column
                )));
            }

            let fields: Vec<Attribute> = row
                .iter()
                .enumerate()
                .filter(|(i, _)| !self.config.ignored_columns.contains(&(i + 1)))
                .map(|(i, cell)| {
                    if i + 1 == label_column {
                        floor_label(cell)
                    } else {
                        Attribute::parse(cell)
                    }
                })
                .collect();

            match expected_width {
                None => expected_width = Some(fields.len()),
                Some(width) if width != fields.len() => {
                    return Err(KolosalError::DataError(format!(
                        "line {}: expected {} fields, got {}",
                        line,
                        width,
                        fields.len()
                    )));
                }
                Some(_) => {}
            }

            records.push(Record::new(fields, label_index)?);
        }

        debug!(
            rows = records.len(),
            skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Read complete"
        );
        Ok(records)
    }
}

/// Numeric labels are floored to whole numbers so they group into categories
fn floor_label(cell: &str) -> Attribute {
    match Attribute::parse(cell) {
        Attribute::Numeric(v) => Attribute::Numeric(v.floor()),
        text => text,
    }
}
