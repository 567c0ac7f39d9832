//! Mixed-type distance between records
//!
//! Numeric positions contribute a Euclidean term, text positions contribute
//! their Levenshtein edit distance. The two are combined as
//! `text_sum + sqrt(numeric_sq_sum)`; the text term is not squared.

use serde::{Deserialize, Serialize};

use crate::data::{Attribute, Record};
use crate::error::{KolosalError, Result};

/// Distance metric over [`Record`]s with an optional masked position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceMetric {
    masked: Option<usize>,
}

impl DistanceMetric {
    /// Metric over every field
    pub fn new() -> Self {
        Self { masked: None }
    }

    /// Metric that skips the field at `index` (the label during classification)
    pub fn masking(index: usize) -> Self {
        Self { masked: Some(index) }
    }

    pub fn masked(&self) -> Option<usize> {
        self.masked
    }

    /// Distance between `query` and `candidate`.
    ///
    /// Fails with [`KolosalError::ShapeMismatch`] if the field counts differ
    /// or a position holds different attribute kinds.
    pub fn distance(&self, query: &Record, candidate: &Record) -> Result<f64> {
        if query.len() != candidate.len() {
            return Err(KolosalError::ShapeMismatch {
                expected: format!("{} fields", query.len()),
                actual: format!("{} fields", candidate.len()),
            });
        }

        let mut text_sum = 0.0;
        let mut numeric_sq_sum = 0.0;

        for (i, (a, b)) in query.fields().iter().zip(candidate.fields()).enumerate() {
            if self.masked == Some(i) {
                continue;
            }
            match (a, b) {
                (Attribute::Text(x), Attribute::Text(y)) => {
                    text_sum += levenshtein(x, y) as f64;
                }
                (Attribute::Numeric(x), Attribute::Numeric(y)) => {
                    let d = x - y;
                    numeric_sq_sum += d * d;
                }
                _ => {
                    return Err(KolosalError::ShapeMismatch {
                        expected: format!("{} attribute at position {}", a.kind(), i),
                        actual: format!("{} attribute", b.kind()),
                    });
                }
            }
        }

        Ok(text_sum + numeric_sq_sum.sqrt())
    }
}

/// Levenshtein edit distance with unit costs, computed over chars.
///
/// Single-row dynamic programming: O(n·m) time, O(min(n, m)) space.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = diagonal + usize::from(lc != sc);
            let next = substitution.min(row[j] + 1).min(row[j + 1] + 1);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[short.len()]
}
