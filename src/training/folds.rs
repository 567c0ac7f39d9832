//! Stratified fold partitioning
//!
//! Each category is cut into `k` contiguous slices whose sizes differ by at
//! most one, larger slices first. Fold `i` is the concatenation of every
//! category's slice `i`, so each fold carries a proportional share of every
//! category.

use std::ops::Range;
use tracing::debug;

use super::category::CategoryIndex;
use crate::data::Record;
use crate::error::{KolosalError, Result};

/// One held-out partition, borrowing records from the [`CategoryIndex`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fold<'a> {
    records: Vec<&'a Record>,
}

impl<'a> Fold<'a> {
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }
}

/// Splits categorized records into `k` stratified folds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldPartitioner {
    n_folds: usize,
}

impl FoldPartitioner {
    pub fn new(n_folds: usize) -> Result<Self> {
        if n_folds < 2 {
            return Err(KolosalError::InvalidParameter {
                name: "n_folds".to_string(),
                value: n_folds.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        Ok(Self { n_folds })
    }

    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Build the folds. Category order follows the index.
    pub fn partition<'a>(&self, index: &'a CategoryIndex) -> Vec<Fold<'a>> {
        let mut folds: Vec<Fold<'a>> = vec![Fold::default(); self.n_folds];

        for category in index.categories() {
            let members = category.members();
            for (i, fold) in folds.iter_mut().enumerate() {
                let range = slice_range(members.len(), self.n_folds, i);
                fold.records.extend(members[range].iter());
            }
        }

        debug!(
            n_folds = self.n_folds,
            sizes = ?folds.iter().map(Fold::len).collect::<Vec<_>>(),
            "Created folds"
        );
        folds
    }
}

/// Slice of a category of size `n` that belongs to fold `i` of `k`.
///
/// Folds below `n % k` take `ceil(n / k)` members, the rest `floor(n / k)`.
/// Bounds are clamped to `n`.
pub fn slice_range(n: usize, k: usize, i: usize) -> Range<usize> {
    let floor = n / k;
    let remainder = n % k;
    let ceil = if remainder == 0 { floor } else { floor + 1 };

    let (start, len) = if i < remainder {
        (i * ceil, ceil)
    } else {
        (remainder * ceil + (i - remainder) * floor, floor)
    };

    let start = start.min(n);
    let end = (start + len).min(n);
    start..end
}
