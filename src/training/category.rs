//! Grouping of records by label value
//!
//! Categories appear in first-occurrence order and keep their members in
//! insertion order. Fold partitioning slices members by position, so both
//! orders are observable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::data::{Attribute, Record};

/// All records sharing one label value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    label: Attribute,
    members: Vec<Record>,
}

impl Category {
    fn new(label: Attribute) -> Self {
        Self {
            label,
            members: Vec::new(),
        }
    }

    pub fn label(&self) -> &Attribute {
        &self.label
    }

    pub fn members(&self) -> &[Record] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Ordered collection of categories owning the dataset's records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryIndex {
    categories: Vec<Category>,
    label_index: usize,
}

impl CategoryIndex {
    /// Group `records` by the attribute at `label_index`.
    ///
    /// An empty input or a label index outside the records yields an empty index.
    pub fn group(records: Vec<Record>, label_index: usize) -> Self {
        let mut index = Self {
            categories: Vec::new(),
            label_index,
        };

        let Some(first) = records.first() else {
            return index;
        };
        if label_index >= first.len() {
            warn!(label_index, fields = first.len(), "Label index outside record, no categories built");
            return index;
        }

        let mut positions: HashMap<Attribute, usize> = HashMap::new();
        let mut dropped = 0usize;

        for record in records {
            let Some(label) = record.get(label_index).cloned() else {
                dropped += 1;
                continue;
            };
            let pos = *positions.entry(label.clone()).or_insert_with(|| {
                index.categories.push(Category::new(label));
                index.categories.len() - 1
            });
            index.categories[pos].members.push(record);
        }

        if dropped > 0 {
            warn!(dropped, "Records too short for the label index were dropped");
        }
        info!(
            categories = index.categories.len(),
            records = index.total_records(),
            "Categorized records"
        );
        index
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn label_index(&self) -> usize {
        self.label_index
    }

    /// Label values in category order
    pub fn labels(&self) -> Vec<Attribute> {
        self.categories.iter().map(|c| c.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.categories.iter().map(Category::len).sum()
    }

    /// Every record, category by category
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.categories.iter().flat_map(|c| c.members.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64, label: &str) -> Record {
        Record::new(vec![Attribute::numeric(x), Attribute::text(label)], 1).unwrap()
    }

    #[test]
    fn test_first_seen_order() {
        let records = vec![
            row(1.0, "b"),
            row(2.0, "a"),
            row(3.0, "b"),
            row(4.0, "c"),
            row(5.0, "a"),
        ];
        let index = CategoryIndex::group(records, 1);

        assert_eq!(
            index.labels(),
            vec![Attribute::text("b"), Attribute::text("a"), Attribute::text("c")]
        );
        let b: Vec<f64> = index.categories()[0]
            .members()
            .iter()
            .filter_map(|r| r.fields()[0].as_numeric())
            .collect();
        assert_eq!(b, vec![1.0, 3.0]);
        assert_eq!(index.total_records(), 5);
    }

    #[test]
    fn test_empty_input() {
        let index = CategoryIndex::group(Vec::new(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_invalid_label_index() {
        let index = CategoryIndex::group(vec![row(1.0, "a")], 5);
        assert!(index.is_empty());
        assert_eq!(index.total_records(), 0);
    }

    #[test]
    fn test_numeric_labels_group_by_value() {
        let records = vec![
            Record::new(vec![Attribute::text("x"), Attribute::numeric(5.0)], 1).unwrap(),
            Record::new(vec![Attribute::text("y"), Attribute::numeric(6.0)], 1).unwrap(),
            Record::new(vec![Attribute::text("z"), Attribute::numeric(5.0)], 1).unwrap(),
        ];
        let index = CategoryIndex::group(records, 1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.categories()[0].len(), 2);
    }
}
