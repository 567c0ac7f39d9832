//! Records: one row of typed attributes with a designated label position

use serde::{Deserialize, Serialize};

use super::attribute::{Attribute, AttributeKind};
use crate::error::{KolosalError, Result};

/// A single row of data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<Attribute>,
    label_index: usize,
}

impl Record {
    /// Create a record, checking that `label_index` addresses one of the fields
    pub fn new(fields: Vec<Attribute>, label_index: usize) -> Result<Self> {
        if label_index >= fields.len() {
            return Err(KolosalError::InvalidParameter {
                name: "label_index".to_string(),
                value: label_index.to_string(),
                reason: format!("record has {} fields", fields.len()),
            });
        }
        Ok(Self { fields, label_index })
    }

    pub fn fields(&self) -> &[Attribute] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn label_index(&self) -> usize {
        self.label_index
    }

    /// Ground-truth category of this record
    pub fn label(&self) -> &Attribute {
        &self.fields[self.label_index]
    }

    /// Kind tag per position, used for shape checks
    pub fn kinds(&self) -> impl Iterator<Item = AttributeKind> + '_ {
        self.fields.iter().map(Attribute::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_label() {
        let record = Record::new(
            vec![Attribute::numeric(1.0), Attribute::text("x"), Attribute::text("yes")],
            2,
        )
        .unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.label(), &Attribute::text("yes"));
        assert_eq!(
            record.kinds().collect::<Vec<_>>(),
            vec![AttributeKind::Numeric, AttributeKind::Text, AttributeKind::Text]
        );
    }

    #[test]
    fn test_record_rejects_out_of_range_label() {
        let result = Record::new(vec![Attribute::numeric(1.0)], 1);
        assert!(matches!(result, Err(KolosalError::InvalidParameter { .. })));

        let result = Record::new(Vec::new(), 0);
        assert!(result.is_err());
    }
}
