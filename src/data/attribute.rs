//! Typed attribute values

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind tag of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Numeric value, compared by squared difference
    Numeric,
    /// Textual value, compared by edit distance
    Text,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Numeric => write!(f, "numeric"),
            AttributeKind::Text => write!(f, "text"),
        }
    }
}

/// A single typed value within a record.
///
/// Equality is value and kind equality. Numeric values compare with
/// `f64::total_cmp`, so equality is reflexive (NaN equals itself) and
/// attributes can be used as hash keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Attribute {
    Numeric(f64),
    Text(String),
}

impl Attribute {
    pub fn numeric(value: f64) -> Self {
        Attribute::Numeric(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Attribute::Text(value.into())
    }

    /// Sniff a raw cell: a fully parseable finite number is numeric, anything else text
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Attribute::Numeric(v),
            _ => Attribute::Text(trimmed.to_string()),
        }
    }

    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Numeric(_) => AttributeKind::Numeric,
            Attribute::Text(_) => AttributeKind::Text,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Attribute::Numeric(v) => Some(*v),
            Attribute::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Attribute::Text(s) => Some(s),
            Attribute::Numeric(_) => None,
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Attribute::Numeric(a), Attribute::Numeric(b)) => a.total_cmp(b) == Ordering::Equal,
            (Attribute::Text(a), Attribute::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Attribute::Numeric(v) => v.to_bits().hash(state),
            Attribute::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Numeric(v) => write!(f, "{}", v),
            Attribute::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Attribute {
    fn from(value: f64) -> Self {
        Attribute::Numeric(value)
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::Text(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_sniffs_kind() {
        assert_eq!(Attribute::parse(" 5.1 "), Attribute::Numeric(5.1));
        assert_eq!(Attribute::parse("-3"), Attribute::Numeric(-3.0));
        assert_eq!(Attribute::parse("Iris-setosa"), Attribute::text("Iris-setosa"));
        assert_eq!(Attribute::parse("1.2.3"), Attribute::text("1.2.3"));
        assert_eq!(Attribute::parse("NaN").kind(), AttributeKind::Text);
        assert_eq!(Attribute::parse("inf").kind(), AttributeKind::Text);
    }

    #[test]
    fn test_equality_is_value_and_kind() {
        assert_eq!(Attribute::numeric(1.0), Attribute::numeric(1.0));
        assert_ne!(Attribute::numeric(1.0), Attribute::text("1"));
        assert_ne!(Attribute::text("a"), Attribute::text("b"));
        assert_eq!(Attribute::numeric(f64::NAN), Attribute::numeric(f64::NAN));
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(Attribute::numeric(2.0));
        set.insert(Attribute::numeric(2.0));
        set.insert(Attribute::text("2"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Attribute::numeric(5.0).to_string(), "5");
        assert_eq!(Attribute::text("red").to_string(), "red");
    }
}
