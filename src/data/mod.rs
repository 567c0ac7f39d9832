//! Data model and ingestion
//!
//! Typed attributes, records, and the delimited-file reader that produces them.

pub mod attribute;
pub mod record;
pub mod reader;

pub use attribute::{Attribute, AttributeKind};
pub use record::Record;
pub use reader::{DataReader, ReaderConfig};
