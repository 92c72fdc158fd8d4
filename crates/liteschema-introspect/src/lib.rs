//! Catalog readers and the schema extractor built on top of them.

pub mod catalog;
pub mod extractor;
pub mod options;
pub mod sqlite;

pub use catalog::Catalog;
pub use extractor::SchemaExtractor;
pub use options::ExtractOptions;
pub use sqlite::{SqliteCatalog, extract_sqlite, extract_sqlite_with_options};

pub use liteschema_core::DatabaseSchema;
