//! Core contracts and parsers for liteschema.
//!
//! This crate defines the schema record types, the DDL text parsers that
//! produce them from SQLite catalog entries, and the renderers that project
//! them at a chosen verbosity.

pub mod assemble;
pub mod catalog;
pub mod error;
pub mod parse;
pub mod render;
pub mod schema;

pub use assemble::assemble_table;
pub use catalog::{CatalogEntry, CatalogEntryKind, CatalogSnapshot};
pub use error::{Error, Result};
pub use render::{Cell, Field, OutputFormat, TableData, Verbosity};
pub use schema::{
    AttributeRecord, DatabaseSchema, ExtraFlag, KeyRole, SQLITE_SYSTEM_TABLES, TableSchema,
    is_system_table,
};

/// Engine identifier reported in database schemas.
pub const ENGINE: &str = "sqlite";
