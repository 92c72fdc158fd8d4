//! Decomposition of catalog DDL text into column records.
//!
//! The pieces are pure functions: [`split_table_definition`] cuts a
//! `CREATE TABLE` statement into [`ColumnFragment`]s, [`parse_column`] turns a
//! fragment into an [`AttributeRecord`](crate::AttributeRecord) and
//! [`is_column_indexed`] checks a column against `CREATE INDEX` statements.

pub mod column;
pub mod index;
mod scan;
pub mod table;
pub mod tokenizer;

pub use column::{ColumnParts, NULL_DEFAULT, parse_column, split_column_definition};
pub use index::{ColumnMatcher, index_column_list, is_column_indexed};
pub use table::{ColumnFragment, is_foreign_key_clause, split_table_definition};
pub use tokenizer::split_identifier;
