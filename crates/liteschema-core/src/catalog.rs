use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::is_system_table;

/// Kind of object recorded in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CatalogEntryKind {
    Table,
    Index,
    View,
    Trigger,
}

impl CatalogEntryKind {
    /// Parse the `type` column of `sqlite_master`.
    pub fn from_catalog_type(value: &str) -> Option<Self> {
        match value {
            "table" => Some(Self::Table),
            "index" => Some(Self::Index),
            "view" => Some(Self::View),
            "trigger" => Some(Self::Trigger),
            _ => None,
        }
    }
}

/// One row of the catalog, named after the `sqlite_master` columns when
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    #[serde(rename = "tbl_name")]
    pub owning_table: String,
    /// DDL text; absent for auto-created indexes.
    #[serde(rename = "sql")]
    pub ddl: Option<String>,
    #[serde(rename = "type")]
    pub kind: CatalogEntryKind,
    pub name: String,
    #[serde(rename = "rootpage")]
    pub location: i64,
}

/// Immutable copy of the catalog taken at a given mutation counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    entries: Vec<CatalogEntry>,
    mutation_counter: u64,
}

impl CatalogSnapshot {
    pub fn new(entries: Vec<CatalogEntry>, mutation_counter: u64) -> Self {
        Self {
            entries,
            mutation_counter,
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn mutation_counter(&self) -> u64 {
        self.mutation_counter
    }

    /// `CREATE TABLE` text of `table_name`, if the catalog has one.
    pub fn table_ddl(&self, table_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.kind == CatalogEntryKind::Table && entry.owning_table == table_name)
            .and_then(|entry| entry.ddl.as_deref())
    }

    /// `CREATE INDEX` statements attached to `table_name`.
    pub fn index_ddls(&self, table_name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == CatalogEntryKind::Index && entry.owning_table == table_name)
            .filter_map(|entry| entry.ddl.as_deref())
            .filter(|ddl| !ddl.trim().is_empty())
            .collect()
    }

    pub fn is_view(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.kind == CatalogEntryKind::View && entry.name == name)
    }

    /// Table names in catalog order.
    pub fn table_names(&self, include_system: bool, include_views: bool) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| match entry.kind {
                CatalogEntryKind::Table => include_system || !is_system_table(&entry.name),
                CatalogEntryKind::View => include_views,
                _ => false,
            })
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn view_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == CatalogEntryKind::View)
            .map(|entry| entry.name.clone())
            .collect()
    }
}
