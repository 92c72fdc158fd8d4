use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Engine-internal tables that may be requested even though they carry no
/// user-defined columns.
///
/// See <https://www.sqlite.org/fileformat2.html>.
pub const SQLITE_SYSTEM_TABLES: &[&str] = &[
    "sqlite_master",
    "sqlite_sequence",
    "sqlite_stat1",
    "sqlite_stat2",
    "sqlite_stat3",
    "sqlite_stat4",
];

/// Returns true when `table_name` is a reserved SQLite system table.
pub fn is_system_table(table_name: &str) -> bool {
    SQLITE_SYSTEM_TABLES.contains(&table_name)
}

/// Schema snapshot for every user table of a database, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseSchema {
    /// Database engine identifier (e.g. `sqlite`).
    pub engine: String,
    /// Tables captured from the catalog.
    pub tables: Vec<TableSchema>,
}

impl DatabaseSchema {
    /// Look up a table by name.
    pub fn table(&self, table_name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|table| table.name == table_name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }
}

/// Ordered column records of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    pub name: String,
    pub attributes: Vec<AttributeRecord>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, attributes: Vec<AttributeRecord>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// Column names in declaration order.
    pub fn attr_names(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .map(|attribute| attribute.name.as_str())
            .collect()
    }

    /// First column carrying a primary or unique key role.
    pub fn primary_key(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.key_role != KeyRole::None)
            .map(|attribute| attribute.name.as_str())
    }

    /// Names of the columns covered by an index, in declaration order.
    pub fn index_list(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.is_indexed)
            .map(|attribute| attribute.name.as_str())
            .collect()
    }
}

/// Structured record for one column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeRecord {
    /// Column name with quoting stripped. Never empty.
    pub name: String,
    /// Declared type; SQLite allows columns without one.
    pub declared_type: Option<String>,
    pub nullable: bool,
    pub key_role: KeyRole,
    /// Default expression text, `NULL` for nullable columns without a default
    /// and an empty string for NOT NULL columns without a default.
    pub default: String,
    pub is_indexed: bool,
    pub extra: BTreeSet<ExtraFlag>,
    pub comment: Option<String>,
}

/// Key constraint carried by a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    #[default]
    None,
    Primary,
    Unique,
}

impl KeyRole {
    /// Short label used by the tabular projections (`PRI`, `UNI` or empty).
    pub fn label(self) -> &'static str {
        match self {
            KeyRole::None => "",
            KeyRole::Primary => "PRI",
            KeyRole::Unique => "UNI",
        }
    }

    /// Constraint keywords as they appear in DDL.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            KeyRole::None => None,
            KeyRole::Primary => Some("PRIMARY KEY"),
            KeyRole::Unique => Some("UNIQUE"),
        }
    }

    /// Primary and unique constraints are backed by an implicit index.
    pub fn implies_index(self) -> bool {
        self != KeyRole::None
    }
}

/// Extra column flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum ExtraFlag {
    #[serde(rename = "AUTOINCREMENT")]
    AutoIncrement,
}

impl ExtraFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtraFlag::AutoIncrement => "AUTOINCREMENT",
        }
    }
}
