use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tokio::sync::Mutex;

use liteschema_core::{CatalogEntry, DatabaseSchema, ENGINE, Error, Result, is_system_table};

use crate::catalog::Catalog;
use crate::extractor::SchemaExtractor;
use crate::options::ExtractOptions;

mod queries;

/// Catalog reader over a single SQLite connection.
///
/// Every query holds the connection lock for its own duration only.
#[derive(Debug)]
pub struct SqliteCatalog {
    conn: Mutex<SqliteConnection>,
}

impl SqliteCatalog {
    /// Open the database file at `path` read-only.
    ///
    /// Fails with [`Error::SourceUnavailable`] when the file does not exist,
    /// cannot be opened, or is not a SQLite database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::SourceUnavailable(format!(
                "{}: no such database file",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);
        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|err| Error::SourceUnavailable(format!("{}: {err}", path.display())))?;
        queries::probe(&mut conn).await?;

        tracing::debug!(path = %path.display(), "opened sqlite catalog");
        Ok(Self::from_connection(conn))
    }

    /// Wrap a connection opened by the caller.
    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Give the connection back, e.g. to close it explicitly.
    pub fn into_connection(self) -> SqliteConnection {
        self.conn.into_inner()
    }
}

#[async_trait::async_trait]
impl Catalog for SqliteCatalog {
    fn engine(&self) -> &'static str {
        ENGINE
    }

    async fn fetch_catalog_entries(&self) -> Result<Vec<CatalogEntry>> {
        let mut conn = self.conn.lock().await;
        let rows = queries::list_master_rows(&mut conn).await?;
        Ok(rows.into_iter().filter_map(queries::RawMasterRow::into_entry).collect())
    }

    async fn mutation_counter(&self) -> Result<u64> {
        let mut conn = self.conn.lock().await;
        let schema_version = queries::fetch_schema_version(&mut conn).await?;
        let total_changes = queries::fetch_total_changes(&mut conn).await?;
        let counter = schema_version.max(0).saturating_add(total_changes.max(0));
        Ok(u64::try_from(counter).unwrap_or_default())
    }

    async fn list_table_names(
        &self,
        include_system: bool,
        include_views: bool,
    ) -> Result<Vec<String>> {
        let mut conn = self.conn.lock().await;
        let names = queries::list_table_names(&mut conn, include_views).await?;
        Ok(names
            .into_iter()
            .filter(|name| include_system || !is_system_table(name))
            .collect())
    }

    async fn list_view_names(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.lock().await;
        queries::list_view_names(&mut conn).await
    }
}

/// Extract every table of the SQLite database at `path` with default options.
pub async fn extract_sqlite(path: impl AsRef<Path>) -> Result<DatabaseSchema> {
    extract_sqlite_with_options(path, ExtractOptions::default()).await
}

/// Extract the SQLite database at `path` with caller-provided options.
pub async fn extract_sqlite_with_options(
    path: impl AsRef<Path>,
    options: ExtractOptions,
) -> Result<DatabaseSchema> {
    let catalog = SqliteCatalog::open(path).await?;
    SchemaExtractor::with_options(catalog, options)
        .assemble_database()
        .await
}
