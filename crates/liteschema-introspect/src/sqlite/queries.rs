use sqlx::SqliteConnection;

use liteschema_core::{CatalogEntry, CatalogEntryKind, Error, Result};

#[derive(Debug, sqlx::FromRow)]
pub struct RawMasterRow {
    #[sqlx(rename = "type")]
    pub kind: String,
    pub name: String,
    pub tbl_name: String,
    pub rootpage: Option<i64>,
    pub sql: Option<String>,
}

impl RawMasterRow {
    /// Map a catalog row; rows of an unknown type are dropped.
    pub fn into_entry(self) -> Option<CatalogEntry> {
        let kind = CatalogEntryKind::from_catalog_type(&self.kind)?;
        Some(CatalogEntry {
            owning_table: self.tbl_name,
            ddl: self.sql,
            kind,
            name: self.name,
            location: self.rootpage.unwrap_or_default(),
        })
    }
}

/// Run a single-value query to completion, so the statement releases its
/// read lock before returning.
async fn fetch_scalar(conn: &mut SqliteConnection, sql: &str) -> sqlx::Result<i64> {
    let values = sqlx::query_scalar::<_, i64>(sql).fetch_all(conn).await?;
    values.into_iter().next().ok_or(sqlx::Error::RowNotFound)
}

pub async fn probe(conn: &mut SqliteConnection) -> Result<()> {
    fetch_scalar(conn, "select count(*) from sqlite_master")
        .await
        .map_err(|err| Error::SourceUnavailable(err.to_string()))?;
    Ok(())
}

pub async fn list_master_rows(conn: &mut SqliteConnection) -> Result<Vec<RawMasterRow>> {
    sqlx::query_as::<_, RawMasterRow>(
        r#"
        select type, name, tbl_name, rootpage, sql
        from sqlite_master
        order by rowid
        "#,
    )
    .fetch_all(conn)
    .await
    .map_err(|err| Error::Db(err.to_string()))
}

pub async fn list_table_names(
    conn: &mut SqliteConnection,
    include_views: bool,
) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select name
        from sqlite_master
        where type = 'table' or (type = 'view' and ?1)
        order by rowid
        "#,
    )
    .bind(include_views)
    .fetch_all(conn)
    .await
    .map_err(|err| Error::Db(err.to_string()))
}

pub async fn list_view_names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select name
        from sqlite_master
        where type = 'view'
        order by rowid
        "#,
    )
    .fetch_all(conn)
    .await
    .map_err(|err| Error::Db(err.to_string()))
}

pub async fn fetch_schema_version(conn: &mut SqliteConnection) -> Result<i64> {
    fetch_scalar(conn, "pragma schema_version")
        .await
        .map_err(|err| Error::Db(err.to_string()))
}

pub async fn fetch_total_changes(conn: &mut SqliteConnection) -> Result<i64> {
    fetch_scalar(conn, "select total_changes()")
        .await
        .map_err(|err| Error::Db(err.to_string()))
}
