use async_trait::async_trait;

use liteschema_core::{CatalogEntry, CatalogEntryKind, Result, is_system_table};

/// Read access to a database catalog.
///
/// The listing methods default to filtering [`Catalog::fetch_catalog_entries`];
/// readers with a cheaper query may override them.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the engine identifier (e.g. `sqlite`).
    fn engine(&self) -> &'static str;

    /// Every catalog row, in catalog order.
    async fn fetch_catalog_entries(&self) -> Result<Vec<CatalogEntry>>;

    /// Non-decreasing value that advances whenever the catalog may have
    /// changed.
    async fn mutation_counter(&self) -> Result<u64>;

    async fn list_table_names(
        &self,
        include_system: bool,
        include_views: bool,
    ) -> Result<Vec<String>> {
        let entries = self.fetch_catalog_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| match entry.kind {
                CatalogEntryKind::Table => include_system || !is_system_table(&entry.name),
                CatalogEntryKind::View => include_views,
                _ => false,
            })
            .map(|entry| entry.name)
            .collect())
    }

    async fn list_view_names(&self) -> Result<Vec<String>> {
        let entries = self.fetch_catalog_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.kind == CatalogEntryKind::View)
            .map(|entry| entry.name)
            .collect())
    }
}
