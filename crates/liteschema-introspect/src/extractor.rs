use std::sync::Arc;

use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinSet;
use tracing::{Instrument, Span};

use liteschema_core::{
    CatalogEntry, CatalogSnapshot, DatabaseSchema, Error, OutputFormat, Result, TableSchema,
    Verbosity, assemble_table,
};

use crate::catalog::Catalog;
use crate::options::ExtractOptions;

/// Builds table schemas from a [`Catalog`], caching the catalog between
/// calls until its mutation counter advances.
pub struct SchemaExtractor<C> {
    catalog: C,
    options: ExtractOptions,
    cache: RwLock<Option<Arc<CatalogSnapshot>>>,
    span: Span,
}

impl<C: Catalog> SchemaExtractor<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_options(catalog, ExtractOptions::default())
    }

    pub fn with_options(catalog: C, options: ExtractOptions) -> Self {
        let span = tracing::debug_span!("schema_extractor", engine = catalog.engine());
        Self {
            catalog,
            options,
            cache: RwLock::new(None),
            span,
        }
    }

    /// Replace the span every operation of this extractor runs in.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Drop the cached snapshot and hand the catalog back.
    pub fn into_catalog(self) -> C {
        self.catalog
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Current catalog snapshot, rebuilt only when the mutation counter
    /// differs from the cached one.
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>> {
        self.cached_snapshot().instrument(self.span.clone()).await
    }

    async fn cached_snapshot(&self) -> Result<Arc<CatalogSnapshot>> {
        let counter = self.catalog.mutation_counter().await?;
        if let Some(snapshot) = current(&*self.cache.read().await, counter) {
            return Ok(snapshot);
        }

        let mut cache = self.cache.write().await;
        // rebuilt by another caller while waiting for the guard
        if let Some(snapshot) = current(&cache, counter) {
            return Ok(snapshot);
        }

        let entries = self.catalog.fetch_catalog_entries().await?;
        tracing::debug!(
            mutation_counter = counter,
            entries = entries.len(),
            "rebuilt catalog snapshot"
        );
        let snapshot = Arc::new(CatalogSnapshot::new(entries, counter));
        *cache = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Table names in catalog order, filtered by the extractor's options.
    pub async fn fetch_table_names(&self) -> Result<Vec<String>> {
        self.catalog
            .list_table_names(self.options.include_system_tables, self.options.include_views)
            .instrument(self.span.clone())
            .await
    }

    pub async fn fetch_view_names(&self) -> Result<Vec<String>> {
        self.catalog
            .list_view_names()
            .instrument(self.span.clone())
            .await
    }

    /// Raw catalog rows of the current snapshot.
    pub async fn fetch_catalog_entries(&self) -> Result<Vec<CatalogEntry>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.entries().to_vec())
    }

    pub async fn assemble_table(&self, table_name: &str) -> Result<TableSchema> {
        let snapshot = self.snapshot().await?;
        let _entered = self.span.enter();
        assemble_table(&snapshot, table_name)
    }

    /// Every listed table, in catalog order.
    ///
    /// Views, when included, have no column definitions and come out empty.
    pub async fn assemble_database(&self) -> Result<DatabaseSchema> {
        let snapshot = self.snapshot().await?;
        let names = snapshot.table_names(
            self.options.include_system_tables,
            self.options.include_views,
        );
        let workers = self.options.worker_count();
        tracing::debug!(parent: &self.span, tables = names.len(), workers, "assembling database");

        let tables = assemble_all(snapshot, names, workers, self.span.clone()).await?;
        Ok(DatabaseSchema {
            engine: self.catalog.engine().to_string(),
            tables,
        })
    }

    /// Render every listed table.
    pub async fn dumps(&self, format: OutputFormat, verbosity: Verbosity) -> Result<String> {
        self.assemble_database().await?.dumps(format, verbosity)
    }
}

fn current(cache: &Option<Arc<CatalogSnapshot>>, counter: u64) -> Option<Arc<CatalogSnapshot>> {
    cache
        .as_ref()
        .filter(|snapshot| snapshot.mutation_counter() == counter)
        .map(Arc::clone)
}

fn assemble_entry(snapshot: &CatalogSnapshot, name: &str) -> Result<TableSchema> {
    if snapshot.is_view(name) {
        return Ok(TableSchema::new(name, Vec::new()));
    }
    assemble_table(snapshot, name)
}

async fn assemble_all(
    snapshot: Arc<CatalogSnapshot>,
    names: Vec<String>,
    workers: usize,
    span: Span,
) -> Result<Vec<TableSchema>> {
    if workers <= 1 {
        let _entered = span.enter();
        return names
            .iter()
            .map(|name| assemble_entry(&snapshot, name))
            .collect();
    }

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();
    let mut slots: Vec<Option<TableSchema>> = vec![None; names.len()];

    for (position, name) in names.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|err| Error::Other(format!("worker pool closed: {err}")))?;
        let snapshot = Arc::clone(&snapshot);
        let span = span.clone();

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let _entered = span.enter();
            (position, assemble_entry(&snapshot, &name))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (position, table) =
            joined.map_err(|err| Error::Other(format!("table worker failed: {err}")))?;
        slots[position] = Some(table?);
    }

    Ok(slots.into_iter().flatten().collect())
}
