/// Options that control how a database is extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// List engine-internal tables such as `sqlite_sequence`.
    pub include_system_tables: bool,
    /// List views alongside tables. Views have no column definitions and
    /// are rendered as empty tables.
    pub include_views: bool,
    /// Width of the pool assembling table schemas. `0` is treated as `1`.
    pub max_workers: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_system_tables: false,
            include_views: false,
            max_workers: 1,
        }
    }
}

impl ExtractOptions {
    pub(crate) fn worker_count(&self) -> usize {
        self.max_workers.max(1)
    }
}
