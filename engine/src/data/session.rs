// Per-session catalog context. A successful upload replaces the whole table;
// nothing else mutates it.
use chrono::{DateTime, Utc};
use shared::models::ProductTable;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub table: ProductTable,
    /// File name or path the table was decoded from.
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedCatalog {
    pub fn new(table: ProductTable, source: impl Into<String>) -> Self {
        LoadedCatalog { table, source: source.into(), loaded_at: Utc::now() }
    }
}

pub struct CatalogSession {
    session_id: Uuid,
    current: Option<LoadedCatalog>,
}

impl CatalogSession {
    pub fn new() -> Self {
        CatalogSession { session_id: Uuid::new_v4(), current: None }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn current(&self) -> Option<&LoadedCatalog> {
        self.current.as_ref()
    }

    /// Swaps in a new catalog and hands back the one it replaced.
    pub fn replace(&mut self, catalog: LoadedCatalog) -> Option<LoadedCatalog> {
        tracing::info!(
            session = %self.session_id,
            source = %catalog.source,
            rows = catalog.table.row_count(),
            "Replacing session catalog"
        );
        self.current.replace(catalog)
    }
}

impl Default for CatalogSession {
    fn default() -> Self {
        Self::new()
    }
}
