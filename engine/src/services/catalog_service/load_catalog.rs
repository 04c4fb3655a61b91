// Handler for catalog uploads: decode, normalize, validate, then replace the session table
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::LoadCatalogReport;
use crate::config::settings::EngineSettings;
use crate::data::csv_parser::CatalogCsvParser;
use crate::data::price_normalizer::PriceNormalizer;
use crate::data::schema::validate_schema;
use crate::data::session::{CatalogSession, LoadedCatalog};
use crate::error::{EngineError, EngineResult};
use shared::models::ProductTable;

fn decode_and_normalize(path: &Path, settings: &EngineSettings) -> EngineResult<ProductTable> {
    let raw = CatalogCsvParser::load_table(path, settings)?;
    let normalized = PriceNormalizer::from_settings(settings).normalize(&raw);
    validate_schema(&normalized, &settings.required_columns)?;
    Ok(normalized)
}

pub async fn handle_load_catalog(
    path: PathBuf,
    settings: Arc<EngineSettings>,
    session: Arc<RwLock<CatalogSession>>,
) -> EngineResult<LoadCatalogReport> {
    let source = path.display().to_string();

    let decode_path = path.clone();
    let table = tokio::task::spawn_blocking(move || decode_and_normalize(&decode_path, &settings))
        .await
        .map_err(|e| EngineError::ProcessingError(format!("Catalog decode task failed: {}", e)))?;

    let table = match table {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(source = %source, error_detail = %e, "Rejected catalog upload, keeping current session data");
            return Err(e);
        }
    };

    let report = LoadCatalogReport {
        source: source.clone(),
        rows: table.row_count(),
        columns: table.column_names().into_iter().map(str::to_string).collect(),
    };

    session.write().await.replace(LoadedCatalog::new(table, source));
    Ok(report)
}
