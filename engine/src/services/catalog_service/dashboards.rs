// Read-only handlers backing the dashboard tabs
use tokio::sync::RwLock;

use crate::analytics::colors::{color_analysis, ColorAnalysis};
use crate::analytics::launch::{launch_mix, LaunchMix};
use crate::analytics::price_band::{band_distribution, BandCount};
use crate::analytics::summary::{
    brand_comparison, brand_summary, category_brand_prices, dataset_overview, BrandComparison, BrandSummary,
    CategoryBrandPrice, DatasetOverview,
};
use crate::analytics::{brands, select_rows, value_counts, ValueCount};
use crate::data::session::CatalogSession;
use crate::error::{EngineError, EngineResult};
use shared::models::{PriceKind, ProductTable, BRAND, COLOR_CATEGORY, IS_LAUNCH};

async fn with_catalog<T>(
    session: &RwLock<CatalogSession>,
    query: impl FnOnce(&ProductTable) -> EngineResult<T>,
) -> EngineResult<T> {
    let guard = session.read().await;
    let catalog = guard.current().ok_or(EngineError::NoCatalogLoaded)?;
    query(&catalog.table)
}

fn missing_column(table: &ProductTable, column: &str) -> EngineError {
    EngineError::MissingColumns {
        missing: vec![column.to_string()],
        found: table.column_names().into_iter().map(str::to_string).collect(),
    }
}

fn rows_for(table: &ProductTable, brand: Option<&str>) -> EngineResult<Vec<usize>> {
    let rows = select_rows(table, brand);
    match brand {
        Some(brand) if rows.is_empty() => Err(EngineError::BrandNotFound(brand.to_string())),
        _ => Ok(rows),
    }
}

pub async fn handle_overview(session: &RwLock<CatalogSession>) -> EngineResult<DatasetOverview> {
    with_catalog(session, |table| Ok(dataset_overview(table))).await
}

pub async fn handle_brands(session: &RwLock<CatalogSession>) -> EngineResult<Vec<String>> {
    with_catalog(session, |table| Ok(brands(table))).await
}

pub async fn handle_brand_dashboard(
    session: &RwLock<CatalogSession>,
    brand: &str,
    kind: PriceKind,
) -> EngineResult<BrandSummary> {
    tracing::debug!(brand, price = %kind, "Building brand dashboard");
    with_catalog(session, |table| {
        brand_summary(table, brand, kind).ok_or_else(|| EngineError::BrandNotFound(brand.to_string()))
    })
    .await
}

pub async fn handle_color_ranking(
    session: &RwLock<CatalogSession>,
    brand: Option<&str>,
    top_n: usize,
) -> EngineResult<Vec<ValueCount>> {
    with_catalog(session, |table| {
        if !table.has_column(COLOR_CATEGORY) {
            return Err(missing_column(table, COLOR_CATEGORY));
        }
        let rows = rows_for(table, brand)?;
        Ok(value_counts(table, COLOR_CATEGORY, &rows, Some(top_n)))
    })
    .await
}

pub async fn handle_color_analysis(
    session: &RwLock<CatalogSession>,
    brand: Option<&str>,
) -> EngineResult<ColorAnalysis> {
    with_catalog(session, |table| {
        if !table.has_column(COLOR_CATEGORY) {
            return Err(missing_column(table, COLOR_CATEGORY));
        }
        let rows = rows_for(table, brand)?;
        Ok(color_analysis(table, &rows))
    })
    .await
}

pub async fn handle_launch_mix(session: &RwLock<CatalogSession>, brand: Option<&str>) -> EngineResult<LaunchMix> {
    with_catalog(session, |table| {
        let rows = rows_for(table, brand)?;
        launch_mix(table, &rows).ok_or_else(|| missing_column(table, IS_LAUNCH))
    })
    .await
}

/// Price band counts for the given brands; an empty slice means every brand.
pub async fn handle_price_positioning(
    session: &RwLock<CatalogSession>,
    compared: &[String],
    kind: PriceKind,
) -> EngineResult<Vec<BandCount>> {
    with_catalog(session, |table| {
        let rows: Vec<usize> = if compared.is_empty() {
            select_rows(table, None)
        } else {
            for brand in compared {
                rows_for(table, Some(brand.as_str()))?;
            }
            select_rows(table, None)
                .into_iter()
                .filter(|&row| {
                    table
                        .cell_text(BRAND, row)
                        .is_some_and(|b| compared.iter().any(|c| *c == b))
                })
                .collect()
        };
        Ok(band_distribution(table, kind, &rows))
    })
    .await
}

/// Mean price per category and brand over the whole catalog.
pub async fn handle_category_heatmap(
    session: &RwLock<CatalogSession>,
    kind: PriceKind,
) -> EngineResult<Vec<CategoryBrandPrice>> {
    with_catalog(session, |table| Ok(category_brand_prices(table, kind))).await
}

pub async fn handle_brand_comparison(
    session: &RwLock<CatalogSession>,
    first: &str,
    second: &str,
    kind: PriceKind,
) -> EngineResult<BrandComparison> {
    tracing::debug!(first, second, price = %kind, "Comparing brands by category");
    with_catalog(session, |table| {
        rows_for(table, Some(first))?;
        rows_for(table, Some(second))?;
        Ok(brand_comparison(table, first, second, kind))
    })
    .await
}
