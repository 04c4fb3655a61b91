// engine/src/services/catalog_service/mod.rs
// CatalogService owns the session context and dispatches each operation to
// its handler module.
use crate::analytics::colors::ColorAnalysis;
use crate::analytics::launch::LaunchMix;
use crate::analytics::price_band::BandCount;
use crate::analytics::summary::{BrandComparison, BrandSummary, CategoryBrandPrice, DatasetOverview};
use crate::analytics::ValueCount;
use crate::config::settings::EngineSettings;
use crate::data::session::CatalogSession;
use crate::error::EngineResult;
use serde::Serialize;
use shared::models::PriceKind;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod dashboards;
pub mod load_catalog;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadCatalogReport {
    pub source: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

pub struct CatalogService {
    session: Arc<RwLock<CatalogSession>>,
    settings: Arc<EngineSettings>,
}

impl CatalogService {
    pub fn new(session: Arc<RwLock<CatalogSession>>, settings: EngineSettings) -> Self {
        CatalogService { session, settings: Arc::new(settings) }
    }

    pub async fn load_catalog<P: AsRef<Path>>(&self, path: P) -> EngineResult<LoadCatalogReport> {
        let path = path.as_ref().to_path_buf();
        tracing::info!(path = %path.display(), "Received catalog upload, dispatching to handler.");
        load_catalog::handle_load_catalog(path, self.settings.clone(), self.session.clone()).await
    }

    pub async fn overview(&self) -> EngineResult<DatasetOverview> {
        dashboards::handle_overview(&self.session).await
    }

    pub async fn brands(&self) -> EngineResult<Vec<String>> {
        dashboards::handle_brands(&self.session).await
    }

    pub async fn brand_dashboard(&self, brand: &str, kind: PriceKind) -> EngineResult<BrandSummary> {
        dashboards::handle_brand_dashboard(&self.session, brand, kind).await
    }

    pub async fn color_ranking(&self, brand: Option<&str>) -> EngineResult<Vec<ValueCount>> {
        dashboards::handle_color_ranking(&self.session, brand, self.settings.top_n).await
    }

    pub async fn color_analysis(&self, brand: Option<&str>) -> EngineResult<ColorAnalysis> {
        dashboards::handle_color_analysis(&self.session, brand).await
    }

    pub async fn launch_mix(&self, brand: Option<&str>) -> EngineResult<LaunchMix> {
        dashboards::handle_launch_mix(&self.session, brand).await
    }

    pub async fn price_positioning(&self, compared: &[String], kind: PriceKind) -> EngineResult<Vec<BandCount>> {
        dashboards::handle_price_positioning(&self.session, compared, kind).await
    }

    pub async fn category_heatmap(&self, kind: PriceKind) -> EngineResult<Vec<CategoryBrandPrice>> {
        dashboards::handle_category_heatmap(&self.session, kind).await
    }

    pub async fn brand_comparison(&self, first: &str, second: &str, kind: PriceKind) -> EngineResult<BrandComparison> {
        dashboards::handle_brand_comparison(&self.session, first, second, kind).await
    }
}
