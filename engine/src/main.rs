// brand-benchmark: loads a scraped catalog and prints the dashboard figures
use anyhow::Result;
use clap::Parser;
use engine::analytics::colors::ColorAnalysis;
use engine::analytics::launch::LaunchMix;
use engine::analytics::price_band::{band_totals, BandCount, BandTotal};
use engine::analytics::summary::{BrandComparison, BrandSummary, CategoryBrandPrice, DatasetOverview};
use engine::analytics::{PriceStats, ValueCount};
use engine::config::settings::EngineSettings;
use engine::data::session::CatalogSession;
use engine::services::{CatalogService, LoadCatalogReport};
use engine::EngineError;
use serde::Serialize;
use shared::models::PriceKind;
use shared::utils::brazilian_format::format_reais;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "brand-benchmark")]
#[command(about = "Normalizes a scraped product catalog and prints benchmarking figures", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog export to load (.csv or .xlsx)
    file: PathBuf,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Brand for the dashboard, color and launch views
    #[arg(long)]
    brand: Option<String>,

    /// Price column to aggregate: initial or final
    #[arg(long)]
    price: Option<PriceKind>,

    /// Brands to compare in the price positioning view (repeatable). Exactly two also
    /// prints their side-by-side category prices
    #[arg(long)]
    compare: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    upload: LoadCatalogReport,
    overview: DatasetOverview,
    brand: Option<BrandSummary>,
    colors: Option<Vec<ValueCount>>,
    color_analysis: Option<ColorAnalysis>,
    launch_mix: Option<LaunchMix>,
    positioning: Vec<BandCount>,
    band_totals: Vec<BandTotal>,
    comparison: Option<BrandComparison>,
    heatmap: Vec<CategoryBrandPrice>,
}

// Views that need optional columns are skipped with a warning.
fn optional_view<T>(view: &str, result: Result<T, EngineError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(EngineError::MissingColumns { missing, .. }) => {
            warn!(view, missing = %missing.join(", "), "Skipping view, catalog lacks its columns");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn money(value: Option<f64>) -> String {
    value.map(format_reais).unwrap_or_else(|| "-".to_string())
}

fn print_report(report: &Report) {
    let overview = &report.overview;
    println!("Catalog: {} ({} rows)", report.upload.source, report.upload.rows);
    println!("Products:    {}", overview.total_products);
    println!("Brands:      {}", overview.brands);
    println!("Categories:  {}", overview.categories);
    println!("Mean price:  {}", money(overview.mean_initial_price));

    if let Some(summary) = &report.brand {
        println!();
        println!("== {} ({}) ==", summary.brand, summary.price_kind);
        println!("Products:      {}", summary.total_products);
        println!("Categories:    {}", summary.categories);
        if let Some(stats) = &summary.price {
            println!("Mean price:    {}", format_reais(stats.mean));
            println!("Price range:   {} - {} (amplitude {})", format_reais(stats.min), format_reais(stats.max), format_reais(stats.amplitude()));
        }
        if let Some(discount) = summary.mean_discount_percent {
            println!("Mean discount: {:.1}%", discount);
        }
        if let Some(launches) = summary.launches {
            println!(
                "Launches:      {} ({:.1}% of portfolio, mean {}, older mean {})",
                launches,
                summary.launch_share_percent.unwrap_or_default(),
                money(summary.mean_launch_price),
                money(summary.mean_older_price)
            );
            if let Some(delta) = summary.launch_price_delta_percent {
                println!("Launch premium: {:+.1}% vs older products", delta);
            }
        }
        for category in &summary.category_prices {
            println!(
                "  {:<20} min {:>14} mean {:>14} max {:>14} n={}",
                category.category,
                format_reais(category.stats.min),
                format_reais(category.stats.mean),
                format_reais(category.stats.max),
                category.stats.count
            );
        }
    }

    if let Some(colors) = &report.colors {
        println!();
        println!("Top colors:");
        for color in colors {
            println!("  {:<20} {}", color.value, color.count);
        }
    }

    if let Some(analysis) = &report.color_analysis {
        println!();
        println!("Distinct colors:  {}", analysis.distinct_colors);
        if let Some(per_product) = analysis.mean_colors_per_product {
            println!("Colors/product:   {:.1}", per_product);
        }
        println!("Most common:      {}", analysis.most_common.as_deref().unwrap_or("N/A"));
        println!("Color shares:");
        for share in &analysis.distribution {
            println!("  {:<20} {:>5.1}% ({})", share.color, share.percent, share.count);
        }
        let matrix = &analysis.matrix;
        if !matrix.categories.is_empty() {
            println!("Colors by category ({}):", matrix.colors.join(", "));
            for (category, counts) in matrix.categories.iter().zip(&matrix.counts) {
                let row: Vec<String> = counts.iter().map(usize::to_string).collect();
                println!("  {:<20} {}", category, row.join(" "));
            }
        }
    }

    if let Some(mix) = &report.launch_mix {
        println!();
        println!(
            "Launches: {} / older: {} ({:.1}% launches)",
            mix.launches,
            mix.older,
            mix.launch_percent().unwrap_or_default()
        );
        for share in &mix.by_category {
            println!("  {:<20} {:>5.1}% ({} of {})", share.category, share.launch_percent, share.launches, share.total);
        }
    }

    if !report.positioning.is_empty() {
        println!();
        println!("Price positioning:");
        for band in &report.positioning {
            println!("  {:<10} {:<20} {:<15} {}", band.band.to_string(), band.category, band.brand, band.count);
        }
        println!("Products per band:");
        for total in &report.band_totals {
            println!("  {:<10} {}", total.band.to_string(), total.count);
        }
    }

    if let Some(comparison) = &report.comparison {
        println!();
        println!("== {} vs {} ({}) ==", comparison.first_brand, comparison.second_brand, comparison.price_kind);
        for category in &comparison.categories {
            let side = |stats: Option<PriceStats>| match stats {
                Some(s) => format!("{} / {} / {}", format_reais(s.min), format_reais(s.mean), format_reais(s.max)),
                None => "-".to_string(),
            };
            println!("  {:<20} {:<45} {}", category.category, side(category.first), side(category.second));
        }
    }

    if !report.heatmap.is_empty() {
        println!();
        println!("Mean price by category and brand:");
        for cell in &report.heatmap {
            println!("  {:<20} {:<15} {}", cell.category, cell.brand, format_reais(cell.mean_price));
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => EngineSettings::load_from_file(path)?,
        None => EngineSettings::default(),
    };
    let price_kind = cli.price.unwrap_or(settings.default_price);

    let session = Arc::new(RwLock::new(CatalogSession::new()));
    let session_id = session.read().await.session_id();
    info!(session = %session_id, "Starting brand benchmark session");
    let service = CatalogService::new(session, settings);

    let upload = service.load_catalog(&cli.file).await?;
    info!(rows = upload.rows, "Catalog ready");

    let brand = match &cli.brand {
        Some(brand) => Some(service.brand_dashboard(brand, price_kind).await?),
        None => None,
    };

    let comparison = match cli.compare.as_slice() {
        [first, second] => Some(service.brand_comparison(first, second, price_kind).await?),
        _ => None,
    };
    let positioning = service.price_positioning(&cli.compare, price_kind).await?;

    let report = Report {
        upload,
        overview: service.overview().await?,
        brand,
        colors: optional_view("colors", service.color_ranking(cli.brand.as_deref()).await)?,
        color_analysis: optional_view("color_analysis", service.color_analysis(cli.brand.as_deref()).await)?,
        launch_mix: optional_view("launch_mix", service.launch_mix(cli.brand.as_deref()).await)?,
        band_totals: band_totals(&positioning),
        positioning,
        comparison,
        heatmap: service.category_heatmap(price_kind).await?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
