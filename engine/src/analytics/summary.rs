// Overview and per-brand dashboard figures
use super::launch::launch_flags;
use super::{distinct_values, mean, present_prices, round_to, row_prices, select_rows, PriceStats, ValueCount};
use serde::Serialize;
use shared::models::{PriceKind, ProductTable, BRAND, COLOR_CATEGORY, PRODUCT_CATEGORY};
use std::collections::BTreeMap;

/// Colors shown on the brand dashboard.
pub const BRAND_TOP_COLORS: usize = 5;

/// Discount between initial and final price, in percent of the initial price.
pub fn discount_percent(initial: Option<f64>, final_price: Option<f64>) -> Option<f64> {
    match (initial, final_price) {
        (Some(initial), Some(final_price)) if initial != 0.0 => Some((initial - final_price) / initial * 100.0),
        _ => None,
    }
}

fn row_discounts(table: &ProductTable, rows: &[usize]) -> Vec<Option<f64>> {
    row_prices(table, PriceKind::Initial, rows)
        .into_iter()
        .zip(row_prices(table, PriceKind::Final, rows))
        .map(|(initial, final_price)| discount_percent(initial, final_price))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub total_products: usize,
    pub brands: usize,
    pub categories: usize,
    pub mean_initial_price: Option<f64>,
}

pub fn dataset_overview(table: &ProductTable) -> DatasetOverview {
    let rows = select_rows(table, None);
    DatasetOverview {
        total_products: table.row_count(),
        brands: distinct_values(table, BRAND, &rows).len(),
        categories: distinct_values(table, PRODUCT_CATEGORY, &rows).len(),
        mean_initial_price: mean(&present_prices(table, PriceKind::Initial, &rows)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPriceSummary {
    pub category: String,
    pub stats: PriceStats,
}

/// Min / mean / max / count of the chosen price per category, sorted by category.
/// Categories with no priced rows are omitted.
pub fn category_price_summary(table: &ProductTable, kind: PriceKind, rows: &[usize]) -> Vec<CategoryPriceSummary> {
    let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (&row, price) in rows.iter().zip(row_prices(table, kind, rows)) {
        if let (Some(category), Some(price)) = (table.cell_text(PRODUCT_CATEGORY, row), price) {
            by_category.entry(category).or_default().push(price);
        }
    }

    by_category
        .into_iter()
        .filter_map(|(category, prices)| {
            PriceStats::from_values(&prices).map(|stats| CategoryPriceSummary { category, stats })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDiscount {
    pub category: String,
    /// Rounded to one decimal.
    pub mean_discount_percent: f64,
}

pub fn category_discounts(table: &ProductTable, rows: &[usize]) -> Vec<CategoryDiscount> {
    let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (&row, discount) in rows.iter().zip(row_discounts(table, rows)) {
        if let (Some(category), Some(discount)) = (table.cell_text(PRODUCT_CATEGORY, row), discount) {
            by_category.entry(category).or_default().push(discount);
        }
    }

    by_category
        .into_iter()
        .filter_map(|(category, discounts)| {
            mean(&discounts).map(|m| CategoryDiscount { category, mean_discount_percent: round_to(m, 1) })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBrandPrice {
    pub category: String,
    pub brand: String,
    pub mean_price: f64,
}

/// Mean price per (category, brand) across the whole catalog, for the positioning heatmap.
pub fn category_brand_prices(table: &ProductTable, kind: PriceKind) -> Vec<CategoryBrandPrice> {
    let rows = select_rows(table, None);
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for (&row, price) in rows.iter().zip(row_prices(table, kind, &rows)) {
        if let (Some(category), Some(brand), Some(price)) =
            (table.cell_text(PRODUCT_CATEGORY, row), table.cell_text(BRAND, row), price)
        {
            groups.entry((category, brand)).or_default().push(price);
        }
    }

    groups
        .into_iter()
        .filter_map(|((category, brand), prices)| {
            mean(&prices).map(|mean_price| CategoryBrandPrice { category, brand, mean_price })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub category: String,
    pub first: Option<PriceStats>,
    pub second: Option<PriceStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandComparison {
    pub first_brand: String,
    pub second_brand: String,
    pub price_kind: PriceKind,
    /// Every category either brand prices, sorted. A side is `None` where that brand has no priced product.
    pub categories: Vec<CategoryComparison>,
}

/// Side-by-side category min / mean / max of two brands.
pub fn brand_comparison(table: &ProductTable, first: &str, second: &str, kind: PriceKind) -> BrandComparison {
    let mut merged: BTreeMap<String, CategoryComparison> = BTreeMap::new();
    let sides = [first, second].map(|brand| category_price_summary(table, kind, &select_rows(table, Some(brand))));

    for (side, summaries) in sides.into_iter().enumerate() {
        for CategoryPriceSummary { category, stats } in summaries {
            let entry = merged.entry(category.clone()).or_insert(CategoryComparison { category, first: None, second: None });
            if side == 0 {
                entry.first = Some(stats);
            } else {
                entry.second = Some(stats);
            }
        }
    }

    BrandComparison {
        first_brand: first.to_string(),
        second_brand: second.to_string(),
        price_kind: kind,
        categories: merged.into_values().collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandSummary {
    pub brand: String,
    pub price_kind: PriceKind,
    pub total_products: usize,
    pub price: Option<PriceStats>,
    pub mean_discount_percent: Option<f64>,
    pub categories: usize,
    /// `None` when the catalog has no `Is_Launch` column.
    pub launches: Option<usize>,
    /// Launches as a share of the brand's products, rounded to one decimal.
    pub launch_share_percent: Option<f64>,
    pub mean_launch_price: Option<f64>,
    pub mean_older_price: Option<f64>,
    /// How much dearer launches are than older products, in percent of the older mean.
    pub launch_price_delta_percent: Option<f64>,
    pub category_mix: Vec<ValueCount>,
    pub top_colors: Vec<ValueCount>,
    pub category_prices: Vec<CategoryPriceSummary>,
    pub category_discounts: Vec<CategoryDiscount>,
}

/// Dashboard figures for one brand, or `None` when the brand has no products.
pub fn brand_summary(table: &ProductTable, brand: &str, kind: PriceKind) -> Option<BrandSummary> {
    let rows = select_rows(table, Some(brand));
    if rows.is_empty() {
        return None;
    }

    let prices = row_prices(table, kind, &rows);
    let present: Vec<f64> = prices.iter().flatten().copied().collect();
    let discounts: Vec<f64> = row_discounts(table, &rows).into_iter().flatten().collect();

    let flags = launch_flags(table, &rows);
    let (launches, mean_launch_price, mean_older_price) = match &flags {
        Some(flags) => {
            let split = |wanted: bool| -> Vec<f64> {
                flags
                    .iter()
                    .zip(&prices)
                    .filter(|(flag, _)| **flag == wanted)
                    .filter_map(|(_, price)| *price)
                    .collect()
            };
            (
                Some(flags.iter().filter(|&&f| f).count()),
                mean(&split(true)),
                mean(&split(false)),
            )
        }
        None => (None, None, None),
    };
    let launch_share_percent = launches.map(|n| round_to(n as f64 / rows.len() as f64 * 100.0, 1));
    let launch_price_delta_percent = match (mean_launch_price, mean_older_price) {
        (Some(launch), Some(older)) if older != 0.0 => Some(round_to((launch - older) / older * 100.0, 1)),
        _ => None,
    };

    Some(BrandSummary {
        brand: brand.to_string(),
        price_kind: kind,
        total_products: rows.len(),
        price: PriceStats::from_values(&present),
        mean_discount_percent: mean(&discounts),
        categories: distinct_values(table, PRODUCT_CATEGORY, &rows).len(),
        launches,
        launch_share_percent,
        mean_launch_price,
        mean_older_price,
        launch_price_delta_percent,
        category_mix: super::value_counts(table, PRODUCT_CATEGORY, &rows, None),
        top_colors: super::value_counts(table, COLOR_CATEGORY, &rows, Some(BRAND_TOP_COLORS)),
        category_prices: category_price_summary(table, kind, &rows),
        category_discounts: category_discounts(table, &rows),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_close, catalog};
    use super::*;
    use shared::models::Column;

    #[test]
    fn test_discount_percent() {
        assert_close(discount_percent(Some(200.0), Some(150.0)).unwrap(), 25.0);
        assert_close(discount_percent(Some(100.0), Some(120.0)).unwrap(), -20.0);
        assert_eq!(discount_percent(Some(0.0), Some(10.0)), None);
        assert_eq!(discount_percent(None, Some(10.0)), None);
        assert_eq!(discount_percent(Some(10.0), None), None);
    }

    #[test]
    fn test_dataset_overview() {
        let overview = dataset_overview(&catalog());
        assert_eq!(overview.total_products, 6);
        assert_eq!(overview.brands, 2);
        assert_eq!(overview.categories, 3);
        // (100 + 300 + 80 + 200 + 50) / 5
        assert_close(overview.mean_initial_price.unwrap(), 146.0);
    }

    #[test]
    fn test_dataset_overview_empty_table() {
        let overview = dataset_overview(&ProductTable::default());
        assert_eq!(overview.total_products, 0);
        assert_eq!(overview.brands, 0);
        assert_eq!(overview.mean_initial_price, None);
    }

    #[test]
    fn test_brand_summary_acme_initial() {
        let table = catalog();
        let summary = brand_summary(&table, "Acme", PriceKind::Initial).unwrap();

        assert_eq!(summary.total_products, 3);
        let stats = summary.price.unwrap();
        assert_close(stats.min, 100.0);
        assert_close(stats.max, 300.0);
        assert_close(stats.mean, 200.0);
        assert_close(stats.amplitude(), 200.0);
        // Discounts: 20%, 0%, 25%
        assert_close(summary.mean_discount_percent.unwrap(), 15.0);
        assert_eq!(summary.categories, 2);

        // Row 0 is a launch, row 1 is "no", row 3 is missing.
        assert_eq!(summary.launches, Some(1));
        assert_close(summary.mean_launch_price.unwrap(), 100.0);
        assert_close(summary.mean_older_price.unwrap(), 250.0);
        assert_close(summary.launch_share_percent.unwrap(), 33.3);
        // (100 - 250) / 250
        assert_close(summary.launch_price_delta_percent.unwrap(), -60.0);

        assert_eq!(summary.category_mix[0].value, "Tees");
        assert_eq!(summary.category_mix[0].count, 2);
        assert_eq!(summary.top_colors.len(), 3);

        let jeans = &summary.category_prices[0];
        assert_eq!(jeans.category, "Jeans");
        assert_eq!(jeans.stats.count, 1);
        let tees = &summary.category_prices[1];
        assert_close(tees.stats.mean, 150.0);

        assert_eq!(summary.category_discounts[0].category, "Jeans");
        assert_close(summary.category_discounts[0].mean_discount_percent, 0.0);
        assert_close(summary.category_discounts[1].mean_discount_percent, 22.5);
    }

    #[test]
    fn test_brand_summary_final_price_and_missing_initial() {
        let table = catalog();
        let summary = brand_summary(&table, "Zeta", PriceKind::Final).unwrap();
        let stats = summary.price.unwrap();
        assert_close(stats.min, 60.0);
        assert_close(stats.max, 400.0);
        // Dress has no initial price, so only the tee contributes a discount.
        assert_close(summary.mean_discount_percent.unwrap(), 25.0);
        assert_eq!(summary.launches, Some(2));
        assert_close(summary.launch_share_percent.unwrap(), 100.0);
        assert_eq!(summary.mean_older_price, None);
        assert_eq!(summary.launch_price_delta_percent, None);
    }

    #[test]
    fn test_brand_summary_keeps_five_colors() {
        let colors = ["Azul", "Preto", "Branco", "Verde", "Rosa", "Bege", "Cinza"];
        let names: Vec<String> = colors.iter().map(|c| format!("Tee {}", c)).collect();
        let table = ProductTable::from_columns(vec![
            Column::text(BRAND, vec![Some("Acme".to_string()); colors.len()]),
            Column::text(COLOR_CATEGORY, colors.iter().map(|c| Some(c.to_string())).collect()),
            Column::text(shared::models::NAME, names.into_iter().map(Some).collect()),
        ])
        .unwrap();

        let summary = brand_summary(&table, "Acme", PriceKind::Initial).unwrap();
        assert_eq!(summary.top_colors.len(), BRAND_TOP_COLORS);
        assert_eq!(summary.top_colors[4].value, "Rosa");
        assert_eq!(summary.launches, None);
        assert_eq!(summary.launch_share_percent, None);
        assert!(summary.price.is_none());
    }

    #[test]
    fn test_brand_summary_unknown_brand() {
        assert!(brand_summary(&catalog(), "Nobody", PriceKind::Initial).is_none());
    }

    #[test]
    fn test_brand_comparison_outer_joins_categories() {
        let comparison = brand_comparison(&catalog(), "Acme", "Zeta", PriceKind::Final);
        assert_eq!(comparison.first_brand, "Acme");
        let categories: Vec<&str> = comparison.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["Dresses", "Jeans", "Tees"]);

        let dresses = &comparison.categories[0];
        assert!(dresses.first.is_none());
        assert_close(dresses.second.unwrap().mean, 400.0);

        let jeans = &comparison.categories[1];
        assert_close(jeans.first.unwrap().max, 300.0);
        assert!(jeans.second.is_none());

        let tees = &comparison.categories[2];
        let acme = tees.first.unwrap();
        assert_close(acme.min, 80.0);
        assert_close(acme.mean, 115.0);
        assert_close(acme.max, 150.0);
        assert_close(tees.second.unwrap().mean, 60.0);
    }

    #[test]
    fn test_category_brand_prices() {
        let prices = category_brand_prices(&catalog(), PriceKind::Initial);
        let keys: Vec<(&str, &str)> = prices.iter().map(|p| (p.category.as_str(), p.brand.as_str())).collect();
        assert_eq!(keys, vec![("Jeans", "Acme"), ("Tees", "Acme"), ("Tees", "Zeta")]);
        assert_close(prices[1].mean_price, 150.0);
    }
}
