// Descriptive aggregates over a normalized catalog
pub mod colors;
pub mod launch;
pub mod price_band;
pub mod summary;

use serde::Serialize;
use shared::models::{PriceKind, ProductTable, BRAND};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub count: usize,
}

impl PriceStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(PriceStats { min, mean: mean(values)?, max, count: values.len() })
    }

    pub fn amplitude(&self) -> f64 {
        self.max - self.min
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// All row indices of `table`, or only those whose `Brand` equals `brand`.
pub fn select_rows(table: &ProductTable, brand: Option<&str>) -> Vec<usize> {
    match brand {
        None => (0..table.row_count()).collect(),
        Some(brand) => (0..table.row_count())
            .filter(|&row| table.cell_text(BRAND, row).as_deref() == Some(brand))
            .collect(),
    }
}

/// Price of each selected row, `None` where missing or the column is not numeric.
pub fn row_prices(table: &ProductTable, kind: PriceKind, rows: &[usize]) -> Vec<Option<f64>> {
    let values = table.number_values(kind.column_name());
    rows.iter()
        .map(|&row| values.and_then(|v| v.get(row).copied().flatten()))
        .collect()
}

/// Present prices of the selected rows.
pub fn present_prices(table: &ProductTable, kind: PriceKind, rows: &[usize]) -> Vec<f64> {
    row_prices(table, kind, rows).into_iter().flatten().collect()
}

/// Frequency of each distinct non-missing value, most frequent first.
/// Ties keep the order in which values first appear.
pub fn value_counts(table: &ProductTable, column: &str, rows: &[usize], limit: Option<usize>) -> Vec<ValueCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for &row in rows {
        if let Some(value) = table.cell_text(column, row) {
            let count = counts.entry(value.clone()).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }
    }

    let mut result: Vec<ValueCount> = order
        .into_iter()
        .map(|value| {
            let count = counts[&value];
            ValueCount { value, count }
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        result.truncate(limit);
    }
    result
}

/// Sorted distinct non-missing values of a column.
pub fn distinct_values(table: &ProductTable, column: &str, rows: &[usize]) -> Vec<String> {
    rows.iter()
        .filter_map(|&row| table.cell_text(column, row))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted brand names present in the catalog.
pub fn brands(table: &ProductTable) -> Vec<String> {
    distinct_values(table, BRAND, &select_rows(table, None))
}

#[cfg(test)]
pub(crate) mod test_support {
    use shared::models::{Column, ProductTable};

    pub fn text(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    pub fn catalog() -> ProductTable {
        ProductTable::from_columns(vec![
            Column::text("Brand", text(&["Acme", "Acme", "Zeta", "Acme", "Zeta", ""])),
            Column::text("Product_Category", text(&["Tees", "Jeans", "Tees", "Tees", "Dresses", "Tees"])),
            Column::number("Initial_Price", vec![Some(100.0), Some(300.0), Some(80.0), Some(200.0), None, Some(50.0)]),
            Column::number("Final_Price", vec![Some(80.0), Some(300.0), Some(60.0), Some(150.0), Some(400.0), Some(50.0)]),
            Column::text("Cor_Categorizada", text(&["Azul", "Preto", "Azul", "Branco", "Preto", "Azul"])),
            Column::text("Is_Launch", text(&["Sim", "no", "1", "", "TRUE", "0"])),
            Column::text("Name", text(&["Tee A", "Jeans B", "Tee C", "Tee A", "Dress D", "Tee E"])),
        ])
        .unwrap()
    }

    pub fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }
}
