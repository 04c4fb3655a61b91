// Launch-cycle mix: new arrivals versus older products
use super::round_to;
use serde::Serialize;
use shared::models::{ProductTable, IS_LAUNCH, PRODUCT_CATEGORY};

/// Reads the heterogeneous `Is_Launch` cell. Unknown or missing values count as not launched.
pub fn parse_launch_flag(text: Option<&str>) -> bool {
    let Some(text) = text else {
        return false;
    };
    match text.trim().to_lowercase().as_str() {
        "true" | "sim" | "yes" | "1" | "1.0" => true,
        "false" | "não" | "nao" | "no" | "0" | "0.0" => false,
        _ => false,
    }
}

/// Launch flag of each selected row, or `None` when the catalog has no `Is_Launch` column.
pub fn launch_flags(table: &ProductTable, rows: &[usize]) -> Option<Vec<bool>> {
    let column = table.column(IS_LAUNCH)?;
    Some(
        rows.iter()
            .map(|&row| parse_launch_flag(column.data.cell_text(row).as_deref()))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLaunchShare {
    pub category: String,
    pub launches: usize,
    pub total: usize,
    pub launch_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchMix {
    pub launches: usize,
    pub older: usize,
    pub by_category: Vec<CategoryLaunchShare>,
}

impl LaunchMix {
    pub fn launch_percent(&self) -> Option<f64> {
        let total = self.launches + self.older;
        (total > 0).then(|| round_to(self.launches as f64 / total as f64 * 100.0, 1))
    }
}

/// Launch counts for the selected rows, overall and per category (categories sorted by name).
pub fn launch_mix(table: &ProductTable, rows: &[usize]) -> Option<LaunchMix> {
    let flags = launch_flags(table, rows)?;
    let launches = flags.iter().filter(|&&f| f).count();

    let mut by_category: Vec<CategoryLaunchShare> = Vec::new();
    for (&row, &flag) in rows.iter().zip(&flags) {
        let Some(category) = table.cell_text(PRODUCT_CATEGORY, row) else {
            continue;
        };
        let idx = match by_category.binary_search_by(|s| s.category.as_str().cmp(&category)) {
            Ok(idx) => idx,
            Err(idx) => {
                by_category.insert(idx, CategoryLaunchShare { category, launches: 0, total: 0, launch_percent: 0.0 });
                idx
            }
        };
        let share = &mut by_category[idx];
        share.total += 1;
        if flag {
            share.launches += 1;
        }
    }
    for share in &mut by_category {
        share.launch_percent = round_to(share.launches as f64 / share.total as f64 * 100.0, 1);
    }

    Some(LaunchMix { launches, older: flags.len() - launches, by_category })
}
