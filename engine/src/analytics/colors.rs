// Color tab: ranking, category x color matrix, share distribution and headline figures
use super::{mean, round_to, value_counts, ValueCount};
use serde::Serialize;
use shared::models::{ProductTable, COLOR_CATEGORY, NAME, PRODUCT_CATEGORY};
use std::collections::{BTreeMap, BTreeSet, HashMap};

const RANKED_COLORS: usize = 10;
const MATRIX_CATEGORIES: usize = 5;
const MATRIX_COLORS: usize = 10;
const DISTRIBUTION_COLORS: usize = 15;

/// Label of the slice that groups every color past the distribution cut.
pub const OTHER_COLORS: &str = "Outras";

/// Product counts of the most frequent categories against the most frequent colors.
/// Both axes are ordered by frequency; `counts[i][j]` pairs `categories[i]` with `colors[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryColorMatrix {
    pub categories: Vec<String>,
    pub colors: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorShare {
    pub color: String,
    pub count: usize,
    /// Share of all colored products, rounded to one decimal.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAnalysis {
    pub ranking: Vec<ValueCount>,
    pub matrix: CategoryColorMatrix,
    pub distribution: Vec<ColorShare>,
    pub distinct_colors: usize,
    /// Mean number of distinct colors per product `Name`. `None` without a `Name` column.
    pub mean_colors_per_product: Option<f64>,
    /// Most frequent color; ties go to the alphabetically first.
    pub most_common: Option<String>,
}

pub fn category_color_matrix(table: &ProductTable, rows: &[usize]) -> CategoryColorMatrix {
    let categories: Vec<String> = value_counts(table, PRODUCT_CATEGORY, rows, Some(MATRIX_CATEGORIES))
        .into_iter()
        .map(|vc| vc.value)
        .collect();
    let colors: Vec<String> = value_counts(table, COLOR_CATEGORY, rows, Some(MATRIX_COLORS))
        .into_iter()
        .map(|vc| vc.value)
        .collect();

    let mut pairs: HashMap<(String, String), usize> = HashMap::new();
    for &row in rows {
        if let (Some(category), Some(color)) = (table.cell_text(PRODUCT_CATEGORY, row), table.cell_text(COLOR_CATEGORY, row)) {
            *pairs.entry((category, color)).or_insert(0) += 1;
        }
    }

    let counts = categories
        .iter()
        .map(|category| {
            colors
                .iter()
                .map(|color| pairs.get(&(category.clone(), color.clone())).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    CategoryColorMatrix { categories, colors, counts }
}

/// Share of each of the top 15 colors, with the remainder folded into [`OTHER_COLORS`].
pub fn color_distribution(table: &ProductTable, rows: &[usize]) -> Vec<ColorShare> {
    let counts = value_counts(table, COLOR_CATEGORY, rows, None);
    let total: usize = counts.iter().map(|vc| vc.count).sum();
    if total == 0 {
        return Vec::new();
    }
    let share = |color: String, count: usize| ColorShare {
        color,
        count,
        percent: round_to(count as f64 / total as f64 * 100.0, 1),
    };

    let others: usize = counts.iter().skip(DISTRIBUTION_COLORS).map(|vc| vc.count).sum();
    let mut distribution: Vec<ColorShare> = counts
        .into_iter()
        .take(DISTRIBUTION_COLORS)
        .map(|vc| share(vc.value, vc.count))
        .collect();
    if others > 0 {
        distribution.push(share(OTHER_COLORS.to_string(), others));
    }
    distribution
}

/// Mean count of distinct colors per product name. Named products without a color count as zero.
pub fn mean_colors_per_product(table: &ProductTable, rows: &[usize]) -> Option<f64> {
    if !table.has_column(NAME) {
        return None;
    }
    let mut products: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for &row in rows {
        let Some(name) = table.cell_text(NAME, row) else {
            continue;
        };
        let colors = products.entry(name).or_default();
        if let Some(color) = table.cell_text(COLOR_CATEGORY, row) {
            colors.insert(color);
        }
    }
    let per_product: Vec<f64> = products.values().map(|colors| colors.len() as f64).collect();
    mean(&per_product)
}

fn most_common_color(counts: &[ValueCount]) -> Option<String> {
    let top = counts.first()?.count;
    counts
        .iter()
        .take_while(|vc| vc.count == top)
        .map(|vc| vc.value.as_str())
        .min()
        .map(str::to_string)
}

/// Everything the color tab shows for the selected rows.
pub fn color_analysis(table: &ProductTable, rows: &[usize]) -> ColorAnalysis {
    let counts = value_counts(table, COLOR_CATEGORY, rows, None);
    ColorAnalysis {
        ranking: counts.iter().take(RANKED_COLORS).cloned().collect(),
        matrix: category_color_matrix(table, rows),
        distribution: color_distribution(table, rows),
        distinct_colors: counts.len(),
        mean_colors_per_product: mean_colors_per_product(table, rows),
        most_common: most_common_color(&counts),
    }
}

#[cfg(test)]
mod tests {
    use super::super::select_rows;
    use super::super::test_support::{assert_close, catalog, text};
    use super::*;
    use shared::models::{Column, BRAND};

    fn palette_table(colors: &[String]) -> ProductTable {
        ProductTable::from_columns(vec![
            Column::text(BRAND, vec![Some("Acme".to_string()); colors.len()]),
            Column::text(COLOR_CATEGORY, colors.iter().cloned().map(Some).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_color_analysis_whole_catalog() {
        let table = catalog();
        let analysis = color_analysis(&table, &select_rows(&table, None));

        assert_eq!(analysis.ranking[0], ValueCount { value: "Azul".to_string(), count: 3 });
        assert_eq!(analysis.distinct_colors, 3);
        assert_eq!(analysis.most_common.as_deref(), Some("Azul"));
        // Tee A comes in Azul and Branco, the other four names in one color each.
        assert_close(analysis.mean_colors_per_product.unwrap(), 1.2);

        let shares: Vec<(&str, usize)> = analysis.distribution.iter().map(|s| (s.color.as_str(), s.count)).collect();
        assert_eq!(shares, vec![("Azul", 3), ("Preto", 2), ("Branco", 1)]);
        assert_close(analysis.distribution[0].percent, 50.0);
        assert_close(analysis.distribution[1].percent, 33.3);
        assert_close(analysis.distribution[2].percent, 16.7);
    }

    #[test]
    fn test_category_color_matrix() {
        let table = catalog();
        let matrix = category_color_matrix(&table, &select_rows(&table, None));
        assert_eq!(matrix.categories, vec!["Tees", "Jeans", "Dresses"]);
        assert_eq!(matrix.colors, vec!["Azul", "Preto", "Branco"]);
        assert_eq!(matrix.counts, vec![vec![3, 0, 1], vec![0, 1, 0], vec![0, 1, 0]]);
    }

    #[test]
    fn test_category_color_matrix_keeps_top_five_categories() {
        let categories = ["A", "A", "B", "C", "D", "E", "F"];
        let table = ProductTable::from_columns(vec![
            Column::text(PRODUCT_CATEGORY, text(&categories)),
            Column::text(COLOR_CATEGORY, text(&["Azul"; 7])),
        ])
        .unwrap();
        let matrix = category_color_matrix(&table, &select_rows(&table, None));
        assert_eq!(matrix.categories, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(matrix.counts[0], vec![2]);
    }

    #[test]
    fn test_distribution_groups_tail_as_others() {
        let colors: Vec<String> = (0..17).map(|i| format!("Cor {:02}", i)).collect();
        let table = palette_table(&colors);
        let distribution = color_distribution(&table, &select_rows(&table, None));

        assert_eq!(distribution.len(), DISTRIBUTION_COLORS + 1);
        let others = distribution.last().unwrap();
        assert_eq!(others.color, OTHER_COLORS);
        assert_eq!(others.count, 2);
        assert_close(others.percent, 11.8);
        assert_eq!(distribution.iter().map(|s| s.count).sum::<usize>(), 17);
    }

    #[test]
    fn test_most_common_tie_goes_to_first_alphabetically() {
        let table = palette_table(&["Verde".to_string(), "Azul".to_string(), "Rosa".to_string()]);
        let analysis = color_analysis(&table, &select_rows(&table, None));
        assert_eq!(analysis.ranking[0].value, "Verde");
        assert_eq!(analysis.most_common.as_deref(), Some("Azul"));
        // No Name column to group by.
        assert_eq!(analysis.mean_colors_per_product, None);
    }

    #[test]
    fn test_color_analysis_empty_selection() {
        let table = catalog();
        let analysis = color_analysis(&table, &[]);
        assert!(analysis.ranking.is_empty());
        assert!(analysis.distribution.is_empty());
        assert!(analysis.matrix.categories.is_empty());
        assert_eq!(analysis.distinct_colors, 0);
        assert_eq!(analysis.mean_colors_per_product, None);
        assert_eq!(analysis.most_common, None);
    }
}
