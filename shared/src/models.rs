use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Column names as they appear in the scraped catalog exports.
pub const BRAND: &str = "Brand";
pub const PRODUCT_CATEGORY: &str = "Product_Category";
pub const INITIAL_PRICE: &str = "Initial_Price";
pub const FINAL_PRICE: &str = "Final_Price";
pub const COLOR_CATEGORY: &str = "Cor_Categorizada";
pub const IS_LAUNCH: &str = "Is_Launch";
pub const NAME: &str = "Name";

/// Columns a catalog must carry after normalization to be accepted into a session.
pub const REQUIRED_COLUMNS: [&str; 4] = [BRAND, PRODUCT_CATEGORY, INITIAL_PRICE, FINAL_PRICE];

/// Which of the two price columns an aggregate reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    #[default]
    Initial,
    Final,
}

impl PriceKind {
    pub fn column_name(&self) -> &'static str {
        match self {
            PriceKind::Initial => INITIAL_PRICE,
            PriceKind::Final => FINAL_PRICE,
        }
    }
}

impl FromStr for PriceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initial" | "initial_price" => Ok(PriceKind::Initial),
            "final" | "final_price" => Ok(PriceKind::Final),
            other => Err(format!("Unknown price kind '{}'. Use 'initial' or 'final'.", other)),
        }
    }
}

impl fmt::Display for PriceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Cell storage for one column. `None` is the missing marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(values) => values.len(),
            ColumnData::Number(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text rendering of a cell, numbers included. Missing cells stay `None`.
    pub fn cell_text(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Text(values) => values.get(row).cloned().flatten(),
            ColumnData::Number(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn text<S: Into<String>>(name: S, values: Vec<Option<String>>) -> Self {
        Column { name: name.into(), data: ColumnData::Text(values) }
    }

    pub fn number<S: Into<String>>(name: S, values: Vec<Option<f64>>) -> Self {
        Column { name: name.into(), data: ColumnData::Number(values) }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A catalog of scraped product listings, stored column by column.
///
/// All columns share the same row count. Row order carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductTable {
    columns: Vec<Column>,
}

impl ProductTable {
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(anyhow!(
                    "Column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    expected
                ));
            }
        }
        Ok(ProductTable { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Every column called `name`. Exports can repeat a header, and after
    /// trimming `" Brand"` and `"Brand"` share one name.
    pub fn columns_named_mut<'a>(&'a mut self, name: &'a str) -> impl Iterator<Item = &'a mut Column> + 'a {
        self.columns.iter_mut().filter(move |c| c.name == name)
    }

    /// Text cells of `name`, or `None` if the column is absent or numeric.
    pub fn text_values(&self, name: &str) -> Option<&[Option<String>]> {
        match &self.column(name)?.data {
            ColumnData::Text(values) => Some(values),
            ColumnData::Number(_) => None,
        }
    }

    /// Numeric cells of `name`, or `None` if the column is absent or still text.
    pub fn number_values(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Number(values) => Some(values),
            ColumnData::Text(_) => None,
        }
    }

    /// Text rendering of one cell regardless of the column's storage.
    pub fn cell_text(&self, name: &str, row: usize) -> Option<String> {
        self.column(name).and_then(|c| c.data.cell_text(row))
    }

    pub fn trim_column_names(&mut self) {
        for column in &mut self.columns {
            let trimmed = column.name.trim();
            if trimmed.len() != column.name.len() {
                column.name = trimmed.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_columns_named_mut_visits_duplicates() {
        let mut table = ProductTable::from_columns(vec![
            Column::text(BRAND, text(&["A"])),
            Column::text(NAME, text(&["Tee"])),
            Column::text(BRAND, text(&["B"])),
        ])
        .unwrap();
        assert_eq!(table.columns_named_mut(BRAND).count(), 2);
        for column in table.columns_named_mut(BRAND) {
            column.data = ColumnData::Text(text(&["C"]));
        }
        assert_eq!(table.columns()[2].data, ColumnData::Text(text(&["C"])));
        assert_eq!(table.columns_named_mut("Material").count(), 0);
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = ProductTable::from_columns(vec![
            Column::text(BRAND, text(&["A", "B"])),
            Column::number(INITIAL_PRICE, vec![Some(1.0)]),
        ]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Initial_Price"));
    }

    #[test]
    fn test_trim_column_names() {
        let mut table = ProductTable::from_columns(vec![
            Column::text("  Brand ", text(&["A"])),
            Column::text("Name", text(&["Tee"])),
        ])
        .unwrap();
        table.trim_column_names();
        assert_eq!(table.column_names(), vec!["Brand", "Name"]);
    }

    #[test]
    fn test_cell_text_renders_numbers() {
        let table = ProductTable::from_columns(vec![Column::number(FINAL_PRICE, vec![Some(1200.5), None])]).unwrap();
        assert_eq!(table.cell_text(FINAL_PRICE, 0).as_deref(), Some("1200.5"));
        assert_eq!(table.cell_text(FINAL_PRICE, 1), None);
        assert_eq!(table.cell_text(BRAND, 0), None);
    }

    #[test]
    fn test_price_kind_from_str() {
        assert_eq!("final".parse::<PriceKind>().unwrap(), PriceKind::Final);
        assert_eq!(" Initial_Price ".parse::<PriceKind>().unwrap(), PriceKind::Initial);
        assert!("median".parse::<PriceKind>().is_err());
        assert_eq!(PriceKind::Final.to_string(), "Final_Price");
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        let table = ProductTable::default();
        assert_eq!(table.row_count(), 0);
        assert!(table.column_names().is_empty());
    }
}
