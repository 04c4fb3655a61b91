// Spreadsheet uploads: the first worksheet of an .xlsx workbook becomes a text table
use crate::error::{EngineError, EngineResult};
use calamine::{open_workbook, Data, Reader, Xlsx};
use shared::models::{Column, ProductTable};
use std::path::Path;

pub struct CatalogXlsxReader;

impl CatalogXlsxReader {
    /// Reads the first worksheet. The first row is the header; fully blank rows are skipped.
    /// Every cell is kept as text so price cells reach the normalizer the same way CSV cells do.
    pub fn load_table<P: AsRef<Path>>(path: P) -> EngineResult<ProductTable> {
        let path = path.as_ref();
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let sheet_name = workbook.sheet_names().first().cloned().unwrap_or_default();
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| EngineError::CsvDataFormatError(format!("Workbook '{}' has no worksheets", path.display())))??;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(idx, cell)| Self::cell_text(cell).unwrap_or_else(|| format!("Unnamed: {}", idx)))
                .collect(),
            None => Vec::new(),
        };

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for row in rows {
            let values: Vec<Option<String>> = (0..headers.len()).map(|idx| row.get(idx).and_then(Self::cell_text)).collect();
            if values.iter().all(Option::is_none) {
                continue;
            }
            for (column, value) in cells.iter_mut().zip(values) {
                column.push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::text(name, values))
            .collect();
        let table = ProductTable::from_columns(columns)?;
        tracing::info!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = table.row_count(),
            columns = table.columns().len(),
            "Decoded catalog workbook"
        );
        Ok(table)
    }

    /// Text of one cell, `None` for empty, blank and error cells.
    /// Numbers use their shortest rendering, so `1299.9` stays `"1299.9"` and `5.0` becomes `"5"`.
    pub fn cell_text(cell: &Data) -> Option<String> {
        let text = match cell {
            Data::Empty | Data::Error(_) => return None,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            Data::Float(v) => v.to_string(),
            Data::Int(v) => v.to_string(),
            Data::Bool(v) => v.to_string(),
            Data::DateTime(v) => v.as_f64().to_string(),
        };
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use shared::models::{BRAND, INITIAL_PRICE, IS_LAUNCH};
    use tempfile::{Builder, NamedTempFile};

    fn create_test_workbook() -> NamedTempFile {
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            for (col, header) in [" Brand", "Product_Category", "Initial_Price", "Is_Launch"].iter().enumerate() {
                sheet.write_string(0, col as u16, *header).unwrap();
            }
            sheet.write_string(1, 0, "Acme").unwrap();
            sheet.write_string(1, 1, "Camisetas").unwrap();
            sheet.write_number(1, 2, 1299.9).unwrap();
            sheet.write_boolean(1, 3, true).unwrap();
            // Row 2 is left blank.
            sheet.write_string(3, 0, "Zeta").unwrap();
            sheet.write_string(3, 1, "   ").unwrap();
            sheet.write_string(3, 2, "R$ 5,00").unwrap();
            sheet.write_number(3, 3, 0.0).unwrap();
        }
        workbook.save(file.path()).unwrap();
        file
    }

    #[test]
    fn test_load_first_sheet_as_text() {
        let file = create_test_workbook();
        let table = CatalogXlsxReader::load_table(file.path()).unwrap();

        assert_eq!(table.column_names(), vec![" Brand", "Product_Category", "Initial_Price", "Is_Launch"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.text_values(INITIAL_PRICE).unwrap(), &[Some("1299.9".to_string()), Some("R$ 5,00".to_string())]);
        assert_eq!(table.cell_text(" Brand", 1).as_deref(), Some("Zeta"));
        assert_eq!(table.cell_text("Product_Category", 1), None);
        assert_eq!(table.cell_text(IS_LAUNCH, 0).as_deref(), Some("true"));
        assert_eq!(table.cell_text(IS_LAUNCH, 1).as_deref(), Some("0"));
        assert!(table.cell_text(BRAND, 0).is_none());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(CatalogXlsxReader::cell_text(&Data::Float(5.0)).as_deref(), Some("5"));
        assert_eq!(CatalogXlsxReader::cell_text(&Data::Float(349.9)).as_deref(), Some("349.9"));
        assert_eq!(CatalogXlsxReader::cell_text(&Data::Int(12)).as_deref(), Some("12"));
        assert_eq!(CatalogXlsxReader::cell_text(&Data::String("  ".to_string())), None);
        assert_eq!(CatalogXlsxReader::cell_text(&Data::Empty), None);
    }

    #[test]
    fn test_missing_workbook() {
        let result = CatalogXlsxReader::load_table("non_existent_file.xlsx");
        assert!(matches!(result, Err(EngineError::SpreadsheetError { .. })));
    }
}
