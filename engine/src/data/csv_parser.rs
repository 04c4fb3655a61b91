use crate::config::settings::EngineSettings;
use crate::data::xlsx_reader::CatalogXlsxReader;
use crate::error::{EngineError, EngineResult};
use csv::ReaderBuilder;
use shared::models::{Column, ProductTable};
use std::io::Read;
use std::path::Path;

const UTF8_BOM: &str = "\u{feff}";

pub struct CatalogCsvParser;

impl CatalogCsvParser {
    /// Decodes an uploaded catalog, dispatching on the file extension.
    pub fn load_table<P: AsRef<Path>>(path: P, settings: &EngineSettings) -> EngineResult<ProductTable> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Self::load_table_from_csv(path, settings),
            "xlsx" => CatalogXlsxReader::load_table(path),
            other => Err(EngineError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                format!(".{}", other)
            })),
        }
    }

    // Header: Brand;Product_Category;Initial_Price;Final_Price;...
    // Example Row: Acme;Camisetas;R$ 1.299,90;999,90;...
    pub fn load_table_from_csv<P: AsRef<Path>>(path: P, settings: &EngineSettings) -> EngineResult<ProductTable> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            EngineError::CsvDataFormatError(format!("File '{}' is not valid UTF-8: {}", path.display(), e))
        })?;
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

        let delimiter = settings
            .delimiter_byte()
            .unwrap_or_else(|| Self::detect_delimiter(content.lines().next().unwrap_or_default()));

        let table = Self::load_table_from_reader(content.as_bytes(), delimiter)?;
        tracing::info!(
            path = %path.display(),
            delimiter = %(delimiter as char),
            rows = table.row_count(),
            columns = table.columns().len(),
            "Decoded catalog file"
        );
        Ok(table)
    }

    /// Reads delimited text into text columns. The first record is the header.
    /// Short rows are padded with missing cells, extra cells are dropped.
    /// Cells that are blank after trimming are missing.
    pub fn load_table_from_reader<R: Read>(reader: R, delimiter: u8) -> EngineResult<ProductTable> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for result in rdr.records() {
            let record = result?;
            for (idx, column) in cells.iter_mut().enumerate() {
                let value = record.get(idx).filter(|v| !v.trim().is_empty()).map(str::to_string);
                column.push(value);
            }
        }

        let columns = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| Column::text(name, values))
            .collect();
        Ok(ProductTable::from_columns(columns)?)
    }

    /// Semicolon when the header line has more semicolons than commas, comma otherwise.
    pub fn detect_delimiter(header_line: &str) -> u8 {
        let semicolons = header_line.matches(';').count();
        let commas = header_line.matches(',').count();
        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }
}
