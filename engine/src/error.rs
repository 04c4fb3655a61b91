use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration file error: {source}")]
    ConfigFormatError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Spreadsheet error: {source}")]
    SpreadsheetError {
        #[from]
        source: calamine::XlsxError,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Unsupported file format '{0}'. Upload a .csv or .xlsx file")]
    UnsupportedFormat(String),

    #[error("Catalog is missing required columns: {}. Columns found: {}", missing.join(", "), found.join(", "))]
    MissingColumns { missing: Vec<String>, found: Vec<String> },

    #[error("No catalog loaded in this session")]
    NoCatalogLoaded,

    #[error("Brand '{0}' not found in the loaded catalog")]
    BrandNotFound(String),

    // Background decode task failed to complete.
    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
