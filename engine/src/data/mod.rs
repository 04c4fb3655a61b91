pub mod csv_parser;
pub mod price_normalizer;
pub mod schema;
pub mod session;
pub mod xlsx_reader;
