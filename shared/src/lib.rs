pub mod models;
pub mod utils;

// Data model and Brazilian number formatting shared by the engine and any
// presentation layer that renders the catalog.
