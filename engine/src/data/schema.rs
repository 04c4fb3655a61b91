// Post-normalization checks the upload flow runs before accepting a catalog
use crate::error::{EngineError, EngineResult};
use shared::models::ProductTable;

/// Ensures every column in `required` is present in `table`.
pub fn validate_schema<S: AsRef<str>>(table: &ProductTable, required: &[S]) -> EngineResult<()> {
    let missing: Vec<String> = required
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !table.has_column(name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let found = table.column_names().into_iter().map(str::to_string).collect();
    Err(EngineError::MissingColumns { missing, found })
}
