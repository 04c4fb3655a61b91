// Repairs the price columns of an uploaded catalog.
//
// Exports arrive with currency markers, either decimal convention and, in
// some files, prices that lost three orders of magnitude ("5" for 5.000,00).
// Cells are parsed one by one; the scale repair then runs once per column.
use crate::config::settings::EngineSettings;
use shared::models::{Column, ColumnData, ProductTable, FINAL_PRICE, INITIAL_PRICE};
use shared::utils::brazilian_format;

/// Price columns the normalizer knows about. Other columns pass through untouched.
pub const PRICE_COLUMNS: [&str; 2] = [INITIAL_PRICE, FINAL_PRICE];

const SMALL_PRICE_LIMIT: f64 = 10.0;
const LARGE_PRICE_LIMIT: f64 = 100.0;
const LOST_SCALE_FACTOR: f64 = 1000.0;

/// Policy applied to a fully parsed price column.
pub trait MagnitudeCorrection: Send + Sync {
    fn name(&self) -> &str;
    fn correct(&self, values: &[Option<f64>]) -> Vec<Option<f64>>;
}

/// Default policy, see [`correct_magnitude`].
pub struct ThousandsScaleCorrection;

impl MagnitudeCorrection for ThousandsScaleCorrection {
    fn name(&self) -> &str {
        "thousands-scale"
    }

    fn correct(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        correct_magnitude(values)
    }
}

/// Leaves parsed prices as they are.
pub struct NoCorrection;

impl MagnitudeCorrection for NoCorrection {
    fn name(&self) -> &str {
        "none"
    }

    fn correct(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        values.to_vec()
    }
}

/// Best-effort repair for prices that appear to have lost a factor of 1000.
///
/// Only parsed values are inspected; missing cells stay missing.
/// * some values `< 10` alongside some `> 100`: every value `< 10` is scaled;
/// * every value `< 10`: the whole column is scaled;
/// * otherwise the column is returned unchanged.
///
/// A genuinely cheap product in a column of expensive ones is scaled too.
/// That false positive is accepted.
pub fn correct_magnitude(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut parsed = values.iter().flatten().copied().peekable();
    if parsed.peek().is_none() {
        return values.to_vec();
    }

    let has_small = values.iter().flatten().any(|v| *v < SMALL_PRICE_LIMIT);
    let has_large = values.iter().flatten().any(|v| *v > LARGE_PRICE_LIMIT);

    if has_small && has_large {
        values
            .iter()
            .map(|cell| cell.map(|v| if v < SMALL_PRICE_LIMIT { v * LOST_SCALE_FACTOR } else { v }))
            .collect()
    } else if parsed.all(|v| v < SMALL_PRICE_LIMIT) {
        values.iter().map(|cell| cell.map(|v| v * LOST_SCALE_FACTOR)).collect()
    } else {
        values.to_vec()
    }
}

/// Parses every cell of a price column. Returns the values and how many
/// non-empty cells could not be read.
pub fn parse_price_cells(data: &ColumnData) -> (Vec<Option<f64>>, usize) {
    let mut unparseable = 0;
    let values = (0..data.len())
        .map(|row| {
            let text = data.cell_text(row)?;
            match brazilian_format::parse_money(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    if !text.trim().is_empty() {
                        unparseable += 1;
                    }
                    tracing::trace!(row, error = %e, "Price cell degraded to missing");
                    None
                }
            }
        })
        .collect();
    (values, unparseable)
}

pub struct PriceNormalizer {
    correction: Box<dyn MagnitudeCorrection>,
}

impl PriceNormalizer {
    pub fn new(correction: Box<dyn MagnitudeCorrection>) -> Self {
        Self { correction }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        if settings.apply_magnitude_correction {
            Self::new(Box::new(ThousandsScaleCorrection))
        } else {
            Self::new(Box::new(NoCorrection))
        }
    }

    /// Returns a copy of `table` with trimmed column names and numeric price
    /// columns. Never fails: unreadable cells become missing.
    pub fn normalize(&self, table: &ProductTable) -> ProductTable {
        let mut normalized = table.clone();
        normalized.trim_column_names();

        for name in PRICE_COLUMNS {
            let mut matched = 0;
            for column in normalized.columns_named_mut(name) {
                matched += 1;
                self.normalize_column(column);
            }
            match matched {
                0 => tracing::debug!(column = name, "Price column absent, skipping"),
                1 => {}
                copies => tracing::warn!(column = name, copies, "Duplicate price columns after trimming, normalizing each"),
            }
        }
        normalized
    }

    fn normalize_column(&self, column: &mut Column) {
        let name = column.name.as_str();
        let (parsed, unparseable) = parse_price_cells(&column.data);
        let corrected = self.correction.correct(&parsed);
        let rescaled = parsed.iter().zip(&corrected).filter(|(before, after)| before != after).count();

        if unparseable > 0 {
            tracing::warn!(column = name, cells = unparseable, "Unparseable price cells set to missing");
        }
        if rescaled > 0 {
            tracing::debug!(
                column = name,
                policy = self.correction.name(),
                cells = rescaled,
                "Applied magnitude correction"
            );
        }

        column.data = ColumnData::Number(corrected);
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new(Box::new(ThousandsScaleCorrection))
    }
}

/// Normalizes price columns with the default magnitude policy.
pub fn normalize_prices(table: &ProductTable) -> ProductTable {
    PriceNormalizer::default().normalize(table)
}
