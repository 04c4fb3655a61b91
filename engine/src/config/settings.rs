// Engine settings, loaded from a JSON file or falling back to defaults
use crate::error::{EngineError, EngineResult};
use serde::Deserialize;
use shared::models::{PriceKind, REQUIRED_COLUMNS};
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Field delimiter for uploaded files. `None` sniffs it from the header line.
    pub delimiter: Option<char>,
    pub required_columns: Vec<String>,
    pub apply_magnitude_correction: bool,
    /// How many entries ranking views (colors, categories) keep.
    pub top_n: usize,
    pub default_price: PriceKind,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            delimiter: None,
            required_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            apply_magnitude_correction: true,
            top_n: 10,
            default_price: PriceKind::Initial,
        }
    }
}

impl EngineSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let settings: EngineSettings = serde_json::from_str(&raw)?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err(EngineError::ConfigError(format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    delimiter
                )));
            }
        }
        if self.top_n == 0 {
            return Err(EngineError::ConfigError("top_n must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter.filter(char::is_ascii).map(|c| c as u8)
    }
}
