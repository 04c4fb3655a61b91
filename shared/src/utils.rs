// Money text handling for catalog exports. Scraped spreadsheets mix the
// Brazilian convention ("1.234,56") with plain decimals ("1234.56"), so the
// separator rule is decided per cell.
pub mod brazilian_format {
    use anyhow::{anyhow, Result};
    use std::str::FromStr;

    /// Removes every `R$` / `r$` marker and the whitespace around the amount.
    pub fn strip_currency(s: &str) -> String {
        s.replace("R$", "").replace("r$", "").trim().to_string()
    }

    /// Rewrites a money string so `f64::from_str` can read it.
    ///
    /// Both `,` and `.` present: Brazilian, dots are thousands separators.
    /// Only `,` present: the comma is the decimal separator.
    /// Otherwise the text is returned untouched.
    pub fn normalize_separators(s: &str) -> String {
        match (s.contains(','), s.contains('.')) {
            (true, true) => s.replace('.', "").replace(',', "."),
            (true, false) => s.replace(',', "."),
            _ => s.to_string(),
        }
    }

    // Parses "R$ 1.234,56", "1234,56" or "1234.56" into f64
    pub fn parse_money(s: &str) -> Result<f64> {
        let normalized = normalize_separators(&strip_currency(s));

        let value = f64::from_str(&normalized)
            .map_err(|e| anyhow!("Failed to parse price '{}': {}", s, e))?;
        if value.is_nan() {
            return Err(anyhow!("Failed to parse price '{}': not a number", s));
        }
        Ok(value)
    }

    /// Formats a value as Brazilian reais, e.g. `R$ 1.234,56`.
    pub fn format_reais(value: f64) -> String {
        if !value.is_finite() {
            return format!("R$ {}", value);
        }
        let formatted = format!("{:.2}", value.abs());
        let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
        format!("R$ {}{},{}", sign, grouped, frac_part)
    }

}
