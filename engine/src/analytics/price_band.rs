// 50-wide price bands used by the brand positioning view
use serde::Serialize;
use shared::models::{PriceKind, ProductTable, BRAND, PRODUCT_CATEGORY};
use std::collections::BTreeMap;
use std::fmt;

const BAND_WIDTH: u32 = 50;
const TOP_BAND_START: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PriceBand {
    /// `[lower, lower + 50)`
    Range { lower: u32 },
    /// `>= 1000`
    ThousandPlus,
}

impl PriceBand {
    /// Every band in display order, `0-50` through `1000+`.
    pub fn all() -> Vec<PriceBand> {
        (0..TOP_BAND_START)
            .step_by(BAND_WIDTH as usize)
            .map(|lower| PriceBand::Range { lower })
            .chain(std::iter::once(PriceBand::ThousandPlus))
            .collect()
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceBand::Range { lower } => write!(f, "{}-{}", lower, lower + BAND_WIDTH),
            PriceBand::ThousandPlus => write!(f, "{}+", TOP_BAND_START),
        }
    }
}

/// Band for a price. Negative and NaN prices have none.
pub fn price_band(price: f64) -> Option<PriceBand> {
    if price.is_nan() || price < 0.0 {
        return None;
    }
    if price >= TOP_BAND_START as f64 {
        return Some(PriceBand::ThousandPlus);
    }
    let lower = (price / BAND_WIDTH as f64).floor() as u32 * BAND_WIDTH;
    Some(PriceBand::Range { lower })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    pub band: PriceBand,
    pub category: String,
    pub brand: String,
    pub count: usize,
}

/// Product counts per (band, category, brand) for the selected rows, in band order.
/// Rows missing a price, category or brand are left out.
pub fn band_distribution(table: &ProductTable, kind: PriceKind, rows: &[usize]) -> Vec<BandCount> {
    let prices = super::row_prices(table, kind, rows);
    let mut groups: BTreeMap<(PriceBand, String, String), usize> = BTreeMap::new();

    for (&row, price) in rows.iter().zip(prices) {
        let Some(band) = price.and_then(price_band) else {
            continue;
        };
        let (Some(category), Some(brand)) = (table.cell_text(PRODUCT_CATEGORY, row), table.cell_text(BRAND, row)) else {
            continue;
        };
        *groups.entry((band, category, brand)).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|((band, category, brand), count)| BandCount { band, category, brand, count })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandTotal {
    pub band: PriceBand,
    pub count: usize,
}

/// Product totals for every band on the positioning axis, empty bands included.
pub fn band_totals(counts: &[BandCount]) -> Vec<BandTotal> {
    PriceBand::all()
        .into_iter()
        .map(|band| BandTotal {
            band,
            count: counts.iter().filter(|c| c.band == band).map(|c| c.count).sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::select_rows;
    use super::super::test_support::catalog;
    use super::*;

    #[test]
    fn test_price_band_boundaries() {
        assert_eq!(price_band(0.0), Some(PriceBand::Range { lower: 0 }));
        assert_eq!(price_band(49.99), Some(PriceBand::Range { lower: 0 }));
        assert_eq!(price_band(50.0), Some(PriceBand::Range { lower: 50 }));
        assert_eq!(price_band(999.99), Some(PriceBand::Range { lower: 950 }));
        assert_eq!(price_band(1000.0), Some(PriceBand::ThousandPlus));
        assert_eq!(price_band(f64::INFINITY), Some(PriceBand::ThousandPlus));
        assert_eq!(price_band(-1.0), None);
        assert_eq!(price_band(f64::NAN), None);
    }

    #[test]
    fn test_price_band_labels() {
        assert_eq!(PriceBand::Range { lower: 150 }.to_string(), "150-200");
        assert_eq!(PriceBand::ThousandPlus.to_string(), "1000+");
    }

    #[test]
    fn test_all_bands_in_order() {
        let bands = PriceBand::all();
        assert_eq!(bands.len(), 21);
        assert_eq!(bands.first().unwrap().to_string(), "0-50");
        assert_eq!(bands[19].to_string(), "950-1000");
        assert_eq!(bands.last(), Some(&PriceBand::ThousandPlus));
        assert!(bands.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_band_totals_cover_every_band() {
        let table = catalog();
        let dist = band_distribution(&table, PriceKind::Final, &select_rows(&table, None));
        let totals = band_totals(&dist);
        assert_eq!(totals.len(), 21);
        assert_eq!(totals[0], BandTotal { band: PriceBand::Range { lower: 0 }, count: 0 });
        assert_eq!(totals[1].count, 2);
        assert_eq!(totals[8].count, 1);
        assert_eq!(totals.iter().map(|t| t.count).sum::<usize>(), 5);
        assert_eq!(totals.last().unwrap().band, PriceBand::ThousandPlus);
    }

    #[test]
    fn test_band_distribution() {
        let table = catalog();
        let dist = band_distribution(&table, PriceKind::Final, &select_rows(&table, None));
        let labels: Vec<(String, &str, &str, usize)> = dist
            .iter()
            .map(|b| (b.band.to_string(), b.category.as_str(), b.brand.as_str(), b.count))
            .collect();
        // Row without a brand is skipped.
        assert_eq!(
            labels,
            vec![
                ("50-100".to_string(), "Tees", "Acme", 1),
                ("50-100".to_string(), "Tees", "Zeta", 1),
                ("150-200".to_string(), "Tees", "Acme", 1),
                ("300-350".to_string(), "Jeans", "Acme", 1),
                ("400-450".to_string(), "Dresses", "Zeta", 1),
            ]
        );
    }
}
