// Engine library root: catalog decoding, price normalization, session
// context and the descriptive figures behind the benchmarking dashboard.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use data::price_normalizer::{correct_magnitude, normalize_prices, PriceNormalizer};
pub use error::{EngineError, EngineResult};
