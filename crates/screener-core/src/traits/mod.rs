//! Core traits for the screening pipeline.

mod price_provider;
mod ticker_source;

pub use price_provider::{BatchSeries, PriceSeriesProvider};
pub use ticker_source::TickerSource;
