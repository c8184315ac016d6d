//! Core data types for the screening pipeline.

mod config;
mod ohlc;
mod region;
mod signal;

pub use config::ScreenConfig;
pub use ohlc::{Bar, PriceSeries};
pub use region::{RegionResult, RegionSummary};
pub use signal::{ExclusionReason, SignalKind, SignalRecord, TickerOutcome};
