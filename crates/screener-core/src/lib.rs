//! Core types and traits for the screening pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries)
//! - Screening results (SignalRecord, RegionResult, TickerOutcome)
//! - Run parameters (ScreenConfig)
//! - Core traits for price providers and ticker sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ScreenerError, ScreenerResult};
pub use types::*;
pub use traits::*;
