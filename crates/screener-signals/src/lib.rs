//! Signal extraction for the 52-week extreme screener.
//!
//! Given one ticker's trailing daily series this crate decides whether the
//! ticker is trading near its 52-week high or low, and attaches 3-month and
//! 6-month returns to every hit.

pub mod extractor;
pub mod returns;

pub use extractor::SignalExtractor;
pub use returns::{round2, trailing_return, BARS_3M, BARS_6M};
