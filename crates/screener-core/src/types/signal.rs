//! Screening signals and per-ticker outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which trailing extreme the price is approaching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Near the 52-week high
    High,
    /// Near the 52-week low
    Low,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::High => write!(f, "HIGH"),
            SignalKind::Low => write!(f, "LOW"),
        }
    }
}

/// A ticker trading within the threshold of a 52-week extreme.
///
/// Numeric fields are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Ticker symbol
    pub ticker: String,
    /// Company name, falls back to the ticker
    pub company_name: String,
    /// Last close
    pub price: f64,
    /// The extreme being approached
    pub level: f64,
    /// Signed distance from the extreme in percent
    pub distance_pct: f64,
    /// 3-month return in percent
    pub return_3m: Option<f64>,
    /// 6-month return in percent
    pub return_6m: Option<f64>,
    /// High or low
    pub kind: SignalKind,
}

/// Why a ticker produced no signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Fewer bars than the run requires
    InsufficientHistory { required: usize, available: usize },
    /// The trailing high is zero or negative
    DegenerateHigh,
    /// Price is not within the threshold of either extreme
    NotNearExtreme,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::InsufficientHistory { required, available } => {
                write!(f, "insufficient history: need {} bars, have {}", required, available)
            }
            ExclusionReason::DegenerateHigh => write!(f, "non-positive 52-week high"),
            ExclusionReason::NotNearExtreme => write!(f, "not near a 52-week extreme"),
        }
    }
}

/// Outcome of screening a single ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    /// A high or low signal
    Signal(SignalRecord),
    /// Normal exclusion, not an error
    Excluded { ticker: String, reason: ExclusionReason },
    /// Fetch or data failure scoped to this ticker
    Failed { ticker: String, reason: String },
}

impl TickerOutcome {
    /// Ticker this outcome belongs to.
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Signal(record) => &record.ticker,
            TickerOutcome::Excluded { ticker, .. } | TickerOutcome::Failed { ticker, .. } => ticker,
        }
    }

    /// Get the signal, if any.
    pub fn signal(&self) -> Option<&SignalRecord> {
        match self {
            TickerOutcome::Signal(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TickerOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_ticker() {
        let excluded = TickerOutcome::Excluded {
            ticker: "SHOP.TO".to_string(),
            reason: ExclusionReason::DegenerateHigh,
        };
        assert_eq!(excluded.ticker(), "SHOP.TO");
        assert!(excluded.signal().is_none());
        assert!(!excluded.is_failed());
    }

    #[test]
    fn test_exclusion_display() {
        let reason = ExclusionReason::InsufficientHistory {
            required: 50,
            available: 12,
        };
        assert_eq!(reason.to_string(), "insufficient history: need 50 bars, have 12");
        assert_eq!(SignalKind::Low.to_string(), "LOW");
    }
}
