//! Trailing return helpers.

use screener_core::types::PriceSeries;

/// Trading days in roughly three months.
pub const BARS_3M: usize = 63;

/// Trading days in roughly six months.
pub const BARS_6M: usize = 126;

/// Round to 2 decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percent return from the close `bars` positions from the end to the last close.
///
/// `None` when the series is shorter than `bars` or the reference close is
/// not a positive number.
pub fn trailing_return(series: &PriceSeries, bars: usize) -> Option<f64> {
    let current = series.last_close()?;
    let past = series.close_from_end(bars)?;

    if past > 0.0 && past.is_finite() {
        Some((current / past - 1.0) * 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use screener_core::types::Bar;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), c, c, c, c, 0.0))
            .collect();
        PriceSeries::with_bars("TEST", bars)
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(22.222222), 22.22);
        assert_eq!(round2(-3.005001), -3.01);
        assert_eq!(round2(10.000000000000009), 10.0);
    }

    #[test]
    fn test_trailing_return() {
        let series = series_from_closes(&[50.0, 80.0, 100.0]);

        assert!((trailing_return(&series, 3).unwrap() - 100.0).abs() < 1e-9);
        assert!((trailing_return(&series, 2).unwrap() - 25.0).abs() < 1e-9);
        assert_eq!(trailing_return(&series, 4), None);
    }

    #[test]
    fn test_trailing_return_zero_reference() {
        let series = series_from_closes(&[0.0, 80.0, 100.0]);
        assert_eq!(trailing_return(&series, 3), None);
    }
}
