//! Screening report generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use screener_core::error::ScreenerError;
use screener_core::types::{RegionResult, ScreenConfig, SignalKind, SignalRecord};
use uuid::Uuid;

/// Complete result of a screening run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenReport {
    /// Run identifier
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the last region finished
    pub completed_at: DateTime<Utc>,
    /// Parameters used
    pub config: ScreenConfig,
    /// One result per requested region, in request order
    pub regions: Vec<RegionResult>,
}

/// Flattened signal row for CSV export.
#[derive(Debug, Serialize)]
struct SignalRow<'a> {
    region: &'a str,
    kind: SignalKind,
    ticker: &'a str,
    company_name: &'a str,
    price: f64,
    level: f64,
    distance_pct: f64,
    return_3m: Option<f64>,
    return_6m: Option<f64>,
}

impl<'a> SignalRow<'a> {
    fn new(region: &'a str, record: &'a SignalRecord) -> Self {
        Self {
            region,
            kind: record.kind,
            ticker: &record.ticker,
            company_name: &record.company_name,
            price: record.price,
            level: record.level,
            distance_pct: record.distance_pct,
            return_3m: record.return_3m,
            return_6m: record.return_6m,
        }
    }
}

impl ScreenReport {
    /// Look up a region's result by name.
    pub fn region(&self, name: &str) -> Option<&RegionResult> {
        self.regions.iter().find(|r| r.region == name)
    }

    /// Signals across all regions.
    pub fn total_signals(&self) -> usize {
        self.regions.iter().map(RegionResult::signal_count).sum()
    }

    /// Wall-clock duration of the run in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        (self.completed_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════════════════════\n");
        s.push_str("                        52-WEEK HIGH/LOW SCREEN                              \n");
        s.push_str("═══════════════════════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Run:                 {}\n", self.run_id));
        s.push_str(&format!(
            "  Started:             {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        s.push_str(&format!("  Duration:            {:.1}s\n", self.elapsed_secs()));
        s.push_str(&format!(
            "  Threshold:           {:.2}%\n",
            self.config.threshold * 100.0
        ));
        s.push_str(&format!("  Total Signals:       {}\n", self.total_signals()));
        s.push('\n');

        for region in &self.regions {
            s.push_str(&format!("{}\n", region.region.to_uppercase()));
            s.push_str("───────────────────────────────────────────────────────────────────────────\n");
            let summary = &region.summary;
            s.push_str(&format!(
                "  Tickers:             {} ({} evaluated, {} excluded, {} failed)\n",
                summary.tickers_total,
                summary.tickers_processed(),
                summary.excluded,
                summary.failed
            ));
            s.push_str(&format!(
                "  Batches:             {} ({} failed)\n",
                summary.batches_total, summary.batches_failed
            ));
            s.push('\n');

            for kind in [SignalKind::High, SignalKind::Low] {
                push_table(&mut s, kind, region.records(kind));
            }
        }

        s.push_str("═══════════════════════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export every signal as CSV, one row per record.
    pub fn signals_to_csv(&self) -> Result<String, ScreenerError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for region in &self.regions {
            for record in region.highs.iter().chain(&region.lows) {
                writer
                    .serialize(SignalRow::new(&region.region, record))
                    .map_err(|e| ScreenerError::Serialization(e.to_string()))?;
            }
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ScreenerError::Serialization(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ScreenerError::Serialization(e.to_string()))
    }
}

fn push_table(s: &mut String, kind: SignalKind, records: &[SignalRecord]) {
    let title = match kind {
        SignalKind::High => "Near 52-Week High",
        SignalKind::Low => "Near 52-Week Low",
    };
    s.push_str(&format!("  {} ({})\n", title, records.len()));
    if records.is_empty() {
        s.push_str("    none\n\n");
        return;
    }

    s.push_str(&format!(
        "    {:<10} {:<28} {:>10} {:>10} {:>8} {:>8} {:>8}\n",
        "Ticker", "Company", "Price", "Level", "Dist%", "3M%", "6M%"
    ));
    for r in records {
        s.push_str(&format!(
            "    {:<10} {:<28} {:>10.2} {:>10.2} {:>8.2} {:>8} {:>8}\n",
            r.ticker,
            truncate(&r.company_name, 28),
            r.price,
            r.level,
            r.distance_pct,
            fmt_return(r.return_3m),
            fmt_return(r.return_6m)
        ));
    }
    s.push('\n');
}

fn fmt_return(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width - 1).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::types::RegionSummary;

    fn record(ticker: &str, kind: SignalKind) -> SignalRecord {
        SignalRecord {
            ticker: ticker.to_string(),
            company_name: format!("{} Holdings", ticker),
            price: 98.5,
            level: 100.0,
            distance_pct: -1.5,
            return_3m: Some(12.34),
            return_6m: None,
            kind,
        }
    }

    fn create_report() -> ScreenReport {
        let started_at = Utc::now();
        let us = RegionResult {
            region: "US".to_string(),
            highs: vec![record("AAPL", SignalKind::High)],
            lows: vec![record("INTC", SignalKind::Low)],
            summary: RegionSummary {
                tickers_total: 3,
                signals: 2,
                excluded: 1,
                ..Default::default()
            },
        };
        ScreenReport {
            run_id: Uuid::new_v4(),
            started_at,
            completed_at: started_at + chrono::Duration::milliseconds(2500),
            config: ScreenConfig::default(),
            regions: vec![us, RegionResult::empty("UK")],
        }
    }

    #[test]
    fn test_report_summary() {
        let report = create_report();
        let summary = report.summary();

        assert!(summary.contains("52-WEEK HIGH/LOW SCREEN"));
        assert!(summary.contains("Threshold:           3.00%"));
        assert!(summary.contains("Duration:            2.5s"));
        assert!(summary.contains("Near 52-Week High (1)"));
        assert!(summary.contains("AAPL"));
        assert!(summary.contains("12.34"));
        assert!(summary.contains("UK"));
        assert!(summary.contains("none"));
    }

    #[test]
    fn test_report_lookup_and_totals() {
        let report = create_report();
        assert_eq!(report.total_signals(), 2);
        assert_eq!(report.region("US").map(|r| r.highs.len()), Some(1));
        assert!(report.region("Canada").is_none());
    }

    #[test]
    fn test_report_json() {
        let report = create_report();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["regions"][0]["highs"][0]["ticker"], "AAPL");
        assert_eq!(value["regions"][0]["lows"][0]["kind"], "low");
        assert_eq!(value["regions"][1]["region"], "UK");
    }

    #[test]
    fn test_signals_to_csv() {
        let report = create_report();
        let csv = report.signals_to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "region,kind,ticker,company_name,price,level,distance_pct,return_3m,return_6m"
        );
        assert_eq!(lines[1], "US,high,AAPL,AAPL Holdings,98.5,100.0,-1.5,12.34,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Apple", 28), "Apple");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
