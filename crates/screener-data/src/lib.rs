//! Price providers and ticker sources for the screener.

mod csv_source;
mod ticker_file;
mod yahoo;

pub use csv_source::CsvDirectoryProvider;
pub use ticker_file::{parse_ticker_lines, FileTickerSource, StaticTickerSource};
pub use yahoo::{YahooChartConfig, YahooChartProvider};
