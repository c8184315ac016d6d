//! Screening pipeline: batch scheduling, region aggregation and reporting.

mod aggregator;
mod report;
mod runner;
mod scheduler;

pub use aggregator::RegionAggregator;
pub use report::ScreenReport;
pub use runner::Screener;
pub use scheduler::{partition, Batch, BatchOutcome, BatchScheduler, BatchState, RegionState};
