//! Run metrics and the report handed back to callers.

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot, RunReport};
