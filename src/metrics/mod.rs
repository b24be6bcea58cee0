//! Probe sample collection, per-endpoint aggregation, and histogram
//! utilities.
mod collector;
mod histogram;
mod types;


pub use collector::setup_metrics_collector;
pub use histogram::LatencyHistogram;
pub use types::{EndpointSummary, MetricsReport, MetricsSummary, ProbeSample};
