use std::time::Duration;

use crate::probe::Outcome;

/// One classified probe step, labelled for per-endpoint aggregation.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSample {
    pub name: &'static str,
    pub outcome: Outcome,
    pub status: u16,
    pub latency: Duration,
}

#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub duration: Duration,
    pub total_samples: u64,
    pub successes: u64,
    pub tolerated_conflicts: u64,
    pub failures: u64,
    pub endpoints: Vec<EndpointSummary>,
}

impl MetricsSummary {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            duration: Duration::ZERO,
            total_samples: 0,
            successes: 0,
            tolerated_conflicts: 0,
            failures: 0,
            endpoints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndpointSummary {
    pub name: &'static str,
    pub samples: u64,
    pub successes: u64,
    pub tolerated_conflicts: u64,
    pub failures: u64,
    pub min_latency_ms: u64,
    pub avg_latency_ms: u64,
    pub max_latency_ms: u64,
    pub p50_latency_ms: u64,
    pub p90_latency_ms: u64,
    pub p99_latency_ms: u64,
}

#[derive(Debug)]
pub struct MetricsReport {
    pub summary: MetricsSummary,
}
