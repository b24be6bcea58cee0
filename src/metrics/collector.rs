use std::collections::BTreeMap;
use std::time::Duration;

use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::Instant,
};
use tracing::warn;

use crate::probe::Outcome;

use super::{EndpointSummary, LatencyHistogram, MetricsReport, MetricsSummary, ProbeSample};

struct EndpointState {
    samples: u64,
    successes: u64,
    tolerated_conflicts: u64,
    failures: u64,
    min_latency_ms: u64,
    max_latency_ms: u64,
    latency_sum_ms: u128,
    histogram: Option<LatencyHistogram>,
}

impl EndpointState {
    fn new() -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Failed to initialize latency histogram: {}", err);
                None
            }
        };
        Self {
            samples: 0,
            successes: 0,
            tolerated_conflicts: 0,
            failures: 0,
            min_latency_ms: u64::MAX,
            max_latency_ms: 0,
            latency_sum_ms: 0,
            histogram,
        }
    }

    fn ingest(&mut self, sample: &ProbeSample) {
        let latency_ms = u64::try_from(sample.latency.as_millis()).unwrap_or(u64::MAX);
        self.samples = self.samples.saturating_add(1);
        match sample.outcome {
            Outcome::Success => self.successes = self.successes.saturating_add(1),
            Outcome::ToleratedConflict => {
                self.tolerated_conflicts = self.tolerated_conflicts.saturating_add(1);
            }
            Outcome::Failure => self.failures = self.failures.saturating_add(1),
        }
        self.min_latency_ms = self.min_latency_ms.min(latency_ms);
        self.max_latency_ms = self.max_latency_ms.max(latency_ms);
        self.latency_sum_ms = self.latency_sum_ms.saturating_add(u128::from(latency_ms));
        if let Some(histogram) = self.histogram.as_mut()
            && let Err(err) = histogram.record(latency_ms)
        {
            warn!("Failed to record latency sample: {}", err);
        }
    }

    fn summarize(&self, name: &'static str) -> EndpointSummary {
        let (p50_latency_ms, p90_latency_ms, p99_latency_ms) = self
            .histogram
            .as_ref()
            .map_or((0, 0, 0), LatencyHistogram::percentiles);
        let avg_latency_ms = if self.samples == 0 {
            0
        } else {
            let avg = self
                .latency_sum_ms
                .checked_div(u128::from(self.samples))
                .unwrap_or(0);
            u64::try_from(avg).unwrap_or(u64::MAX)
        };
        let min_latency_ms = if self.samples == 0 {
            0
        } else {
            self.min_latency_ms
        };

        EndpointSummary {
            name,
            samples: self.samples,
            successes: self.successes,
            tolerated_conflicts: self.tolerated_conflicts,
            failures: self.failures,
            min_latency_ms,
            avg_latency_ms,
            max_latency_ms: self.max_latency_ms,
            p50_latency_ms,
            p90_latency_ms,
            p99_latency_ms,
        }
    }
}

/// Spawn the collector task. It owns the run-duration timer: when the target
/// duration elapses it broadcasts shutdown itself, then drains whatever the
/// workers flushed before stopping.
#[must_use]
pub fn setup_metrics_collector(
    target_duration: Duration,
    shutdown_tx: &broadcast::Sender<u16>,
    mut samples_rx: mpsc::Receiver<ProbeSample>,
) -> JoinHandle<MetricsReport> {
    let shutdown_tx = shutdown_tx.clone();

    tokio::spawn(async move {
        let run_start = Instant::now();
        let mut shutdown_rx = shutdown_tx.subscribe();
        let mut endpoints: BTreeMap<&'static str, EndpointState> = BTreeMap::new();
        let shutdown_timer = tokio::time::sleep(target_duration);
        tokio::pin!(shutdown_timer);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                () = &mut shutdown_timer => {
                    drop(shutdown_tx.send(0));
                    break;
                }
                maybe_sample = samples_rx.recv() => match maybe_sample {
                    Some(sample) => {
                        endpoints
                            .entry(sample.name)
                            .or_insert_with(EndpointState::new)
                            .ingest(&sample);
                    }
                    None => break,
                },
            }
        }

        while let Ok(sample) = samples_rx.try_recv() {
            endpoints
                .entry(sample.name)
                .or_insert_with(EndpointState::new)
                .ingest(&sample);
        }

        build_report(run_start.elapsed(), &endpoints)
    })
}

fn build_report(
    duration: Duration,
    endpoints: &BTreeMap<&'static str, EndpointState>,
) -> MetricsReport {
    let mut summary = MetricsSummary {
        duration,
        ..MetricsSummary::empty()
    };
    for (name, state) in endpoints {
        summary.total_samples = summary.total_samples.saturating_add(state.samples);
        summary.successes = summary.successes.saturating_add(state.successes);
        summary.tolerated_conflicts = summary
            .tolerated_conflicts
            .saturating_add(state.tolerated_conflicts);
        summary.failures = summary.failures.saturating_add(state.failures);
        summary.endpoints.push(state.summarize(name));
    }
    MetricsReport { summary }
}
