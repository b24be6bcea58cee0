use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::args::RunArgs;
use crate::error::AppResult;
use crate::http;
use crate::metrics::{self, MetricsSummary, ProbeSample};
use crate::shutdown;

use super::summary;

const SAMPLE_CHANNEL_CAPACITY: usize = 10_000;

pub(crate) struct RunOutcome {
    pub(crate) summary: MetricsSummary,
    pub(crate) runtime_errors: Vec<String>,
}

pub(crate) async fn run_local(args: RunArgs) -> AppResult<RunOutcome> {
    let (shutdown_tx, _) = shutdown::shutdown_channel();
    let (samples_tx, samples_rx) = mpsc::channel::<ProbeSample>(SAMPLE_CHANNEL_CAPACITY);
    let started_at = chrono::Local::now();

    info!(
        "Starting {} run: {} virtual users against {} (realm '{}').",
        args.task_set.as_str(),
        args.users.get(),
        args.base_url.as_deref().unwrap_or("<unset>"),
        args.realm
    );

    let worker_handle = http::setup_probe_workers(&args, &shutdown_tx, &samples_tx)?;
    drop(samples_tx);

    let signal_handle = shutdown::setup_signal_shutdown_handler(&shutdown_tx);
    let metrics_handle = metrics::setup_metrics_collector(
        Duration::from_secs(args.target_duration.get()),
        &shutdown_tx,
        samples_rx,
    );

    let (signal_result, worker_result, metrics_result) =
        tokio::join!(signal_handle, worker_handle, metrics_handle);

    let mut runtime_errors = Vec::new();
    if let Err(err) = signal_result {
        runtime_errors.push(format!("Signal handler task failed: {}", err));
    }
    if let Err(err) = worker_result {
        runtime_errors.push(format!("Worker pool task failed: {}", err));
    }
    let report = match metrics_result {
        Ok(report) => report,
        Err(err) => {
            runtime_errors.push(format!("Metrics collector task failed: {}", err));
            metrics::MetricsReport {
                summary: MetricsSummary::empty(),
            }
        }
    };

    summary::print_summary(&report.summary, &started_at);

    Ok(RunOutcome {
        summary: report.summary,
        runtime_errors,
    })
}
