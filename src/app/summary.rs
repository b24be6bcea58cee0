use chrono::{DateTime, Local};

use crate::metrics::MetricsSummary;

pub(crate) struct SummaryStats {
    pub(crate) classified_successes: u64,
    pub(crate) success_rate_x100: u64,
    pub(crate) avg_probes_per_sec_x100: u64,
}

pub(crate) fn compute_summary_stats(summary: &MetricsSummary) -> SummaryStats {
    let duration_ms = summary.duration.as_millis().max(1);
    let total = summary.total_samples;
    let classified_successes = summary
        .successes
        .saturating_add(summary.tolerated_conflicts);

    let success_rate_x100 = if total > 0 {
        let scaled = u128::from(classified_successes)
            .saturating_mul(10_000)
            .checked_div(u128::from(total))
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    let avg_probes_per_sec_x100 = if total > 0 {
        let scaled = u128::from(total)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    SummaryStats {
        classified_successes,
        success_rate_x100,
        avg_probes_per_sec_x100,
    }
}

pub(crate) fn print_summary(summary: &MetricsSummary, started_at: &DateTime<Local>) {
    let stats = compute_summary_stats(summary);

    println!();
    println!("=== kcload summary ===");
    println!("Started: {}", started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Duration: {}s", summary.duration.as_secs());
    println!("Total Probes: {}", summary.total_samples);
    println!(
        "Successful: {} ({}.{:02}%)",
        stats.classified_successes,
        stats.success_rate_x100 / 100,
        stats.success_rate_x100 % 100
    );
    println!("Tolerated Conflicts: {}", summary.tolerated_conflicts);
    println!("Failures: {}", summary.failures);
    println!(
        "Avg Throughput: {}.{:02} probes/s",
        stats.avg_probes_per_sec_x100 / 100,
        stats.avg_probes_per_sec_x100 % 100
    );

    if summary.endpoints.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<22} {:>8} {:>8} {:>9} {:>8} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "endpoint", "probes", "ok", "conflict", "failed", "min", "avg", "max", "p50", "p90", "p99"
    );
    for endpoint in &summary.endpoints {
        println!(
            "{:<22} {:>8} {:>8} {:>9} {:>8} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
            endpoint.name,
            endpoint.samples,
            endpoint.successes,
            endpoint.tolerated_conflicts,
            endpoint.failures,
            endpoint.min_latency_ms,
            endpoint.avg_latency_ms,
            endpoint.max_latency_ms,
            endpoint.p50_latency_ms,
            endpoint.p90_latency_ms,
            endpoint.p99_latency_ms
        );
    }
}
