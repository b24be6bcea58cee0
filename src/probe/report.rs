use tokio::sync::mpsc;
use tracing::warn;

use crate::metrics::ProbeSample;

/// Seam between probe classification and the statistics pipeline, so the
/// executor can be driven against an in-memory recorder in tests.
pub trait ProbeReporter: Send + Sync {
    fn record(&self, sample: ProbeSample);
}

/// Production reporter: forwards samples to the metrics collector channel.
pub struct ChannelReporter {
    samples_tx: mpsc::Sender<ProbeSample>,
}

impl ChannelReporter {
    #[must_use]
    pub const fn new(samples_tx: mpsc::Sender<ProbeSample>) -> Self {
        Self { samples_tx }
    }
}

impl ProbeReporter for ChannelReporter {
    fn record(&self, sample: ProbeSample) {
        if self.samples_tx.try_send(sample).is_err() {
            warn!("Metrics channel full; dropping sample for {}.", sample.name);
        }
    }
}
