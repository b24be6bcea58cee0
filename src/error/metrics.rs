use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to create histogram: {source}")]
    HistogramCreate {
        #[source]
        source: hdrhistogram::errors::CreationError,
    },
    #[error("Failed to record latency: {source}")]
    HistogramRecord {
        #[source]
        source: hdrhistogram::errors::RecordError,
    },
    #[error("Failed to merge histogram: {source}")]
    HistogramMerge {
        #[source]
        source: hdrhistogram::errors::AdditionError,
    },
}
