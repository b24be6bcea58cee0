use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Batch step '{name}' failed with status {status}.")]
    BatchStepFailed { name: String, status: u16 },
    #[error("Batch resolve for '{name}' returned no match.")]
    BatchResolveEmpty { name: String },
}
