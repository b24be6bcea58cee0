//! Token-authenticated CRUD probe sequences against the admin API.
mod batch;
mod outcome;
mod report;
mod resource;
mod sequence;


pub use batch::{BatchError, BatchState, run_batch_cycle};
pub use outcome::{Outcome, classify_create, classify_mutation, resolve_identifier};
pub use report::{ChannelReporter, ProbeReporter};
pub use resource::{ProbeStep, generate_name};
pub use sequence::{ProbeContext, SequenceOutcome, run_crud_sequence, run_smoke_sequence};
