//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::RunArgs;
pub use types::{PositiveU64, PositiveUsize, ResourceKind, TaskSet, ThinkTime};

pub(crate) use defaults::DEFAULT_USER_AGENT;
