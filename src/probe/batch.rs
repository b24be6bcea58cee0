use reqwest::Method;
use thiserror::Error;

use crate::args::ResourceKind;
use crate::auth::SessionDriver;
use crate::error::{AuthError, ProbeError};

use super::outcome::{Outcome, classify_create, classify_mutation, resolve_identifier};
use super::resource::{ProbeStep, generate_name};
use super::sequence::{ProbeContext, execute_step, record_step};

/// Batch failures keep their two escalation paths apart: an authentication
/// failure stops the owning virtual user, while a failed batch step aborts
/// the entire run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Escalated(#[from] ProbeError),
}

/// Identifier batch owned by one worker. Regenerated explicitly at the start
/// of every cycle; never static or shared across contexts.
#[derive(Debug, Default)]
pub struct BatchState {
    names: Vec<String>,
}

impl BatchState {
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    pub fn regenerate(&mut self, kind: ResourceKind, size: usize) {
        self.names.clear();
        self.names.extend((0..size).map(|_| generate_name(kind)));
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One strictly ordered batch pass: create every pre-generated name, then
/// delete each by its resolved identifier.
///
/// # Errors
///
/// Unlike the independent probe sequences, any individual step failure is
/// escalated: later items are never attempted and the caller must abort the
/// whole run.
pub async fn run_batch_cycle(
    context: &ProbeContext<'_>,
    driver: &mut SessionDriver,
    kind: ResourceKind,
    state: &mut BatchState,
    batch_size: usize,
) -> Result<(), BatchError> {
    state.regenerate(kind, batch_size);

    for name in state.names() {
        let create = execute_step(
            context,
            driver,
            Method::POST,
            context.collection_url(kind),
            Some(&kind.create_payload(name)),
        )
        .await?;
        let outcome = classify_create(create.status);
        record_step(context, kind, ProbeStep::Create, outcome, &create);
        if !outcome.counts_as_success() {
            return Err(ProbeError::BatchStepFailed {
                name: name.clone(),
                status: create.status,
            }
            .into());
        }
    }

    for name in state.names() {
        let resolve = execute_step(
            context,
            driver,
            Method::GET,
            context.resolve_url(kind, name),
            None,
        )
        .await?;
        let identifier = resolve_identifier(kind, resolve.status, &resolve.body, name);
        let resolve_outcome = if identifier.is_some() {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        record_step(context, kind, ProbeStep::Resolve, resolve_outcome, &resolve);
        let Some(identifier) = identifier else {
            return Err(ProbeError::BatchResolveEmpty { name: name.clone() }.into());
        };

        let delete = execute_step(
            context,
            driver,
            Method::DELETE,
            context.item_url(kind, &identifier),
            None,
        )
        .await?;
        let outcome = classify_mutation(delete.status);
        record_step(context, kind, ProbeStep::Delete, outcome, &delete);
        if outcome != Outcome::Success {
            return Err(ProbeError::BatchStepFailed {
                name: name.clone(),
                status: delete.status,
            }
            .into());
        }
    }

    Ok(())
}
