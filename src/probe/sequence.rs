use std::time::Duration;

use reqwest::{Client, Method};
use tokio::time::Instant;
use tracing::error;
use url::Url;

use crate::args::ResourceKind;
use crate::auth::SessionDriver;
use crate::error::AuthError;
use crate::metrics::ProbeSample;

use super::outcome::{Outcome, classify_create, classify_mutation, resolve_identifier};
use super::report::ProbeReporter;
use super::resource::{ProbeStep, ResolveMode, generate_name};

/// Status recorded when the transport fails before any HTTP status exists.
pub(super) const TRANSPORT_FAILED_STATUS: u16 = 0;

/// Everything a probe sequence needs besides its session driver. The admin
/// base URL always carries a trailing slash (`.../admin/realms/{realm}/`).
pub struct ProbeContext<'ctx> {
    pub client: &'ctx Client,
    pub admin_base: &'ctx Url,
    pub reporter: &'ctx dyn ProbeReporter,
}

impl ProbeContext<'_> {
    pub(super) fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}{}", self.admin_base, kind.collection_path())
    }

    pub(super) fn item_url(&self, kind: ResourceKind, identifier: &str) -> String {
        format!(
            "{}{}/{}",
            self.admin_base,
            kind.collection_path(),
            identifier
        )
    }

    pub(super) fn resolve_url(&self, kind: ResourceKind, name: &str) -> String {
        match kind.resolve_mode() {
            ResolveMode::QueryParam(param) => format!(
                "{}{}?{}={}",
                self.admin_base,
                kind.collection_path(),
                param,
                name
            ),
            ResolveMode::ByName => self.item_url(kind, name),
            ResolveMode::ListFilter => self.collection_url(kind),
        }
    }
}

/// Terminal state of one probe sequence. A failed step aborts the sequence
/// and its dependent steps; sibling sequences are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed,
    Aborted(ProbeStep),
}

pub(super) struct StepResult {
    pub(super) status: u16,
    pub(super) body: String,
    pub(super) latency: Duration,
}

/// Refresh the token if needed, issue one admin request, and time it.
/// Transport errors are folded into a zero-status result so callers classify
/// them like any unexpected status.
///
/// # Errors
///
/// Propagates authentication failures, which are fatal to the owning context.
pub(super) async fn execute_step(
    context: &ProbeContext<'_>,
    driver: &mut SessionDriver,
    method: Method,
    url: String,
    payload: Option<&serde_json::Value>,
) -> Result<StepResult, AuthError> {
    driver.ensure_valid_token().await?;
    let bearer = driver.bearer().unwrap_or_default();
    let mut request = context.client.request(method, url).bearer_auth(bearer);
    if let Some(payload) = payload {
        request = request.json(payload);
    }

    let start = Instant::now();
    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Ok(StepResult {
                status,
                body,
                latency: start.elapsed(),
            })
        }
        Err(err) => Ok(StepResult {
            status: TRANSPORT_FAILED_STATUS,
            body: err.to_string(),
            latency: start.elapsed(),
        }),
    }
}

pub(super) fn record_step(
    context: &ProbeContext<'_>,
    kind: ResourceKind,
    step: ProbeStep,
    outcome: Outcome,
    result: &StepResult,
) {
    let label = kind.step_label(step);
    if outcome == Outcome::Failure {
        error!(
            "Probe {} failed: status {}: {}",
            label, result.status, result.body
        );
    }
    context.reporter.record(ProbeSample {
        name: label,
        outcome,
        status: result.status,
        latency: result.latency,
    });
}

/// Run one Create -> Resolve -> Update -> Delete cycle against `kind`.
///
/// A tolerated conflict on create continues to resolve; any step failure
/// skips the remaining dependent steps.
///
/// # Errors
///
/// Propagates authentication failures, which are fatal to the owning context.
pub async fn run_crud_sequence(
    context: &ProbeContext<'_>,
    driver: &mut SessionDriver,
    kind: ResourceKind,
) -> Result<SequenceOutcome, AuthError> {
    let name = generate_name(kind);

    let create = execute_step(
        context,
        driver,
        Method::POST,
        context.collection_url(kind),
        Some(&kind.create_payload(&name)),
    )
    .await?;
    let create_outcome = classify_create(create.status);
    record_step(context, kind, ProbeStep::Create, create_outcome, &create);
    if !create_outcome.counts_as_success() {
        return Ok(SequenceOutcome::Aborted(ProbeStep::Create));
    }

    let resolve = execute_step(
        context,
        driver,
        Method::GET,
        context.resolve_url(kind, &name),
        None,
    )
    .await?;
    let identifier = resolve_identifier(kind, resolve.status, &resolve.body, &name);
    let resolve_outcome = if identifier.is_some() {
        Outcome::Success
    } else {
        Outcome::Failure
    };
    record_step(context, kind, ProbeStep::Resolve, resolve_outcome, &resolve);
    let Some(identifier) = identifier else {
        return Ok(SequenceOutcome::Aborted(ProbeStep::Resolve));
    };

    let update = execute_step(
        context,
        driver,
        Method::PUT,
        context.item_url(kind, &identifier),
        Some(&kind.update_payload(&name)),
    )
    .await?;
    let update_outcome = classify_mutation(update.status);
    record_step(context, kind, ProbeStep::Update, update_outcome, &update);
    if update_outcome != Outcome::Success {
        return Ok(SequenceOutcome::Aborted(ProbeStep::Update));
    }

    let delete = execute_step(
        context,
        driver,
        Method::DELETE,
        context.item_url(kind, &identifier),
        None,
    )
    .await?;
    let delete_outcome = classify_mutation(delete.status);
    record_step(context, kind, ProbeStep::Delete, delete_outcome, &delete);
    if delete_outcome != Outcome::Success {
        return Ok(SequenceOutcome::Aborted(ProbeStep::Delete));
    }

    Ok(SequenceOutcome::Completed)
}

/// Create-only probe for smoke-style runs.
///
/// # Errors
///
/// Propagates authentication failures, which are fatal to the owning context.
pub async fn run_smoke_sequence(
    context: &ProbeContext<'_>,
    driver: &mut SessionDriver,
    kind: ResourceKind,
) -> Result<SequenceOutcome, AuthError> {
    let name = generate_name(kind);
    let create = execute_step(
        context,
        driver,
        Method::POST,
        context.collection_url(kind),
        Some(&kind.create_payload(&name)),
    )
    .await?;
    let outcome = classify_create(create.status);
    record_step(context, kind, ProbeStep::Create, outcome, &create);
    if outcome.counts_as_success() {
        Ok(SequenceOutcome::Completed)
    } else {
        Ok(SequenceOutcome::Aborted(ProbeStep::Create))
    }
}
