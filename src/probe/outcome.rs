use serde_json::Value;

use crate::args::ResourceKind;

use super::resource::ResolveMode;

/// Per-step classification. A tolerated conflict is a create that failed only
/// because the resource already exists; for load-test purposes it counts as
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ToleratedConflict,
    Failure,
}

impl Outcome {
    #[must_use]
    pub const fn counts_as_success(self) -> bool {
        matches!(self, Outcome::Success | Outcome::ToleratedConflict)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::ToleratedConflict => "tolerated-conflict",
            Outcome::Failure => "failure",
        }
    }
}

#[must_use]
pub const fn classify_create(status: u16) -> Outcome {
    match status {
        201 => Outcome::Success,
        409 => Outcome::ToleratedConflict,
        _ => Outcome::Failure,
    }
}

#[must_use]
pub const fn classify_mutation(status: u16) -> Outcome {
    match status {
        204 => Outcome::Success,
        _ => Outcome::Failure,
    }
}

/// Recover the server-assigned identifier from a resolve response. `None` is
/// a resolution failure: non-200 status, undecodable body, or no entry
/// matching the probe's name.
#[must_use]
pub fn resolve_identifier(kind: ResourceKind, status: u16, body: &str, name: &str) -> Option<String> {
    if status != 200 {
        return None;
    }
    extract_identifier(kind.resolve_mode(), body, name)
}

fn extract_identifier(mode: ResolveMode, body: &str, name: &str) -> Option<String> {
    match mode {
        ResolveMode::QueryParam(_) => {
            let entries: Vec<Value> = serde_json::from_str(body).ok()?;
            entries.first()?.get("id")?.as_str().map(str::to_owned)
        }
        ResolveMode::ByName => {
            let entry: Value = serde_json::from_str(body).ok()?;
            entry.get("name")?.as_str().map(str::to_owned)
        }
        ResolveMode::ListFilter => {
            let entries: Vec<Value> = serde_json::from_str(body).ok()?;
            entries
                .iter()
                .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name))?
                .get("id")?
                .as_str()
                .map(str::to_owned)
        }
    }
}
