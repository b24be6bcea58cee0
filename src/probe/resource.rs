use serde_json::{Value, json};
use uuid::Uuid;

use crate::args::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStep {
    Create,
    Resolve,
    Update,
    Delete,
}

impl ProbeStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProbeStep::Create => "create",
            ProbeStep::Resolve => "resolve",
            ProbeStep::Update => "update",
            ProbeStep::Delete => "delete",
        }
    }
}

/// How the server-assigned identifier is recovered after a create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolveMode {
    /// Collection endpoint supports exact-name filtering via a query param.
    QueryParam(&'static str),
    /// Item endpoint is addressed by name; the representation is fetched
    /// directly.
    ByName,
    /// Collection endpoint has no filter; the listing is matched by name
    /// client-side.
    ListFilter,
}

impl ResourceKind {
    pub(crate) const fn singular(self) -> &'static str {
        match self {
            ResourceKind::Users => "user",
            ResourceKind::Clients => "client",
            ResourceKind::Roles => "role",
            ResourceKind::Groups => "group",
            ResourceKind::ClientScopes => "client_scope",
        }
    }

    pub(crate) const fn collection_path(self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Clients => "clients",
            ResourceKind::Roles => "roles",
            ResourceKind::Groups => "groups",
            ResourceKind::ClientScopes => "client-scopes",
        }
    }

    pub(crate) const fn resolve_mode(self) -> ResolveMode {
        match self {
            ResourceKind::Users => ResolveMode::QueryParam("username"),
            ResourceKind::Clients => ResolveMode::QueryParam("clientId"),
            ResourceKind::Roles => ResolveMode::ByName,
            ResourceKind::Groups | ResourceKind::ClientScopes => ResolveMode::ListFilter,
        }
    }

    pub(crate) fn create_payload(self, name: &str) -> Value {
        match self {
            ResourceKind::Users => json!({"username": name, "enabled": true}),
            ResourceKind::Clients => json!({"clientId": name, "enabled": true}),
            ResourceKind::Roles | ResourceKind::Groups => json!({"name": name}),
            ResourceKind::ClientScopes => {
                json!({"name": name, "protocol": "openid-connect"})
            }
        }
    }

    pub(crate) fn update_payload(self, name: &str) -> Value {
        match self {
            ResourceKind::Users => json!({"firstName": "Test"}),
            ResourceKind::Clients | ResourceKind::Roles | ResourceKind::ClientScopes => {
                json!({"description": "updated by kcload"})
            }
            ResourceKind::Groups => json!({"name": name}),
        }
    }

    pub(crate) const fn step_label(self, step: ProbeStep) -> &'static str {
        match (self, step) {
            (ResourceKind::Users, ProbeStep::Create) => "user_create",
            (ResourceKind::Users, ProbeStep::Resolve) => "user_resolve",
            (ResourceKind::Users, ProbeStep::Update) => "user_update",
            (ResourceKind::Users, ProbeStep::Delete) => "user_delete",
            (ResourceKind::Clients, ProbeStep::Create) => "client_create",
            (ResourceKind::Clients, ProbeStep::Resolve) => "client_resolve",
            (ResourceKind::Clients, ProbeStep::Update) => "client_update",
            (ResourceKind::Clients, ProbeStep::Delete) => "client_delete",
            (ResourceKind::Roles, ProbeStep::Create) => "role_create",
            (ResourceKind::Roles, ProbeStep::Resolve) => "role_resolve",
            (ResourceKind::Roles, ProbeStep::Update) => "role_update",
            (ResourceKind::Roles, ProbeStep::Delete) => "role_delete",
            (ResourceKind::Groups, ProbeStep::Create) => "group_create",
            (ResourceKind::Groups, ProbeStep::Resolve) => "group_resolve",
            (ResourceKind::Groups, ProbeStep::Update) => "group_update",
            (ResourceKind::Groups, ProbeStep::Delete) => "group_delete",
            (ResourceKind::ClientScopes, ProbeStep::Create) => "client_scope_create",
            (ResourceKind::ClientScopes, ProbeStep::Resolve) => "client_scope_resolve",
            (ResourceKind::ClientScopes, ProbeStep::Update) => "client_scope_update",
            (ResourceKind::ClientScopes, ProbeStep::Delete) => "client_scope_delete",
        }
    }
}

/// Globally unique resource name; collisions across concurrent virtual users
/// are tolerated via 409 classification, not prevented here.
#[must_use]
pub fn generate_name(kind: ResourceKind) -> String {
    format!("test_{}_{}", kind.singular(), Uuid::new_v4())
}
