use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use url::Url;

use crate::error::AuthError;

use super::token::{Credential, TokenResponse};

/// Fixed credentials and endpoint for the password grant. Shared read-only
/// across virtual users.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub token_url: Url,
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: Option<String>,
}

/// Owns one bearer credential and refreshes it on demand. One driver per
/// virtual user; never shared across contexts.
pub struct SessionDriver {
    client: Client,
    settings: Arc<AuthSettings>,
    credential: Option<Credential>,
}

impl SessionDriver {
    #[must_use]
    pub const fn new(client: Client, settings: Arc<AuthSettings>) -> Self {
        Self {
            client,
            settings,
            credential: None,
        }
    }

    /// Issue the form-encoded password-grant request and install a fresh
    /// credential.
    ///
    /// # Errors
    ///
    /// Any non-200 response is fatal to the owning context: this driver never
    /// retries authentication failures.
    pub async fn authenticate(&mut self) -> Result<(), AuthError> {
        let settings = Arc::clone(&self.settings);
        let mut form: Vec<(&str, &str)> = vec![
            ("username", &settings.username),
            ("password", &settings.password),
            ("grant_type", "password"),
            ("client_id", &settings.client_id),
        ];
        if let Some(client_secret) = settings.client_secret.as_deref() {
            form.push(("client_secret", client_secret));
        }

        let response = self
            .client
            .post(settings.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|source| AuthError::TokenRequestFailed { source })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| AuthError::TokenRequestFailed { source })?;
        if status != 200 {
            return Err(AuthError::TokenRequestDenied { status, body });
        }

        let token = TokenResponse::from_json(&body)?;
        self.credential = Some(Credential::from_token_response(&token, unix_now_secs()));
        Ok(())
    }

    /// Re-authenticate when the credential is missing or past its expiry;
    /// otherwise a no-op. Checked before every authorized probe step.
    ///
    /// # Errors
    ///
    /// Propagates authentication failures; see [`SessionDriver::authenticate`].
    pub async fn ensure_valid_token(&mut self) -> Result<(), AuthError> {
        let expired = self
            .credential
            .as_ref()
            .map_or(true, |credential| credential.is_expired(unix_now_secs()));
        if expired {
            self.authenticate().await
        } else {
            Ok(())
        }
    }

    /// Access token for the `Authorization: Bearer` header, if authenticated.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.credential.as_ref().map(Credential::access_token)
    }

    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

#[must_use]
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
