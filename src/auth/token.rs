use serde::Deserialize;

use crate::error::AuthError;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 60;
/// Seconds subtracted from the server lifetime so a refresh lands before the
/// token actually lapses.
pub const EXPIRY_SAFETY_MARGIN_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

const fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN_SECS
}

impl TokenResponse {
    /// Decode a token endpoint body.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not JSON or lacks `access_token`.
    pub fn from_json(body: &str) -> Result<Self, AuthError> {
        serde_json::from_str(body).map_err(|source| AuthError::MalformedTokenResponse { source })
    }
}

/// Bearer credential owned by one session driver. Replaced wholesale on every
/// refresh, never partially mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    expires_at_epoch_secs: u64,
}

impl Credential {
    #[must_use]
    pub fn from_token_response(response: &TokenResponse, now_epoch_secs: u64) -> Self {
        let lifetime = response
            .expires_in
            .saturating_sub(EXPIRY_SAFETY_MARGIN_SECS);
        Self {
            access_token: response.access_token.clone(),
            expires_at_epoch_secs: now_epoch_secs.saturating_add(lifetime),
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub const fn expires_at_epoch_secs(&self) -> u64 {
        self.expires_at_epoch_secs
    }

    #[must_use]
    pub const fn is_expired(&self, now_epoch_secs: u64) -> bool {
        now_epoch_secs >= self.expires_at_epoch_secs
    }
}
