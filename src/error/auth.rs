use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token request failed: {source}")]
    TokenRequestFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Token request denied: status {status}: {body}")]
    TokenRequestDenied { status: u16, body: String },
    #[error("Malformed token response: {source}")]
    MalformedTokenResponse {
        #[source]
        source: serde_json::Error,
    },
}
