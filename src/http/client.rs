use reqwest::Client;
use url::Url;

use crate::args::{DEFAULT_USER_AGENT, RunArgs};
use crate::error::HttpError;

/// Build the shared HTTP client used by every virtual user. Transport
/// timeouts and retry behavior live here, not in the probe logic.
///
/// # Errors
///
/// Returns an error when the client cannot be constructed.
pub fn build_client(args: &RunArgs) -> Result<Client, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(args.request_timeout)
        .connect_timeout(args.connect_timeout)
        .user_agent(DEFAULT_USER_AGENT);

    if args.insecure {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    client_builder
        .build()
        .map_err(|source| HttpError::BuildClientFailed { source })
}

/// Admin API root for one realm, with a trailing slash so probe paths join
/// onto it directly.
///
/// # Errors
///
/// Returns an error when the base URL does not parse.
pub fn admin_base_url(base_url: &str, realm: &str) -> Result<Url, HttpError> {
    let raw = format!("{}/admin/realms/{}/", base_url.trim_end_matches('/'), realm);
    Url::parse(&raw).map_err(|source| HttpError::InvalidBaseUrl {
        url: raw,
        source,
    })
}

/// Password-grant token endpoint for one realm.
///
/// # Errors
///
/// Returns an error when the base URL does not parse.
pub fn token_endpoint_url(base_url: &str, realm: &str) -> Result<Url, HttpError> {
    let raw = format!(
        "{}/realms/{}/protocol/openid-connect/token",
        base_url.trim_end_matches('/'),
        realm
    );
    Url::parse(&raw).map_err(|source| HttpError::InvalidBaseUrl {
        url: raw,
        source,
    })
}
