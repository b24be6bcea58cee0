//! Password-grant session drivers: token acquisition, expiry tracking, and
//! on-demand refresh.
mod session;
mod token;

#[cfg(test)]
mod tests;

pub use session::{AuthSettings, SessionDriver, unix_now_secs};
pub use token::{Credential, DEFAULT_EXPIRES_IN_SECS, EXPIRY_SAFETY_MARGIN_SECS, TokenResponse};
