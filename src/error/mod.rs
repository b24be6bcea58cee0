mod app;
mod auth;
mod config;
mod http;
mod metrics;
mod probe;
mod validation;

pub use app::{AppError, AppResult};
pub use auth::AuthError;
pub use config::ConfigError;
pub use http::HttpError;
pub use metrics::MetricsError;
pub use probe::ProbeError;
pub use validation::ValidationError;
