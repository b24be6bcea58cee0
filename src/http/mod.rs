//! HTTP client construction and the virtual-user worker pool.
mod client;
mod worker;


pub use client::{admin_base_url, build_client, token_endpoint_url};
pub use worker::{ProbePlan, setup_probe_workers};
