use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_duration_arg, parse_positive_u64, parse_positive_usize, parse_think_time,
};
use super::types::{PositiveU64, PositiveUsize, ResourceKind, TaskSet, ThinkTime};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async load tester for Keycloak-style admin REST APIs - per-user token refresh, CRUD probe sequences, conflict-tolerant classification, and per-endpoint latency stats."
)]
pub struct RunArgs {
    /// Base URL of the target server (e.g., http://localhost:8080)
    #[arg(long = "base-url", short = 'u')]
    pub base_url: Option<String>,

    /// Realm whose admin API is probed
    #[arg(long, default_value = "master")]
    pub realm: String,

    /// Username for the password-grant token request
    #[arg(long, env = "KCLOAD_USERNAME")]
    pub username: Option<String>,

    /// Password for the password-grant token request
    #[arg(long, env = "KCLOAD_PASSWORD")]
    pub password: Option<String>,

    /// Client id presented on the token request
    #[arg(long = "auth-client-id", default_value = "admin-cli")]
    pub auth_client_id: String,

    /// Optional confidential client secret for the token request
    #[arg(long = "auth-client-secret", env = "KCLOAD_CLIENT_SECRET")]
    pub auth_client_secret: Option<String>,

    /// Task set each virtual user runs
    #[arg(long = "task-set", default_value = "crud", ignore_case = true)]
    pub task_set: TaskSet,

    /// Resource kinds to probe (comma separated; defaults to all)
    #[arg(long, value_delimiter = ',')]
    pub resources: Vec<ResourceKind>,

    /// Number of virtual users
    #[arg(long, default_value = "10", value_parser = parse_positive_usize)]
    pub users: PositiveUsize,

    /// Virtual users started per spawn tick
    #[arg(long = "spawn-rate", default_value = "1", value_parser = parse_positive_usize)]
    pub spawn_rate: PositiveUsize,

    /// Spawn tick interval in milliseconds
    #[arg(long = "spawn-interval", default_value = "1000", value_parser = parse_positive_u64)]
    pub spawn_interval: PositiveU64,

    /// Duration of the run (seconds)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "30",
        value_parser = parse_positive_u64
    )]
    pub target_duration: PositiveU64,

    /// Stop after N completed task iterations (across all users)
    #[arg(long = "max-iterations", value_parser = parse_positive_u64)]
    pub max_iterations: Option<PositiveU64>,

    /// Pause between task iterations, min-max seconds
    #[arg(long = "think-time", default_value = "1-5", value_parser = parse_think_time)]
    pub think_time: ThinkTime,

    /// Identifiers pre-generated per batch cycle (batch task set only)
    #[arg(long = "batch-size", default_value = "5", value_parser = parse_positive_usize)]
    pub batch_size: PositiveUsize,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Accept invalid TLS certificates and hostnames
    #[arg(long)]
    pub insecure: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by KCLOAD_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./kcload.toml or ./kcload.json if present.
    #[arg(long)]
    pub config: Option<String>,
}
