use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, RunArgs};
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. CLI-provided values win.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut RunArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "base_url")
        && let Some(base_url) = config.base_url.clone()
    {
        args.base_url = Some(base_url);
    }

    if !is_cli(matches, "realm")
        && let Some(realm) = config.realm.clone()
    {
        args.realm = realm;
    }

    if !is_cli(matches, "username")
        && let Some(username) = config.username.clone()
    {
        args.username = Some(username);
    }

    if !is_cli(matches, "password")
        && let Some(password) = config.password.clone()
    {
        args.password = Some(password);
    }

    if !is_cli(matches, "auth_client_id")
        && let Some(client_id) = config.auth_client_id.clone()
    {
        args.auth_client_id = client_id;
    }

    if !is_cli(matches, "auth_client_secret")
        && let Some(client_secret) = config.auth_client_secret.clone()
    {
        args.auth_client_secret = Some(client_secret);
    }

    if !is_cli(matches, "task_set")
        && let Some(task_set) = config.task_set
    {
        args.task_set = task_set;
    }

    if !is_cli(matches, "resources")
        && let Some(resources) = config.resources.clone()
    {
        args.resources = resources;
    }

    if !is_cli(matches, "users")
        && let Some(users) = config.users
    {
        args.users = ensure_positive_usize(users, "users")?;
    }

    if !is_cli(matches, "spawn_rate")
        && let Some(spawn_rate) = config.spawn_rate
    {
        args.spawn_rate = ensure_positive_usize(spawn_rate, "spawn_rate")?;
    }

    if !is_cli(matches, "spawn_interval")
        && let Some(spawn_interval) = config.spawn_interval
    {
        args.spawn_interval = ensure_positive_u64(spawn_interval, "spawn_interval")?;
    }

    if !is_cli(matches, "target_duration")
        && let Some(duration) = config.duration
    {
        args.target_duration = ensure_positive_u64(duration, "duration")?;
    }

    if !is_cli(matches, "max_iterations")
        && let Some(max_iterations) = config.max_iterations
    {
        args.max_iterations = Some(ensure_positive_u64(max_iterations, "max_iterations")?);
    }

    if !is_cli(matches, "think_time")
        && let Some(think_time) = config.think_time
    {
        args.think_time = think_time;
    }

    if !is_cli(matches, "batch_size")
        && let Some(batch_size) = config.batch_size
    {
        args.batch_size = ensure_positive_usize(batch_size, "batch_size")?;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration().map_err(|message| {
            ConfigError::InvalidValue {
                field: "timeout",
                message,
            }
        })?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(connect_timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = connect_timeout.to_duration().map_err(|message| {
            ConfigError::InvalidValue {
                field: "connect_timeout",
                message,
            }
        })?;
    }

    if !is_cli(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &'static str) -> Result<PositiveU64, ConfigError> {
    PositiveU64::try_from(value).map_err(|err| ConfigError::InvalidValue {
        field,
        message: err.to_string(),
    })
}

fn ensure_positive_usize(value: usize, field: &'static str) -> Result<PositiveUsize, ConfigError> {
    PositiveUsize::try_from(value).map_err(|err| ConfigError::InvalidValue {
        field,
        message: err.to_string(),
    })
}
