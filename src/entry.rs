use std::ffi::OsString;
use std::path::Path;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app;
use crate::args::{RunArgs, TaskSet};
use crate::error::{AppError, AppResult, ValidationError};

/// Default config filenames checked when no CLI args are provided.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["kcload.toml", "kcload.json"];

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    apply_config(&mut args, &matches)?;
    validate(&args, &matches)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<(RunArgs, ArgMatches)>> {
    let mut cmd = RunArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = RunArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn apply_config(args: &mut RunArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config).map_err(AppError::config)?;
    }
    Ok(())
}

fn validate(args: &RunArgs, matches: &ArgMatches) -> AppResult<()> {
    if args.base_url.is_none() {
        tracing::error!("Missing base URL (set --base-url or provide in config).");
        return Err(AppError::validation(ValidationError::MissingBaseUrl));
    }
    if args.username.is_none() {
        return Err(AppError::validation(ValidationError::MissingUsername));
    }
    if args.password.is_none() {
        return Err(AppError::validation(ValidationError::MissingPassword));
    }
    if args.task_set != TaskSet::Batch
        && matches.value_source("batch_size") == Some(ValueSource::CommandLine)
    {
        tracing::warn!("--batch-size is ignored unless --task-set batch.");
    }
    Ok(())
}

async fn run_async(args: RunArgs) -> AppResult<()> {
    let outcome = app::run_local(args).await?;
    if !outcome.runtime_errors.is_empty() {
        app::print_runtime_errors(&outcome.runtime_errors);
        return Err(AppError::validation(ValidationError::RuntimeErrors));
    }
    Ok(())
}
