use clap::Parser;

use super::parsers::parse_duration_arg;
use super::*;

#[test]
fn think_time_parses_range() -> Result<(), String> {
    let think_time: ThinkTime = "1-5"
        .parse()
        .map_err(|err| format!("parse failed: {}", err))?;
    if think_time.min_secs() != 1 || think_time.max_secs() != 5 {
        return Err(format!("Unexpected range: {}", think_time));
    }
    Ok(())
}

#[test]
fn think_time_rejects_reversed_range() -> Result<(), String> {
    if "5-1".parse::<ThinkTime>().is_ok() {
        return Err("Expected error for reversed range".to_owned());
    }
    Ok(())
}

#[test]
fn think_time_rejects_missing_separator() -> Result<(), String> {
    if "5".parse::<ThinkTime>().is_ok() {
        return Err("Expected error for missing separator".to_owned());
    }
    Ok(())
}

#[test]
fn think_time_zero_range_disables_pause() -> Result<(), String> {
    let think_time: ThinkTime = "0-0"
        .parse()
        .map_err(|err| format!("parse failed: {}", err))?;
    let mut rng = rand::thread_rng();
    if !think_time.sample(&mut rng).is_zero() {
        return Err("Expected zero pause".to_owned());
    }
    Ok(())
}

#[test]
fn think_time_sample_stays_in_range() -> Result<(), String> {
    let think_time: ThinkTime = "1-5"
        .parse()
        .map_err(|err| format!("parse failed: {}", err))?;
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let secs = think_time.sample(&mut rng).as_secs();
        if !(1..=5).contains(&secs) {
            return Err(format!("Sample out of range: {}", secs));
        }
    }
    Ok(())
}

#[test]
fn positive_u64_rejects_zero() -> Result<(), String> {
    if PositiveU64::try_from(0).is_ok() {
        return Err("Expected error for zero".to_owned());
    }
    Ok(())
}

#[test]
fn positive_usize_parses() -> Result<(), String> {
    let value: PositiveUsize = "7"
        .parse()
        .map_err(|err| format!("parse failed: {}", err))?;
    if value.get() != 7 {
        return Err(format!("Unexpected value: {}", value.get()));
    }
    Ok(())
}

#[test]
fn duration_arg_supports_units() -> Result<(), String> {
    let cases = [("500ms", 500u128), ("2s", 2_000), ("3m", 180_000), ("1h", 3_600_000)];
    for (input, expected_ms) in cases {
        let duration = parse_duration_arg(input).map_err(|err| format!("{}: {}", input, err))?;
        if duration.as_millis() != expected_ms {
            return Err(format!(
                "{}: expected {}ms, got {}ms",
                input,
                expected_ms,
                duration.as_millis()
            ));
        }
    }
    Ok(())
}

#[test]
fn duration_arg_defaults_to_seconds() -> Result<(), String> {
    let duration = parse_duration_arg("15").map_err(|err| format!("parse failed: {}", err))?;
    if duration.as_secs() != 15 {
        return Err(format!("Unexpected duration: {:?}", duration));
    }
    Ok(())
}

#[test]
fn duration_arg_rejects_zero_and_garbage() -> Result<(), String> {
    for input in ["0s", "", "fast", "5d"] {
        if parse_duration_arg(input).is_ok() {
            return Err(format!("Expected error for '{}'", input));
        }
    }
    Ok(())
}

#[test]
fn cli_parses_resource_list() -> Result<(), String> {
    let args = RunArgs::try_parse_from([
        "kcload",
        "--base-url",
        "http://localhost:8080",
        "--username",
        "admin",
        "--password",
        "secret",
        "--resources",
        "users,roles,client-scopes",
    ])
    .map_err(|err| format!("parse failed: {}", err))?;
    if args.resources
        != vec![
            ResourceKind::Users,
            ResourceKind::Roles,
            ResourceKind::ClientScopes,
        ]
    {
        return Err(format!("Unexpected resources: {:?}", args.resources));
    }
    Ok(())
}

#[test]
fn cli_defaults_match_documented_values() -> Result<(), String> {
    let args = RunArgs::try_parse_from(["kcload", "--base-url", "http://localhost:8080"])
        .map_err(|err| format!("parse failed: {}", err))?;
    if args.realm != "master" {
        return Err(format!("Unexpected realm: {}", args.realm));
    }
    if args.auth_client_id != "admin-cli" {
        return Err(format!("Unexpected client id: {}", args.auth_client_id));
    }
    if args.task_set != TaskSet::Crud {
        return Err("Expected crud task set".to_owned());
    }
    if args.users.get() != 10 || args.batch_size.get() != 5 {
        return Err("Unexpected pool defaults".to_owned());
    }
    if args.think_time.min_secs() != 1 || args.think_time.max_secs() != 5 {
        return Err(format!("Unexpected think time: {}", args.think_time));
    }
    Ok(())
}

#[test]
fn cli_rejects_unknown_task_set() -> Result<(), String> {
    if RunArgs::try_parse_from(["kcload", "--task-set", "stampede"]).is_ok() {
        return Err("Expected error for unknown task set".to_owned());
    }
    Ok(())
}
