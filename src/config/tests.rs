use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};
use tempfile::tempdir;

use super::types::{ConfigFile, DurationValue, LooperConfig};
use super::{apply_config, load_config_file, looper_timing, parse_duration_value};
use crate::args::{Command, LooperArgs};
use crate::error::{AppError, AppResult, ConfigError};
use crate::looper::LooperTiming;

fn parse_with_config(argv: &[&str], config: &ConfigFile) -> AppResult<LooperArgs> {
    let matches = LooperArgs::command().try_get_matches_from(argv.iter().copied())?;
    let mut args = LooperArgs::from_arg_matches(&matches)?;
    apply_config(&mut args, &matches, config)?;
    Ok(args)
}

fn write_config(name: &str, content: &str) -> AppResult<(tempfile::TempDir, ConfigFile)> {
    let dir = tempdir()?;
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    let config = load_config_file(&path)?;
    Ok((dir, config))
}

#[test]
fn parse_toml_config_sections() -> AppResult<()> {
    let (_dir, config) = write_config(
        "ytloop.toml",
        r#"
[looper]
search_interval = "500ms"
search_attempts = 20
restart_margin = "1s"

[control]
connect = "127.0.0.1:9000"
poll_interval = 5

[storage]
memory = true

[serve]
listen = "127.0.0.1:9000"
videos = ["abc:30", "def:45"]
"#,
    )?;
    let control = config
        .control
        .as_ref()
        .ok_or_else(|| AppError::validation("Expected a control section"))?;
    if control.connect.as_deref() != Some("127.0.0.1:9000") {
        return Err(AppError::validation("Unexpected connect address"));
    }
    let timing = looper_timing(config.looper.as_ref())?;
    if timing.search.delay() != Duration::from_millis(500)
        || timing.search.max_attempts() != 20
        || timing.restart_margin != Duration::from_secs(1)
    {
        return Err(AppError::validation(format!("Unexpected timing {:?}", timing)));
    }
    if timing.resume != LooperTiming::default().resume {
        return Err(AppError::validation("Unset values keep their defaults"));
    }
    Ok(())
}

#[test]
fn parse_json_config_sections() -> AppResult<()> {
    let (_dir, config) = write_config(
        "ytloop.json",
        r#"{
  "storage": { "db": "/tmp/loops.sqlite3" },
  "serve": { "autoplay": true, "tick": "100ms" }
}"#,
    )?;
    let serve = config
        .serve
        .as_ref()
        .ok_or_else(|| AppError::validation("Expected a serve section"))?;
    if serve.autoplay != Some(true) {
        return Err(AppError::validation("Expected autoplay"));
    }
    if config.storage.and_then(|storage| storage.db).as_deref() != Some("/tmp/loops.sqlite3") {
        return Err(AppError::validation("Unexpected db path"));
    }
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("ytloop.toml");
    std::fs::write(&path, "[looper]\nsearch_everywhere = true\n")?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::ParseToml { .. })) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected a TOML error, got {:?}",
            other.map(|_config| ())
        ))),
    }
}

#[test]
fn unsupported_extension_is_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("ytloop.yaml");
    std::fs::write(&path, "looper: {}")?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected an extension error, got {:?}",
            other.map(|_config| ())
        ))),
    }
}

#[test]
fn duration_values_accept_units() -> AppResult<()> {
    for (text, expected) in [
        ("250ms", Duration::from_millis(250)),
        ("3", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
        ("7d", Duration::from_secs(604_800)),
    ] {
        let parsed = parse_duration_value(text)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Expected {:?} for {}, got {:?}",
                expected, text, parsed
            )));
        }
    }
    for text in ["", "ms", "0s", "5w", "-1s"] {
        if parse_duration_value(text).is_ok() {
            return Err(AppError::validation(format!("Expected '{}' to fail", text)));
        }
    }
    if DurationValue::Seconds(0).to_duration().is_ok() {
        return Err(AppError::validation("Zero seconds must fail"));
    }
    Ok(())
}

#[test]
fn zero_attempts_are_rejected() -> AppResult<()> {
    let section = LooperConfig {
        resume_attempts: Some(0),
        ..LooperConfig::default()
    };
    match looper_timing(Some(&section)) {
        Err(AppError::Config(ConfigError::FieldMustBePositive { field })) => {
            if field != "looper.resume_attempts" {
                return Err(AppError::validation(format!("Unexpected field {}", field)));
            }
            Ok(())
        }
        other => Err(AppError::validation(format!(
            "Expected a positive-field error, got {:?}",
            other
        ))),
    }
}

#[test]
fn config_fills_unset_cli_values() -> AppResult<()> {
    let (_dir, config) = write_config(
        "ytloop.toml",
        r#"
[storage]
memory = true

[serve]
listen = "127.0.0.1:9100"
autoplay = true
videos = ["abc:30"]
"#,
    )?;
    let args = parse_with_config(&["ytloop", "serve"], &config)?;
    let Command::Serve(serve) = args.command else {
        return Err(AppError::validation("Expected serve"));
    };
    if serve.listen != "127.0.0.1:9100" || !serve.page.memory_store || !serve.page.autoplay {
        return Err(AppError::validation(format!("Config not applied: {:?}", serve)));
    }
    let ids: Vec<&str> = serve.page.videos.iter().map(|spec| spec.id.as_str()).collect();
    if ids != ["abc"] {
        return Err(AppError::validation(format!("Unexpected playlist {:?}", ids)));
    }
    Ok(())
}

#[test]
fn cli_values_win_over_config() -> AppResult<()> {
    let (_dir, config) = write_config(
        "ytloop.toml",
        r#"
[control]
connect = "127.0.0.1:9100"
poll_interval = "10s"
"#,
    )?;
    let args = parse_with_config(
        &["ytloop", "control", "--connect", "127.0.0.1:9200"],
        &config,
    )?;
    let Command::Control(control) = args.command else {
        return Err(AppError::validation("Expected control"));
    };
    if control.connect != "127.0.0.1:9200" {
        return Err(AppError::validation("The CLI address must win"));
    }
    if control.poll_interval != Duration::from_secs(10) {
        return Err(AppError::validation("The file poll interval must apply"));
    }
    Ok(())
}

#[test]
fn invalid_listen_in_config_is_rejected() -> AppResult<()> {
    let (_dir, config) = write_config("ytloop.toml", "[serve]\nlisten = \"nowhere\"\n")?;
    match parse_with_config(&["ytloop", "serve"], &config) {
        Err(AppError::Config(ConfigError::InvalidListen { .. })) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected a listen error, got {:?}",
            other.map(|_args| ())
        ))),
    }
}
