use std::time::Duration;

use clap::Parser;

use super::parsers::{parse_bool_env, parse_duration_arg, parse_video_entry};
use super::{Command, LooperArgs, RecordsAction, SendAction, default_playlist};
use crate::error::{AppError, AppResult, ValidationError};
use crate::test_support::same_seconds;

#[test]
fn serve_defaults() -> AppResult<()> {
    let args = LooperArgs::try_parse_from(["ytloop", "serve"])?;
    let Command::Serve(serve) = args.command else {
        return Err(AppError::validation("Expected serve"));
    };
    if serve.listen != "127.0.0.1:7878" {
        return Err(AppError::validation(format!("Unexpected listen {}", serve.listen)));
    }
    if !serve.page.db.ends_with("loops.sqlite3") || serve.page.memory_store {
        return Err(AppError::validation(format!("Unexpected storage {:?}", serve.page)));
    }
    if !serve.page.videos.is_empty() || serve.page.autoplay {
        return Err(AppError::validation("No playlist or autoplay by default"));
    }
    if serve.page.tick != Duration::from_millis(250) {
        return Err(AppError::validation("Unexpected tick"));
    }
    Ok(())
}

#[test]
fn global_flags_follow_subcommands() -> AppResult<()> {
    let args = LooperArgs::try_parse_from([
        "ytloop",
        "control",
        "--verbose",
        "--no-color",
        "--config",
        "custom.toml",
        "--poll-interval",
        "500ms",
    ])?;
    if !args.verbose || !args.no_color || args.config.as_deref() != Some("custom.toml") {
        return Err(AppError::validation(format!("Global flags lost: {:?}", args)));
    }
    let Command::Control(control) = args.command else {
        return Err(AppError::validation("Expected control"));
    };
    if control.poll_interval != Duration::from_millis(500)
        || control.reply_timeout != Duration::from_secs(2)
        || !control.log_file.ends_with("control.log")
    {
        return Err(AppError::validation(format!("Unexpected control {:?}", control)));
    }
    Ok(())
}

#[test]
fn serve_accepts_repeated_videos() -> AppResult<()> {
    let args = LooperArgs::try_parse_from([
        "ytloop",
        "serve",
        "--memory-store",
        "--autoplay",
        "--video",
        "abc:30",
        "--video",
        "def:45",
    ])?;
    let Command::Serve(serve) = args.command else {
        return Err(AppError::validation("Expected serve"));
    };
    let playlist: Vec<(&str, u64)> = serve
        .page
        .videos
        .iter()
        .map(|spec| (spec.id.as_str(), spec.duration.as_secs()))
        .collect();
    if playlist != [("abc", 30), ("def", 45)] || !serve.page.memory_store || !serve.page.autoplay {
        return Err(AppError::validation(format!("Unexpected serve {:?}", serve)));
    }
    Ok(())
}

#[test]
fn send_parses_timestamps() -> AppResult<()> {
    let args = LooperArgs::try_parse_from(["ytloop", "send", "set", "1:30"])?;
    let Command::Send(send) = args.command else {
        return Err(AppError::validation("Expected send"));
    };
    if !matches!(send.action, SendAction::Set { time: 90 }) {
        return Err(AppError::validation(format!(
            "Unexpected action {:?}",
            send.action
        )));
    }
    Ok(())
}

#[test]
fn send_rejects_out_of_range_seconds() -> AppResult<()> {
    if LooperArgs::try_parse_from(["ytloop", "send", "set", "1:75"]).is_ok() {
        return Err(AppError::validation("Expected 1:75 to be rejected"));
    }
    Ok(())
}

#[test]
fn send_raw_allows_negative_time() -> AppResult<()> {
    let args =
        LooperArgs::try_parse_from(["ytloop", "send", "raw", "setLoopTime", "--time", "-5"])?;
    let Command::Send(send) = args.command else {
        return Err(AppError::validation("Expected send"));
    };
    let SendAction::Raw { action, time } = &send.action else {
        return Err(AppError::validation(format!(
            "Unexpected action {:?}",
            send.action
        )));
    };
    if action != "setLoopTime" || !time.is_some_and(|value| same_seconds(value, -5.0)) {
        return Err(AppError::validation(format!(
            "Unexpected raw action {} {:?}",
            action, time
        )));
    }
    Ok(())
}

#[test]
fn records_prune_requires_age() -> AppResult<()> {
    if LooperArgs::try_parse_from(["ytloop", "records", "prune"]).is_ok() {
        return Err(AppError::validation("Expected --older-than to be required"));
    }
    let args = LooperArgs::try_parse_from([
        "ytloop",
        "records",
        "--db",
        "/tmp/x.sqlite3",
        "prune",
        "--older-than",
        "30d",
        "--dry-run",
    ])?;
    let Command::Records(records) = args.command else {
        return Err(AppError::validation("Expected records"));
    };
    let pruned_as_expected = matches!(
        records.action,
        RecordsAction::Prune {
            older_than,
            dry_run: true,
            force: false,
        } if older_than == Duration::from_secs(30 * 24 * 60 * 60)
    );
    if !pruned_as_expected || records.db != "/tmp/x.sqlite3" {
        return Err(AppError::validation(format!(
            "Unexpected records {:?}",
            records
        )));
    }
    Ok(())
}

#[test]
fn video_entries_need_id_and_seconds() -> AppResult<()> {
    let spec = parse_video_entry("abc:12")?;
    if spec.id.as_str() != "abc" || spec.duration != Duration::from_secs(12) {
        return Err(AppError::validation(format!("Unexpected spec {:?}", spec)));
    }
    for value in ["abc", ":12", "abc:", "abc:x", "abc:-1"] {
        if parse_video_entry(value).is_ok() {
            return Err(AppError::validation(format!("Expected '{}' to fail", value)));
        }
    }
    match parse_video_entry("abc:0") {
        Err(ValidationError::VideoDurationZero { .. }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected a zero-duration error, got {:?}",
            other
        ))),
    }
}

#[test]
fn bool_and_duration_parsers() -> AppResult<()> {
    for (value, expected) in [("1", true), ("YES", true), ("off", false), ("0", false)] {
        if parse_bool_env(value)? != expected {
            return Err(AppError::validation(format!("Unexpected bool for {}", value)));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err(AppError::validation("Expected maybe to fail"));
    }
    if parse_duration_arg("2m")? != Duration::from_secs(120) {
        return Err(AppError::validation("Unexpected duration"));
    }
    if parse_duration_arg("2 fortnights").is_ok() {
        return Err(AppError::validation("Expected unknown unit to fail"));
    }
    Ok(())
}

#[test]
fn built_in_playlist_is_valid() -> AppResult<()> {
    if default_playlist().len() != 2 {
        return Err(AppError::validation("Expected two built-in videos"));
    }
    Ok(())
}
