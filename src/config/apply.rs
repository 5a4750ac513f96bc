use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::parse_video_entry;
use crate::args::{Command, LooperArgs, PageArgs};
use crate::error::{AppError, AppResult, ConfigError};
use crate::looper::LooperTiming;
use crate::retry::RetryPolicy;

use super::types::{ConfigFile, DurationValue, LooperConfig};

/// Applies configuration values to CLI arguments. Values given on the
/// command line win over the file; the file wins over built-in defaults.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut LooperArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    let Some((_, sub)) = matches.subcommand() else {
        return Ok(());
    };
    match &mut args.command {
        Command::Serve(serve) => {
            if let Some(section) = config.serve.as_ref()
                && !is_cli(sub, "listen")
                && let Some(listen) = section.listen.as_ref()
            {
                listen.parse::<SocketAddr>().map_err(|err| {
                    AppError::config(ConfigError::InvalidListen {
                        value: listen.clone(),
                        source: err,
                    })
                })?;
                serve.listen = listen.clone();
            }
            apply_page(&mut serve.page, sub, config)?;
        }
        Command::Demo(demo) => {
            apply_page(&mut demo.page, sub, config)?;
            if let Some(section) = config.control.as_ref() {
                if !is_cli(sub, "poll_interval")
                    && let Some(value) = section.poll_interval.as_ref()
                {
                    demo.poll_interval = to_duration(value)?;
                }
                if !is_cli(sub, "log_file")
                    && let Some(path) = section.log_file.as_ref()
                {
                    demo.log_file = path.clone();
                }
            }
        }
        Command::Control(control) => {
            if let Some(section) = config.control.as_ref() {
                if !is_cli(sub, "connect")
                    && let Some(connect) = section.connect.as_ref()
                {
                    control.connect = connect.clone();
                }
                if !is_cli(sub, "poll_interval")
                    && let Some(value) = section.poll_interval.as_ref()
                {
                    control.poll_interval = to_duration(value)?;
                }
                if !is_cli(sub, "reply_timeout")
                    && let Some(value) = section.reply_timeout.as_ref()
                {
                    control.reply_timeout = to_duration(value)?;
                }
                if !is_cli(sub, "log_file")
                    && let Some(path) = section.log_file.as_ref()
                {
                    control.log_file = path.clone();
                }
            }
        }
        Command::Send(send) => {
            if let Some(section) = config.control.as_ref() {
                if !is_cli(sub, "connect")
                    && let Some(connect) = section.connect.as_ref()
                {
                    send.connect = connect.clone();
                }
                if !is_cli(sub, "reply_timeout")
                    && let Some(value) = section.reply_timeout.as_ref()
                {
                    send.reply_timeout = to_duration(value)?;
                }
            }
        }
        Command::Records(records) => {
            if !is_cli(sub, "db")
                && let Some(db) = config.storage.as_ref().and_then(|s| s.db.as_ref())
            {
                records.db = db.clone();
            }
        }
    }
    Ok(())
}

fn apply_page(page: &mut PageArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if let Some(storage) = config.storage.as_ref() {
        if !is_cli(matches, "db")
            && let Some(db) = storage.db.as_ref()
        {
            page.db = db.clone();
        }
        if !is_cli(matches, "memory_store")
            && let Some(memory) = storage.memory
        {
            page.memory_store = memory;
        }
    }

    let Some(serve) = config.serve.as_ref() else {
        return Ok(());
    };
    if !is_cli(matches, "autoplay")
        && let Some(autoplay) = serve.autoplay
    {
        page.autoplay = autoplay;
    }
    if !is_cli(matches, "videos")
        && let Some(videos) = serve.videos.as_ref()
    {
        let mut parsed = Vec::with_capacity(videos.len());
        for entry in videos {
            parsed.push(parse_video_entry(entry)?);
        }
        page.videos = parsed;
    }
    if !is_cli(matches, "tick")
        && let Some(value) = serve.tick.as_ref()
    {
        page.tick = to_duration(value)?;
    }
    if !is_cli(matches, "autonav_delay")
        && let Some(value) = serve.autonav_delay.as_ref()
    {
        page.autonav_delay = to_duration(value)?;
    }
    Ok(())
}

/// Builds Looper timing from the `[looper]` section over the defaults.
///
/// # Errors
///
/// Returns an error when a duration is invalid or an attempt budget is zero.
pub fn looper_timing(section: Option<&LooperConfig>) -> AppResult<LooperTiming> {
    let mut timing = LooperTiming::default();
    let Some(section) = section else {
        return Ok(timing);
    };

    timing.search = retry_policy(
        timing.search,
        section.search_attempts,
        section.search_interval.as_ref(),
        "looper.search_attempts",
    )?;
    timing.resume = retry_policy(
        timing.resume,
        section.resume_attempts,
        section.resume_delay.as_ref(),
        "looper.resume_attempts",
    )?;
    if let Some(value) = section.settle_delay.as_ref() {
        timing.settle_delay = to_duration(value)?;
    }
    if let Some(value) = section.restart_margin.as_ref() {
        timing.restart_margin = to_duration(value)?;
    }
    if let Some(value) = section.ended_restart_delay.as_ref() {
        timing.ended_restart_delay = to_duration(value)?;
    }
    Ok(timing)
}

fn retry_policy(
    base: RetryPolicy,
    attempts: Option<u32>,
    delay: Option<&DurationValue>,
    field: &'static str,
) -> AppResult<RetryPolicy> {
    let max_attempts = match attempts {
        Some(value) => NonZeroU32::new(value)
            .ok_or_else(|| AppError::config(ConfigError::FieldMustBePositive { field }))?,
        None => NonZeroU32::new(base.max_attempts()).unwrap_or(NonZeroU32::MIN),
    };
    let delay = match delay {
        Some(value) => to_duration(value)?,
        None => base.delay(),
    };
    Ok(RetryPolicy::new(max_attempts, delay))
}

fn to_duration(value: &DurationValue) -> AppResult<Duration> {
    value.to_duration().map_err(AppError::config)
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
