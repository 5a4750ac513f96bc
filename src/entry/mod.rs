mod commands;
mod page;

use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{Command, LooperArgs};
use crate::config::{apply_config, load_config, looper_timing};
use crate::error::AppResult;
use crate::looper::LooperTiming;
use crate::system::logger::{init_file_logging, init_logging};

/// Parses the command line, merges the config file and runs the chosen
/// subcommand to completion.
///
/// # Errors
///
/// Returns an error when configuration is invalid or the subcommand fails.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    let timing = resolve_config(&mut args, &matches)?;

    match &args.command {
        Command::Control(control) => init_file_logging(args.verbose, Path::new(&control.log_file))?,
        Command::Demo(demo) => init_file_logging(args.verbose, Path::new(&demo.log_file))?,
        Command::Serve(_) | Command::Send(_) | Command::Records(_) => {
            init_logging(args.verbose, args.no_color);
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, timing))
}

fn parse_args() -> AppResult<(LooperArgs, ArgMatches)> {
    let cmd = LooperArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();
    let matches = cmd.get_matches_from(raw_args);
    let args = LooperArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn resolve_config(args: &mut LooperArgs, matches: &ArgMatches) -> AppResult<LooperTiming> {
    let config = load_config(args.config.as_deref())?;
    if let Some(config) = config.as_ref() {
        apply_config(args, matches, config)?;
    }
    looper_timing(config.as_ref().and_then(|config| config.looper.as_ref()))
}

async fn run_async(args: LooperArgs, timing: LooperTiming) -> AppResult<()> {
    match args.command {
        Command::Serve(serve) => commands::run_serve(&serve, timing).await,
        Command::Control(control) => commands::run_control(&control, args.no_color).await,
        Command::Send(send) => commands::run_send(send).await,
        Command::Demo(demo) => commands::run_demo(&demo, timing, args.no_color).await,
        Command::Records(records) => commands::run_records(records).await,
    }
}
