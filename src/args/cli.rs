use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::control::parse_timestamp;
use crate::host::sim::SimVideoSpec;

use super::defaults::{DEFAULT_LISTEN, default_db_path, default_log_path};
use super::parsers::{parse_bool_env, parse_duration_arg, parse_video_entry};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Segment looper for single-page video sites - restarts playback at a chosen timestamp, persists it per video, and ships a terminal control surface."
)]
pub struct LooperArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML/JSON). Defaults to ./ytloop.toml or ./ytloop.json if present.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by YTLOOP_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", global = true, env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the simulated watch page with its Looper and expose it over the bridge
    Serve(ServeArgs),
    /// Open the terminal control surface against a running `serve`
    Control(ControlArgs),
    /// Send a single command to a running `serve` and print the JSON reply
    Send(SendArgs),
    /// Run page, Looper and control surface in one process
    Demo(DemoArgs),
    /// Inspect or prune persisted loop records
    Records(RecordsArgs),
}

/// Simulated page options shared by `serve` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct PageArgs {
    /// Path to the SQLite loop store
    #[arg(long, default_value_t = default_db_path())]
    pub db: String,

    /// Keep loop records in memory only
    #[arg(long = "memory-store")]
    pub memory_store: bool,

    /// Playlist entry as <id>:<seconds> (repeatable)
    #[arg(long = "video", value_parser = parse_video_entry)]
    pub videos: Vec<SimVideoSpec>,

    /// Turn the site's autoplay on, so ended videos move to the next entry
    #[arg(long)]
    pub autoplay: bool,

    /// Simulated clock resolution (supports ms/s/m/h/d)
    #[arg(long, default_value = "250ms", value_parser = parse_duration_arg)]
    pub tick: Duration,

    /// How long an ended video waits before autoplay moves on (supports ms/s/m/h/d)
    #[arg(long = "autonav-delay", default_value = "3s", value_parser = parse_duration_arg)]
    pub autonav_delay: Duration,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address the bridge listens on
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ControlArgs {
    /// Bridge address of a running `serve`
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub connect: String,

    /// Status refresh interval (supports ms/s/m/h/d)
    #[arg(long = "poll-interval", default_value = "2s", value_parser = parse_duration_arg)]
    pub poll_interval: Duration,

    /// How long to wait for a bridge reply (supports ms/s/m/h/d)
    #[arg(long = "reply-timeout", default_value = "2s", value_parser = parse_duration_arg)]
    pub reply_timeout: Duration,

    /// Where logs go while the terminal UI is open
    #[arg(long = "log-file", default_value_t = default_log_path())]
    pub log_file: String,
}

#[derive(Debug, Args, Clone)]
pub struct SendArgs {
    /// Bridge address of a running `serve`
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub connect: String,

    /// How long to wait for the reply (supports ms/s/m/h/d)
    #[arg(long = "reply-timeout", default_value = "2s", value_parser = parse_duration_arg)]
    pub reply_timeout: Duration,

    #[command(subcommand)]
    pub action: SendAction,
}

#[derive(Debug, Subcommand, Clone)]
pub enum SendAction {
    /// Loop from a timestamp given as seconds (90) or minutes:seconds (1:30)
    Set {
        #[arg(value_parser = parse_timestamp)]
        time: u32,
    },
    /// Loop from the current playback position
    Current,
    /// Stop looping
    Disable,
    /// Print the Looper status
    Status,
    /// Send an arbitrary action, for probing the protocol
    Raw {
        action: String,
        #[arg(long, allow_negative_numbers = true)]
        time: Option<f64>,
    },
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Status refresh interval (supports ms/s/m/h/d)
    #[arg(long = "poll-interval", default_value = "2s", value_parser = parse_duration_arg)]
    pub poll_interval: Duration,

    /// Where logs go while the terminal UI is open
    #[arg(long = "log-file", default_value_t = default_log_path())]
    pub log_file: String,
}

#[derive(Debug, Args, Clone)]
pub struct RecordsArgs {
    /// Path to the SQLite loop store
    #[arg(long, default_value_t = default_db_path())]
    pub db: String,

    #[command(subcommand)]
    pub action: RecordsAction,
}

#[derive(Debug, Subcommand, Clone)]
pub enum RecordsAction {
    /// List stored loops, newest first
    List {
        /// Print JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Remove loops not updated for a while
    Prune {
        /// Age threshold (supports ms/s/m/h/d)
        #[arg(long = "older-than", value_parser = parse_duration_arg)]
        older_than: Duration,

        /// Show what would be removed without deleting anything
        #[arg(long = "dry-run")]
        dry_run: bool,

        /// Actually delete records
        #[arg(long)]
        force: bool,
    },
}
