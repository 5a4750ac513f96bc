use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::page::start_page;
use crate::args::{
    ControlArgs, DemoArgs, RecordsAction, RecordsArgs, SendAction, SendArgs, ServeArgs,
};
use crate::bridge::{LocalChannel, MessageChannel, WireChannel, run_bridge_server};
use crate::control::{ControlSurface, format_clock};
use crate::error::{AppError, AppResult, BridgeError, ValidationError};
use crate::looper::LooperTiming;
use crate::protocol::{Request, Response};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};
use crate::storage::{LoopStore, SqliteStore, StoredRecord, current_time_ms};
use crate::ui::run_control_ui;

pub(super) async fn run_serve(args: &ServeArgs, timing: LooperTiming) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_task = setup_signal_shutdown_handler(&shutdown_tx);

    let listener = TcpListener::bind(&args.listen).await.map_err(|err| {
        AppError::bridge(BridgeError::Bind {
            addr: args.listen.clone(),
            source: err,
        })
    })?;
    let runtime = start_page(&args.page, timing, &shutdown_tx).await?;

    let result = run_bridge_server(
        listener,
        runtime.looper.clone(),
        runtime.page.clone(),
        runtime.page.tab_sender(),
        &shutdown_tx,
    )
    .await;

    drop(shutdown_tx.send(()));
    runtime.join().await;
    signal_task.abort();
    info!("Serve stopped.");
    result
}

pub(super) async fn run_control(args: &ControlArgs, no_color: bool) -> AppResult<()> {
    let channel = WireChannel::connect(&args.connect, args.reply_timeout).await?;
    let surface = Arc::new(ControlSurface::new(Arc::new(channel)));

    let (shutdown_tx, _) = shutdown_channel();
    let signal_task = setup_signal_shutdown_handler(&shutdown_tx);
    let result = run_control_ui(surface, args.poll_interval, no_color, &shutdown_tx).await;
    drop(shutdown_tx.send(()));
    signal_task.abort();
    result
}

pub(super) async fn run_demo(
    args: &DemoArgs,
    timing: LooperTiming,
    no_color: bool,
) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_task = setup_signal_shutdown_handler(&shutdown_tx);
    let runtime = start_page(&args.page, timing, &shutdown_tx).await?;

    let channel = LocalChannel::new(
        runtime.looper.clone(),
        runtime.page.clone(),
        Some(runtime.page.tab_sender()),
    );
    let surface = Arc::new(ControlSurface::new(Arc::new(channel)));
    let result = run_control_ui(surface, args.poll_interval, no_color, &shutdown_tx).await;

    drop(shutdown_tx.send(()));
    runtime.join().await;
    signal_task.abort();
    result
}

fn send_request(action: SendAction) -> Request {
    match action {
        SendAction::Set { time } => Request::set_loop_time(f64::from(time)),
        SendAction::Current => Request::set_current_time(),
        SendAction::Disable => Request::disable_loop(),
        SendAction::Status => Request::get_status(),
        SendAction::Raw { action, time } => Request { action, time },
    }
}

/// Prints the reply as one JSON line. An error reply still prints, then
/// fails the command.
pub(super) async fn run_send(args: SendArgs) -> AppResult<()> {
    let channel = WireChannel::connect(&args.connect, args.reply_timeout).await?;
    let tab = channel.active_tab().await?;
    if !tab.is_watch_page() {
        warn!(
            "Active tab is not a watch page ({}); sending anyway.",
            tab.url.as_deref().unwrap_or("no address")
        );
    }
    let response = channel.send(send_request(args.action)).await?;
    println!("{}", serde_json::to_string(&response)?);
    match response {
        Response::Error(reply) => Err(AppError::bridge(BridgeError::Remote {
            message: reply.error,
        })),
        Response::Status(_) | Response::Ack { .. } => Ok(()),
    }
}

pub(super) async fn run_records(args: RecordsArgs) -> AppResult<()> {
    let store = SqliteStore::open(Path::new(&args.db)).await?;
    match args.action {
        RecordsAction::List { json } => {
            let records = store.list().await?;
            if json {
                for record in &records {
                    println!("{}", serde_json::to_string(record)?);
                }
            } else {
                print_table(&records);
            }
            Ok(())
        }
        RecordsAction::Prune {
            older_than,
            dry_run,
            force,
        } => {
            if !dry_run && !force {
                return Err(AppError::validation(ValidationError::PruneNeedsForce));
            }
            let cutoff = current_time_ms().saturating_sub(duration_ms(older_than));
            let removed = store.prune(cutoff, dry_run).await?;
            for video_id in &removed {
                println!("{}", video_id);
            }
            if dry_run {
                info!("Would remove {} loop record(s).", removed.len());
            } else {
                info!("Removed {} loop record(s).", removed.len());
            }
            Ok(())
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn print_table(records: &[StoredRecord]) {
    if records.is_empty() {
        println!("No loop records.");
        return;
    }
    println!("{:<16} {:>8} {:<7} UPDATED", "VIDEO", "LOOP", "ACTIVE");
    for stored in records {
        let updated = i64::try_from(stored.updated_at_ms)
            .ok()
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map_or_else(
                || stored.updated_at_ms.to_string(),
                |time| time.format("%Y-%m-%d %H:%M:%S").to_string(),
            );
        println!(
            "{:<16} {:>8} {:<7} {}",
            stored.video_id.as_str(),
            format_clock(stored.record.loop_start_seconds),
            if stored.record.is_active { "yes" } else { "no" },
            updated
        );
    }
}
