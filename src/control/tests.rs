use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, watch};

use super::{
    ActionOutcome, ControlAction, ControlSurface, LoopTone, StatusView, TimeInput, format_clock,
    parse_timestamp, spawn_status_poller,
};
use crate::bridge::MessageChannel;
use crate::error::{AppError, AppResult, BridgeError, TimeFieldKind, ValidationError};
use crate::protocol::{Request, Response, StatusReport, TabInfo};
use crate::shutdown_handlers::shutdown_channel;
use crate::test_support::run_async_test;

const WATCH: &str = "https://www.youtube.com/watch?v=abc";

/// Scripted broker: a fixed tab, a fixed reply and a log of sent requests.
struct ScriptedChannel {
    tab: Option<String>,
    reply: Option<Response>,
    sent: Mutex<Vec<Request>>,
    tab_tx: broadcast::Sender<TabInfo>,
}

impl ScriptedChannel {
    fn new(tab: Option<&str>, reply: Option<Response>) -> Arc<Self> {
        let (tab_tx, _) = broadcast::channel(4);
        Arc::new(Self {
            tab: tab.map(str::to_owned),
            reply,
            sent: Mutex::new(Vec::new()),
            tab_tx,
        })
    }

    fn sent(&self) -> Vec<Request> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MessageChannel for ScriptedChannel {
    async fn active_tab(&self) -> AppResult<TabInfo> {
        Ok(TabInfo::new(self.tab.clone()))
    }

    async fn send(&self, request: Request) -> AppResult<Response> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.reply
            .clone()
            .ok_or_else(|| AppError::bridge(BridgeError::ConnectionClosed))
    }

    fn tab_events(&self) -> Option<broadcast::Receiver<TabInfo>> {
        Some(self.tab_tx.subscribe())
    }
}

fn status(is_active: bool, loop_time: f64, current_time: u64) -> Response {
    Response::Status(StatusReport {
        is_active,
        loop_time,
        current_time,
        video_id: Some("abc".to_owned()),
    })
}

#[test]
fn time_input_rejects_non_digits_and_clamps() -> AppResult<()> {
    let mut minutes = TimeInput::minutes();
    for ch in ['1', 'x', '2', '-', '3', '4'] {
        minutes.push(ch);
    }
    if minutes.value() != 999 {
        return Err(AppError::validation(format!(
            "Expected minutes clamped to 999, got {}",
            minutes.text()
        )));
    }
    let mut seconds = TimeInput::seconds();
    if seconds.push('a') {
        return Err(AppError::validation("Letters must be rejected"));
    }
    seconds.push('7');
    seconds.push('5');
    if seconds.value() != 59 {
        return Err(AppError::validation(format!(
            "Expected seconds clamped to 59, got {}",
            seconds.text()
        )));
    }
    seconds.backspace();
    seconds.backspace();
    if seconds.value() != 0 || !seconds.text().is_empty() {
        return Err(AppError::validation("Empty field counts as zero"));
    }
    Ok(())
}

#[test]
fn seconds_blur_pads_to_two_digits() -> AppResult<()> {
    let mut seconds = TimeInput::seconds();
    seconds.push('5');
    seconds.blur();
    if seconds.text() != "05" {
        return Err(AppError::validation(format!(
            "Expected 05, got {}",
            seconds.text()
        )));
    }
    let mut empty = TimeInput::seconds();
    empty.blur();
    if empty.text() != "00" {
        return Err(AppError::validation(format!("Expected 00, got {}", empty.text())));
    }
    let mut minutes = TimeInput::minutes();
    minutes.set_text("7a");
    minutes.blur();
    if minutes.text() != "7" {
        return Err(AppError::validation(format!(
            "Minutes are not padded, got {}",
            minutes.text()
        )));
    }
    Ok(())
}

#[test]
fn parse_timestamp_accepts_both_forms() -> AppResult<()> {
    for (text, expected) in [("90", 90), ("1:30", 90), ("0:05", 5), ("999:59", 59_999)] {
        let parsed = parse_timestamp(text).map_err(AppError::validation)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Expected {} for {}, got {}",
                expected, text, parsed
            )));
        }
    }
    for text in ["", "abc", "1:", ":30", "-5", "1.5", "1:2:3"] {
        if parse_timestamp(text).is_ok() {
            return Err(AppError::validation(format!("Expected '{}' to fail", text)));
        }
    }
    match parse_timestamp("1:75") {
        Err(ValidationError::TimestampOutOfRange {
            field: TimeFieldKind::Seconds,
            ..
        }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected seconds out of range, got {:?}",
            other
        ))),
    }
}

#[test]
fn clock_format_matches_status_lines() -> AppResult<()> {
    for (seconds, expected) in [(0.0, "0:00"), (65.9, "1:05"), (600.0, "10:00"), (-3.0, "0:00")] {
        if format_clock(seconds) != expected {
            return Err(AppError::validation(format!(
                "Expected {} for {}, got {}",
                expected,
                seconds,
                format_clock(seconds)
            )));
        }
    }
    Ok(())
}

#[test]
fn status_view_lines() -> AppResult<()> {
    let Response::Status(active) = status(true, 90.0, 42) else {
        return Err(AppError::validation("Expected status"));
    };
    let view = StatusView::from_status(&active);
    if view.video_line != "Current time: 0:42"
        || view.loop_line != "Loop active: 1:30"
        || view.tone != LoopTone::Active
        || !view.controls_enabled
    {
        return Err(AppError::validation(format!("Unexpected view {:?}", view)));
    }
    let Response::Status(inactive) = status(false, 90.0, 0) else {
        return Err(AppError::validation("Expected status"));
    };
    if StatusView::from_status(&inactive).loop_line != "Loop inactive" {
        return Err(AppError::validation("Expected inactive line"));
    }
    Ok(())
}

#[test]
fn off_watch_page_sends_nothing() -> AppResult<()> {
    run_async_test(async {
        let channel = ScriptedChannel::new(Some("https://www.youtube.com/"), Some(Response::ok()));
        let surface = ControlSurface::new(channel.clone());
        let view = surface.refresh().await;
        if view != StatusView::not_watch_page() {
            return Err(AppError::validation(format!("Unexpected view {:?}", view)));
        }
        let outcome = surface.perform(ControlAction::Disable).await;
        if !matches!(outcome, ActionOutcome::Blocked(_)) {
            return Err(AppError::validation(format!(
                "Expected blocked outcome, got {:?}",
                outcome
            )));
        }
        if !channel.sent().is_empty() {
            return Err(AppError::validation("No command may be sent off a watch page"));
        }
        Ok(())
    })
}

#[test]
fn set_loop_sends_total_seconds() -> AppResult<()> {
    run_async_test(async {
        let channel = ScriptedChannel::new(Some(WATCH), Some(Response::ok()));
        let surface = ControlSurface::new(channel.clone());
        let outcome = surface
            .perform(ControlAction::SetLoop {
                minutes: 2,
                seconds: 5,
            })
            .await;
        if outcome != ActionOutcome::Sent {
            return Err(AppError::validation(format!("Unexpected outcome {:?}", outcome)));
        }
        if channel.sent() != vec![Request::set_loop_time(125.0)] {
            return Err(AppError::validation(format!(
                "Unexpected requests {:?}",
                channel.sent()
            )));
        }
        Ok(())
    })
}

#[test]
fn failed_command_raises_alert() -> AppResult<()> {
    run_async_test(async {
        let channel =
            ScriptedChannel::new(Some(WATCH), Some(Response::error("Unrecognized action")));
        let surface = ControlSurface::new(channel);
        let outcome = surface.perform(ControlAction::UseCurrent).await;
        if !matches!(&outcome, ActionOutcome::Alert(message) if message.contains("Unrecognized action"))
        {
            return Err(AppError::validation(format!("Expected alert, got {:?}", outcome)));
        }
        Ok(())
    })
}

#[test]
fn unreachable_status_disables_controls() -> AppResult<()> {
    run_async_test(async {
        let channel = ScriptedChannel::new(Some(WATCH), None);
        let surface = ControlSurface::new(channel);
        let view = surface.refresh().await;
        if view.video_line != "Could not reach the video" || view.controls_enabled {
            return Err(AppError::validation(format!("Unexpected view {:?}", view)));
        }
        if view.loop_line.is_empty() {
            return Err(AppError::validation("Expected the error detail"));
        }
        Ok(())
    })
}

#[test]
fn poller_refreshes_on_start_and_on_request() -> AppResult<()> {
    run_async_test(async {
        let channel = ScriptedChannel::new(Some(WATCH), Some(status(true, 30.0, 3)));
        let surface = Arc::new(ControlSurface::new(channel.clone()));
        let (view_tx, mut view_rx) = watch::channel(StatusView::connecting());
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, _) = shutdown_channel();
        let handle = spawn_status_poller(
            surface,
            Duration::from_secs(60),
            view_tx,
            refresh_rx,
            &shutdown_tx,
        );

        tokio::time::timeout(Duration::from_secs(2), view_rx.changed())
            .await
            .map_err(|_elapsed| AppError::validation("Timed out waiting for first refresh"))?
            .map_err(|err| AppError::validation(format!("Watch closed: {}", err)))?;
        if view_rx.borrow().loop_line != "Loop active: 0:30" {
            return Err(AppError::validation(format!(
                "Unexpected view {:?}",
                *view_rx.borrow()
            )));
        }

        refresh_tx
            .send(Duration::from_millis(10))
            .map_err(|_closed| AppError::validation("Poller stopped early"))?;
        tokio::time::timeout(Duration::from_secs(2), view_rx.changed())
            .await
            .map_err(|_elapsed| AppError::validation("Timed out waiting for refresh"))?
            .map_err(|err| AppError::validation(format!("Watch closed: {}", err)))?;
        if channel.sent().len() < 2 {
            return Err(AppError::validation("Expected a second status query"));
        }

        drop(shutdown_tx.send(()));
        handle.await?;
        Ok(())
    })
}
