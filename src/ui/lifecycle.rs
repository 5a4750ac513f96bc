use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::{broadcast, mpsc, watch};

use crate::control::{
    ActionOutcome, ControlSurface, REFRESH_AFTER_ACTION, StatusView, spawn_status_poller,
};
use crate::error::AppResult;
use crate::shutdown::ShutdownSender;

use super::model::{ControlApp, KeyOutcome};
use super::render::{TerminalGuard, draw_control, setup_terminal};

const KEYBOARD_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the interactive control screen until the user quits or shutdown is
/// signalled.
///
/// # Errors
///
/// Returns an error when the terminal cannot be set up or drawn.
pub async fn run_control_ui(
    surface: Arc<ControlSurface>,
    poll_interval: Duration,
    no_color: bool,
    shutdown_tx: &ShutdownSender,
) -> AppResult<()> {
    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (view_tx, mut view_rx) = watch::channel(StatusView::connecting());
    let (refresh_tx, refresh_rx) = mpsc::unbounded_channel::<Duration>();
    let poller = spawn_status_poller(
        Arc::clone(&surface),
        poll_interval,
        view_tx,
        refresh_rx,
        shutdown_tx,
    );
    let (key_tx, mut key_rx) = mpsc::unbounded_channel::<KeyEvent>();
    let key_reader = spawn_key_reader(key_tx, shutdown_tx);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let mut app = ControlApp::new(no_color);
    let result: AppResult<()> = loop {
        if let Err(err) = terminal.draw(|f| draw_control(f, &app)) {
            break Err(err.into());
        }
        tokio::select! {
            _ = shutdown_rx.recv() => break Ok(()),
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let view = view_rx.borrow().clone();
                app.set_status(view);
            }
            key = key_rx.recv() => {
                let Some(key) = key else {
                    break Ok(());
                };
                match app.handle_key(key) {
                    KeyOutcome::None => {}
                    KeyOutcome::Quit => break Ok(()),
                    KeyOutcome::Action(action) => match surface.perform(action).await {
                        ActionOutcome::Sent => {
                            if refresh_tx.send(REFRESH_AFTER_ACTION).is_err() {
                                tracing::debug!("Status poller already stopped.");
                            }
                        }
                        ActionOutcome::Blocked(view) => app.set_status(view),
                        ActionOutcome::Alert(message) => app.show_alert(message),
                    },
                }
            }
        }
    };

    drop(shutdown_tx.send(()));
    if let Err(err) = poller.await {
        tracing::debug!("Status poller ended abnormally: {}", err);
    }
    if let Err(err) = key_reader.await {
        tracing::debug!("Key reader ended abnormally: {}", err);
    }
    result
}

fn spawn_key_reader(
    key_tx: mpsc::UnboundedSender<KeyEvent>,
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::task::spawn_blocking(move || {
        loop {
            match shutdown_rx.try_recv() {
                Ok(()) | Err(broadcast::error::TryRecvError::Closed) => break,
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            }

            let has_event = event::poll(KEYBOARD_POLL_INTERVAL).unwrap_or_default();
            if has_event
                && let Ok(Event::Key(key)) = event::read()
                && key_tx.send(key).is_err()
            {
                break;
            }
        }
    })
}
