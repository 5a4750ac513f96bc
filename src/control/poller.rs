use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::surface::ControlSurface;
use super::view::StatusView;
use crate::protocol::TabInfo;
use crate::shutdown::ShutdownSender;

/// Keeps `view_tx` current: refreshes on start, every `interval`, on each
/// tab update and whenever a delay arrives on `refresh_rx` (after that
/// delay).
#[must_use]
pub fn spawn_status_poller(
    surface: Arc<ControlSurface>,
    interval: Duration,
    view_tx: watch::Sender<StatusView>,
    mut refresh_rx: mpsc::UnboundedReceiver<Duration>,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut tab_rx = surface.channel().tab_events();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {}
                update = next_tab_update(&mut tab_rx) => {
                    if update.is_none() {
                        tab_rx = None;
                        continue;
                    }
                }
                delay = refresh_rx.recv() => {
                    let Some(delay) = delay else {
                        break;
                    };
                    tokio::time::sleep(delay).await;
                }
            }
            let view = surface.refresh().await;
            if view_tx.send(view).is_err() {
                break;
            }
        }
    })
}

/// Resolves with `Some(())` on a tab update and `None` once the feed ends.
/// Without a feed it never resolves.
async fn next_tab_update(
    tab_rx: &mut Option<broadcast::Receiver<TabInfo>>,
) -> Option<()> {
    let Some(rx) = tab_rx.as_mut() else {
        return std::future::pending().await;
    };
    match rx.recv().await {
        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => Some(()),
        Err(broadcast::error::RecvError::Closed) => None,
    }
}
