use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::io::{read_message, send_message};
use super::wire::WireMessage;
use crate::error::{AppError, AppResult, BridgeError};
use crate::host::HostPage;
use crate::looper::LooperHandle;
use crate::protocol::{Response, TabInfo};
use crate::shutdown::ShutdownSender;

/// Accepts Control Surface connections until shutdown. Each connection gets
/// tab queries answered from `page`, commands forwarded to `looper` and tab
/// updates pushed as they happen.
///
/// # Errors
///
/// Returns an error when accepting connections fails.
pub async fn run_bridge_server(
    listener: TcpListener,
    looper: LooperHandle,
    page: Arc<dyn HostPage>,
    tab_tx: broadcast::Sender<TabInfo>,
    shutdown_tx: &ShutdownSender,
) -> AppResult<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    if let Ok(addr) = listener.local_addr() {
        info!("Bridge listening on {}", addr);
    }
    loop {
        let accepted = tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => accepted,
        };
        let (stream, peer) = accepted.map_err(|err| {
            AppError::bridge(BridgeError::Io {
                context: "accept bridge connection",
                source: err,
            })
        })?;
        info!("Control surface connected from {}", peer);
        let session = BridgeSession {
            looper: looper.clone(),
            page: Arc::clone(&page),
            tab_rx: tab_tx.subscribe(),
            shutdown_rx: shutdown_tx.subscribe(),
            peer,
        };
        tokio::spawn(session.run(stream));
    }
    debug!("Bridge server stopped.");
    Ok(())
}

struct BridgeSession {
    looper: LooperHandle,
    page: Arc<dyn HostPage>,
    tab_rx: broadcast::Receiver<TabInfo>,
    shutdown_rx: broadcast::Receiver<()>,
    peer: SocketAddr,
}

impl BridgeSession {
    async fn run(mut self, stream: TcpStream) {
        let (read_half, mut write_half) = stream.into_split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<WireMessage>();
        let writer_handle = tokio::spawn(async move {
            while let Some(message) = out_rx.recv().await {
                if send_message(&mut write_half, &message).await.is_err() {
                    break;
                }
            }
        });

        let (in_tx, mut in_rx) = mpsc::unbounded_channel::<AppResult<WireMessage>>();
        let reader_handle = tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            loop {
                let message = read_message(&mut reader).await;
                let failed = message.is_err();
                if in_tx.send(message).is_err() || failed {
                    break;
                }
            }
        });

        let mut tabs_open = true;
        loop {
            let message = tokio::select! {
                _ = self.shutdown_rx.recv() => break,
                update = self.tab_rx.recv(), if tabs_open => {
                    match update {
                        Ok(tab) => {
                            if out_tx.send(WireMessage::TabUpdated(tab)).is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!("Skipped {} tab updates for {}", skipped, self.peer);
                        }
                        Err(broadcast::error::RecvError::Closed) => tabs_open = false,
                    }
                    continue;
                }
                message = in_rx.recv() => message,
            };
            let message = match message {
                Some(Ok(message)) => message,
                None | Some(Err(AppError::Bridge(BridgeError::ConnectionClosed))) => break,
                Some(Err(err)) => {
                    warn!("Bridge read from {} failed: {}", self.peer, err);
                    drop(out_tx.send(WireMessage::Error {
                        message: err.to_string(),
                    }));
                    break;
                }
            };
            let reply = self.handle(message).await;
            if out_tx.send(reply).is_err() {
                break;
            }
        }

        reader_handle.abort();
        drop(out_tx);
        if let Err(err) = writer_handle.await {
            debug!("Bridge writer for {} ended abnormally: {}", self.peer, err);
        }
        info!("Control surface {} disconnected", self.peer);
    }

    async fn handle(&self, message: WireMessage) -> WireMessage {
        match message {
            WireMessage::QueryTab { id } => WireMessage::Tab {
                id,
                url: Some(self.page.location()),
            },
            WireMessage::Command { id, request } => {
                let response = match self.looper.request(request).await {
                    Ok(response) => response,
                    Err(err) => {
                        warn!("Looper could not answer command {}: {}", id, err);
                        Response::error(&err.to_string())
                    }
                };
                WireMessage::Reply { id, response }
            }
            other @ (WireMessage::Tab { .. }
            | WireMessage::Reply { .. }
            | WireMessage::TabUpdated(_)
            | WireMessage::Error { .. }) => WireMessage::Error {
                message: BridgeError::UnexpectedMessage { kind: other.kind() }.to_string(),
            },
        }
    }
}
