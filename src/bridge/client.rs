use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::MessageChannel;
use super::io::{read_message, send_message};
use super::wire::WireMessage;
use crate::error::{AppError, AppResult, BridgeError};
use crate::protocol::{Request, Response, TabInfo};

const TAB_EVENT_CAPACITY: usize = 16;

type ReplySender<T> = oneshot::Sender<Result<T, BridgeError>>;

#[derive(Default)]
struct PendingReplies {
    commands: HashMap<u64, ReplySender<Response>>,
    tab_queries: HashMap<u64, ReplySender<TabInfo>>,
}

impl PendingReplies {
    fn fail_all(&mut self, error: impl Fn() -> BridgeError) {
        for (_, reply) in self.commands.drain() {
            drop(reply.send(Err(error())));
        }
        for (_, reply) in self.tab_queries.drain() {
            drop(reply.send(Err(error())));
        }
    }
}

type SharedPending = Arc<Mutex<PendingReplies>>;

fn with_pending<T>(pending: &SharedPending, f: impl FnOnce(&mut PendingReplies) -> T) -> T {
    let mut guard = pending.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Bridge client used by the Control Surface when the page runs in another
/// process.
pub struct WireChannel {
    out_tx: mpsc::UnboundedSender<WireMessage>,
    pending: SharedPending,
    tab_tx: broadcast::Sender<TabInfo>,
    next_id: AtomicU64,
    reply_timeout: Duration,
    reader_handle: JoinHandle<()>,
    writer_handle: JoinHandle<()>,
}

impl WireChannel {
    /// Connects to a bridge server. Replies that take longer than
    /// `reply_timeout` fail with a timeout error.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection cannot be established.
    pub async fn connect(addr: &str, reply_timeout: Duration) -> AppResult<Self> {
        debug!("Connecting to bridge {}", addr);
        let stream = TcpStream::connect(addr).await.map_err(|err| {
            AppError::bridge(BridgeError::Connection {
                addr: addr.to_owned(),
                source: err,
            })
        })?;
        info!("Connected to bridge {}", addr);
        let (read_half, mut write_half) = stream.into_split();

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<WireMessage>();
        let writer_handle = tokio::spawn(async move {
            while let Some(message) = out_rx.recv().await {
                if let Err(err) = send_message(&mut write_half, &message).await {
                    debug!("Bridge write failed: {}", err);
                    break;
                }
            }
        });

        let pending: SharedPending = Arc::new(Mutex::new(PendingReplies::default()));
        let (tab_tx, _) = broadcast::channel(TAB_EVENT_CAPACITY);
        let reader_pending = Arc::clone(&pending);
        let reader_tabs = tab_tx.clone();
        let reader_handle = tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            loop {
                let message = match read_message(&mut reader).await {
                    Ok(message) => message,
                    Err(err) => {
                        debug!("Bridge connection ended: {}", err);
                        break;
                    }
                };
                dispatch_incoming(message, &reader_pending, &reader_tabs);
            }
            with_pending(&reader_pending, |replies| {
                replies.fail_all(|| BridgeError::ConnectionClosed);
            });
        });

        Ok(Self {
            out_tx,
            pending,
            tab_tx,
            next_id: AtomicU64::new(1),
            reply_timeout,
            reader_handle,
            writer_handle,
        })
    }

    async fn await_reply<T>(
        &self,
        rx: oneshot::Receiver<Result<T, BridgeError>>,
        context: &'static str,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.reply_timeout, rx).await {
            Ok(Ok(result)) => result.map_err(AppError::bridge),
            Ok(Err(_closed)) => Err(AppError::bridge(BridgeError::ConnectionClosed)),
            Err(_elapsed) => Err(AppError::bridge(BridgeError::Timeout {
                context,
                timeout_ms: u64::try_from(self.reply_timeout.as_millis()).unwrap_or(u64::MAX),
            })),
        }
    }

    fn send_wire(&self, message: WireMessage) -> AppResult<()> {
        self.out_tx
            .send(message)
            .map_err(|_closed| AppError::bridge(BridgeError::ConnectionClosed))
    }
}

fn dispatch_incoming(
    message: WireMessage,
    pending: &SharedPending,
    tabs: &broadcast::Sender<TabInfo>,
) {
    match message {
        WireMessage::Reply { id, response } => {
            let reply = with_pending(pending, |replies| replies.commands.remove(&id));
            match reply {
                Some(reply) => drop(reply.send(Ok(response))),
                None => debug!("Dropping reply {} with no waiting request.", id),
            }
        }
        WireMessage::Tab { id, url } => {
            let reply = with_pending(pending, |replies| replies.tab_queries.remove(&id));
            match reply {
                Some(reply) => drop(reply.send(Ok(TabInfo::new(url)))),
                None => debug!("Dropping tab answer {} with no waiting query.", id),
            }
        }
        WireMessage::TabUpdated(tab) => {
            if tabs.send(tab).is_err() {
                debug!("No listeners for tab updates.");
            }
        }
        WireMessage::Error { message } => {
            warn!("Bridge reported an error: {}", message);
            with_pending(pending, |replies| {
                replies.fail_all(|| BridgeError::Remote {
                    message: message.clone(),
                });
            });
        }
        other @ (WireMessage::QueryTab { .. } | WireMessage::Command { .. }) => {
            warn!(
                "{}",
                BridgeError::UnexpectedMessage { kind: other.kind() }
            );
        }
    }
}

#[async_trait]
impl MessageChannel for WireChannel {
    async fn active_tab(&self) -> AppResult<TabInfo> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        with_pending(&self.pending, |replies| replies.tab_queries.insert(id, tx));
        if let Err(err) = self.send_wire(WireMessage::QueryTab { id }) {
            with_pending(&self.pending, |replies| replies.tab_queries.remove(&id));
            return Err(err);
        }
        let result = self.await_reply(rx, "tab answer").await;
        if result.is_err() {
            with_pending(&self.pending, |replies| replies.tab_queries.remove(&id));
        }
        result
    }

    async fn send(&self, request: Request) -> AppResult<Response> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        with_pending(&self.pending, |replies| replies.commands.insert(id, tx));
        if let Err(err) = self.send_wire(WireMessage::Command { id, request }) {
            with_pending(&self.pending, |replies| replies.commands.remove(&id));
            return Err(err);
        }
        let result = self.await_reply(rx, "command reply").await;
        if result.is_err() {
            with_pending(&self.pending, |replies| replies.commands.remove(&id));
        }
        result
    }

    fn tab_events(&self) -> Option<broadcast::Receiver<TabInfo>> {
        Some(self.tab_tx.subscribe())
    }
}

impl Drop for WireChannel {
    fn drop(&mut self) {
        self.reader_handle.abort();
        self.writer_handle.abort();
    }
}
