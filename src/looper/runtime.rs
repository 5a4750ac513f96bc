use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::event::{LooperEffect, LooperEvent, LooperTimer};
use super::machine::Looper;
use super::timing::LooperTiming;
use crate::error::{AppError, AppResult, HostError};
use crate::host::HostPage;
use crate::protocol::{Request, Response};
use crate::shutdown::ShutdownSender;
use crate::storage::{LoopRecord, LoopStore};
use crate::video::VideoId;

enum LooperMessage {
    Event(LooperEvent),
    Request {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
}

/// Cloneable entry point into a running Looper task.
#[derive(Clone)]
pub struct LooperHandle {
    tx: mpsc::UnboundedSender<LooperMessage>,
}

impl LooperHandle {
    /// Queues a host event.
    ///
    /// # Errors
    ///
    /// Returns an error when the Looper task has stopped.
    pub fn dispatch(&self, event: LooperEvent) -> AppResult<()> {
        self.tx
            .send(LooperMessage::Event(event))
            .map_err(|_closed| AppError::host(HostError::PageClosed))
    }

    /// Sends a command and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns an error when the Looper task stops before replying.
    pub async fn request(&self, request: Request) -> AppResult<Response> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(LooperMessage::Request { request, reply })
            .map_err(|_closed| AppError::host(HostError::PageClosed))?;
        response
            .await
            .map_err(|_dropped| AppError::host(HostError::PageClosed))
    }
}

enum StorageJob {
    Save { video_id: VideoId, record: LoopRecord },
    Load { video_id: VideoId },
}

/// Starts the page-context task owning a fresh [`Looper`]. The task runs
/// until shutdown is signalled.
///
/// Storage work goes through one worker so saves land in the order the
/// mutations happened and a load never overtakes an earlier save.
#[must_use]
pub fn spawn_looper(
    page: Arc<dyn HostPage>,
    store: Arc<dyn LoopStore>,
    timing: LooperTiming,
    shutdown_tx: &ShutdownSender,
) -> (LooperHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<LooperMessage>();
    let mut shutdown_rx = shutdown_tx.subscribe();
    let executor = EffectExecutor {
        page: Arc::clone(&page),
        storage: spawn_storage_worker(store, tx.clone()),
        tx: tx.clone(),
    };
    let handle = tokio::spawn(async move {
        let mut looper = Looper::new(page, timing);
        loop {
            let message = tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Looper task shutting down.");
                    break;
                }
                message = rx.recv() => message,
            };
            let Some(message) = message else {
                break;
            };
            match message {
                LooperMessage::Event(event) => {
                    tracing::trace!("Looper event {:?}", event);
                    let effects = looper.handle_event(event);
                    executor.run(&looper, effects);
                }
                LooperMessage::Request { request, reply } => {
                    let (response, effects) = looper.handle_request(&request);
                    if reply.send(response).is_err() {
                        tracing::debug!("Requester went away before the reply.");
                    }
                    executor.run(&looper, effects);
                }
            }
        }
    });
    (LooperHandle { tx }, handle)
}

/// Runs storage jobs one at a time. The worker stops once the Looper task
/// drops its job sender, after finishing what is already queued.
fn spawn_storage_worker(
    store: Arc<dyn LoopStore>,
    tx: mpsc::UnboundedSender<LooperMessage>,
) -> mpsc::UnboundedSender<StorageJob> {
    let (jobs_tx, mut jobs_rx) = mpsc::unbounded_channel::<StorageJob>();
    tokio::spawn(async move {
        while let Some(job) = jobs_rx.recv().await {
            match job {
                StorageJob::Save { video_id, record } => {
                    if let Err(err) = store.save(&video_id, record).await {
                        tracing::warn!("Failed to save loop for {}: {}", video_id, err);
                    }
                }
                StorageJob::Load { video_id } => match store.load(&video_id).await {
                    Ok(record) => {
                        let event = LooperEvent::RecordLoaded { video_id, record };
                        if tx.send(LooperMessage::Event(event)).is_err() {
                            tracing::debug!("Looper stopped before record load finished.");
                        }
                    }
                    Err(err) => {
                        tracing::warn!("Failed to load loop for {}: {}", video_id, err);
                    }
                },
            }
        }
        tracing::trace!("Storage worker finished.");
    });
    jobs_tx
}

struct EffectExecutor {
    page: Arc<dyn HostPage>,
    storage: mpsc::UnboundedSender<StorageJob>,
    tx: mpsc::UnboundedSender<LooperMessage>,
}

impl EffectExecutor {
    fn run(&self, looper: &Looper, effects: Vec<LooperEffect>) {
        for effect in effects {
            match effect {
                LooperEffect::Schedule { delay, timer } => self.schedule(delay, timer),
                LooperEffect::Persist { video_id, record } => {
                    self.submit(StorageJob::Save { video_id, record });
                }
                LooperEffect::Load { video_id } => self.submit(StorageJob::Load { video_id }),
                LooperEffect::Resume { attempt } => {
                    let Some(video) = looper.video() else {
                        continue;
                    };
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        if let Err(err) = video.play().await {
                            let event = LooperEvent::ResumeFailed {
                                attempt,
                                reason: err.to_string(),
                            };
                            if tx.send(LooperMessage::Event(event)).is_err() {
                                tracing::debug!("Looper stopped before resume failure.");
                            }
                        }
                    });
                }
                LooperEffect::Notify { message } => self.page.notify(message),
            }
        }
    }

    fn submit(&self, job: StorageJob) {
        if self.storage.send(job).is_err() {
            tracing::warn!("Storage worker stopped; dropping storage job.");
        }
    }

    fn schedule(&self, delay: std::time::Duration, timer: LooperTimer) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx
                .send(LooperMessage::Event(LooperEvent::Timer(timer)))
                .is_err()
            {
                tracing::trace!("Timer {:?} fired after the Looper stopped.", timer);
            }
        });
    }
}
