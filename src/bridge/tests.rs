use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use super::io::{MAX_MESSAGE_BYTES, read_message, send_message};
use super::{LocalChannel, MessageChannel, WireChannel, WireMessage, run_bridge_server};
use crate::error::{AppError, AppResult, BridgeError};
use crate::host::sim::{SimPage, SimVideo};
use crate::looper::{LooperEvent, LooperTiming, spawn_looper};
use crate::protocol::{Request, Response, TabInfo};
use crate::shutdown_handlers::shutdown_channel;
use crate::storage::MemoryStore;
use crate::test_support::{run_async_test, same_seconds};

const WATCH_A: &str = "https://www.youtube.com/watch?v=aaa";
const WATCH_B: &str = "https://www.youtube.com/watch?v=bbb";
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

fn sim_page() -> Arc<SimPage> {
    let page = Arc::new(SimPage::new(WATCH_A));
    page.set_video(Some(Arc::new(SimVideo::new(Some(Duration::from_secs(100))))));
    page
}

#[test]
fn wire_messages_are_tagged_lines() -> AppResult<()> {
    run_async_test(async {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, _server_write) = tokio::io::split(server);
        let (_client_read, mut client_write) = tokio::io::split(client);

        let message = WireMessage::Command {
            id: 7,
            request: Request::set_loop_time(12.0),
        };
        send_message(&mut client_write, &message).await?;
        let mut reader = BufReader::new(server_read);
        let received = read_message(&mut reader).await?;
        if received != message {
            return Err(AppError::bridge(format!("Unexpected message {:?}", received)));
        }

        let encoded = serde_json::to_value(WireMessage::TabUpdated(TabInfo::new(None)))?;
        if encoded != serde_json::json!({ "type": "tab_updated", "url": null }) {
            return Err(AppError::bridge(format!("Unexpected encoding {}", encoded)));
        }
        Ok(())
    })
}

#[test]
fn oversized_wire_message_is_rejected() -> AppResult<()> {
    run_async_test(async {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let (server_read, _server_write) = tokio::io::split(server);
        let (_client_read, mut client_write) = tokio::io::split(client);

        let writer = tokio::spawn(async move {
            let payload = vec![b'a'; MAX_MESSAGE_BYTES.saturating_add(16)];
            drop(client_write.write_all(&payload).await);
            drop(client_write.write_all(b"\n").await);
        });
        let mut reader = BufReader::new(server_read);
        let result = read_message(&mut reader).await;
        writer.abort();
        match result {
            Err(AppError::Bridge(BridgeError::WireMessageTooLarge { .. })) => Ok(()),
            other => Err(AppError::bridge(format!(
                "Expected too-large error, got {:?}",
                other
            ))),
        }
    })
}

#[test]
fn closed_connection_is_reported() -> AppResult<()> {
    run_async_test(async {
        let (client, server) = tokio::io::duplex(1024);
        drop(client);
        let mut reader = BufReader::new(server);
        match read_message(&mut reader).await {
            Err(AppError::Bridge(BridgeError::ConnectionClosed)) => Ok(()),
            other => Err(AppError::bridge(format!(
                "Expected closed connection, got {:?}",
                other
            ))),
        }
    })
}

#[test]
fn bridge_round_trips_commands_and_tab_queries() -> AppResult<()> {
    run_async_test(async {
        let page = sim_page();
        let (shutdown_tx, _) = shutdown_channel();
        let (looper, looper_task) = spawn_looper(
            page.clone(),
            Arc::new(MemoryStore::new()),
            LooperTiming::default(),
            &shutdown_tx,
        );
        looper.dispatch(LooperEvent::PageReady)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        let server_shutdown = shutdown_tx.clone();
        let server_page = page.clone();
        let server_looper = looper.clone();
        let server = tokio::spawn(async move {
            run_bridge_server(
                listener,
                server_looper,
                server_page.clone(),
                server_page.tab_sender(),
                &server_shutdown,
            )
            .await
        });

        let channel = WireChannel::connect(&addr, REPLY_TIMEOUT).await?;
        let tab = channel.active_tab().await?;
        if tab.url.as_deref() != Some(WATCH_A) {
            return Err(AppError::bridge(format!("Unexpected tab {:?}", tab)));
        }

        let response = channel.send(Request::set_loop_time(33.0)).await?;
        if !response.is_success() {
            return Err(AppError::bridge(format!("Unexpected reply {:?}", response)));
        }
        let Response::Status(report) = channel.send(Request::get_status()).await? else {
            return Err(AppError::bridge("Expected a status report"));
        };
        if !report.is_active || !same_seconds(report.loop_time, 33.0) {
            return Err(AppError::bridge(format!("Unexpected status {:?}", report)));
        }

        let unknown = channel.send(Request::new("rewind")).await?;
        if unknown != Response::error("Unrecognized action") {
            return Err(AppError::bridge(format!("Unexpected reply {:?}", unknown)));
        }

        let mut updates = channel
            .tab_events()
            .ok_or_else(|| AppError::bridge("Expected tab events"))?;
        // Give the session a moment to subscribe before navigating.
        tokio::time::sleep(Duration::from_millis(50)).await;
        page.navigate(WATCH_B);
        let update = tokio::time::timeout(REPLY_TIMEOUT, updates.recv())
            .await
            .map_err(|_elapsed| AppError::bridge("Timed out waiting for tab update"))?
            .map_err(|err| AppError::bridge(format!("Tab update failed: {}", err)))?;
        if update.url.as_deref() != Some(WATCH_B) {
            return Err(AppError::bridge(format!("Unexpected update {:?}", update)));
        }

        drop(shutdown_tx.send(()));
        server.await??;
        looper_task.await?;
        Ok(())
    })
}

#[test]
fn timed_out_tab_query_does_not_steal_the_next_answer() -> AppResult<()> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await?;
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);
            // The first query goes unanswered.
            let WireMessage::QueryTab { .. } = read_message(&mut reader).await? else {
                return Err(AppError::bridge("Expected a first tab query"));
            };
            let WireMessage::QueryTab { id } = read_message(&mut reader).await? else {
                return Err(AppError::bridge("Expected a second tab query"));
            };
            let answer = WireMessage::Tab {
                id,
                url: Some(WATCH_B.to_owned()),
            };
            send_message(&mut write_half, &answer).await?;
            // Keep the connection open until the client is done.
            drop(read_message(&mut reader).await);
            Ok::<(), AppError>(())
        });

        let channel = WireChannel::connect(&addr, Duration::from_millis(200)).await?;
        match channel.active_tab().await {
            Err(AppError::Bridge(BridgeError::Timeout { .. })) => {}
            other => {
                return Err(AppError::bridge(format!(
                    "Expected the first query to time out, got {:?}",
                    other
                )));
            }
        }
        let tab = channel.active_tab().await?;
        if tab.url.as_deref() != Some(WATCH_B) {
            return Err(AppError::bridge(format!("Unexpected tab {:?}", tab)));
        }

        drop(channel);
        server.await??;
        Ok(())
    })
}

#[test]
fn connect_failure_is_a_bridge_error() -> AppResult<()> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        drop(listener);
        match WireChannel::connect(&addr, REPLY_TIMEOUT).await {
            Err(AppError::Bridge(BridgeError::Connection { .. })) => Ok(()),
            Err(other) => Err(AppError::bridge(format!("Unexpected error {}", other))),
            Ok(_) => Err(AppError::bridge("Expected connection to fail")),
        }
    })
}

#[test]
fn local_channel_reaches_looper() -> AppResult<()> {
    run_async_test(async {
        let page = sim_page();
        let (shutdown_tx, _) = shutdown_channel();
        let (looper, looper_task) = spawn_looper(
            page.clone(),
            Arc::new(MemoryStore::new()),
            LooperTiming::default(),
            &shutdown_tx,
        );
        let channel = LocalChannel::new(looper, page.clone(), Some(page.tab_sender()));
        if !channel.active_tab().await?.is_watch_page() {
            return Err(AppError::bridge("Expected a watch page"));
        }
        if !channel.send(Request::disable_loop()).await?.is_success() {
            return Err(AppError::bridge("Expected disable to succeed"));
        }
        let mut updates = channel
            .tab_events()
            .ok_or_else(|| AppError::bridge("Expected tab events"))?;
        page.navigate(WATCH_B);
        let update = updates
            .recv()
            .await
            .map_err(|err| AppError::bridge(format!("Tab update failed: {}", err)))?;
        if update.url.as_deref() != Some(WATCH_B) {
            return Err(AppError::bridge(format!("Unexpected update {:?}", update)));
        }
        drop(shutdown_tx.send(()));
        looper_task.await?;
        Ok(())
    })
}
