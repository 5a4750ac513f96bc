use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::wire::WireMessage;
use crate::error::{AppError, AppResult, BridgeError};

pub(super) const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

pub(super) async fn read_message<R>(reader: &mut R) -> AppResult<WireMessage>
where
    R: AsyncBufRead + Unpin,
{
    let mut buffer: Vec<u8> = Vec::with_capacity(512);
    let limit = u64::try_from(MAX_MESSAGE_BYTES)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    let bytes = (&mut *reader)
        .take(limit)
        .read_until(b'\n', &mut buffer)
        .await
        .map_err(|err| {
            AppError::bridge(BridgeError::Io {
                context: "read wire message",
                source: err,
            })
        })?;
    if bytes == 0 {
        return Err(AppError::bridge(BridgeError::ConnectionClosed));
    }
    if buffer.ends_with(b"\n") {
        buffer.pop();
        if buffer.ends_with(b"\r") {
            buffer.pop();
        }
    }
    if buffer.len() > MAX_MESSAGE_BYTES {
        return Err(AppError::bridge(BridgeError::WireMessageTooLarge {
            max_bytes: MAX_MESSAGE_BYTES,
        }));
    }
    let line = std::str::from_utf8(&buffer)
        .map_err(|err| AppError::bridge(BridgeError::WireMessageInvalidUtf8 { source: err }))?;
    serde_json::from_str::<WireMessage>(line).map_err(|err| {
        AppError::bridge(BridgeError::Deserialize {
            context: "wire message",
            source: err,
        })
    })
}

pub(super) async fn send_message<W>(writer: &mut W, message: &WireMessage) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_string(message).map_err(|err| {
        AppError::bridge(BridgeError::Serialize {
            context: "wire message",
            source: err,
        })
    })?;
    payload.push('\n');
    writer.write_all(payload.as_bytes()).await.map_err(|err| {
        AppError::bridge(BridgeError::Io {
            context: "send wire message",
            source: err,
        })
    })?;
    writer.flush().await.map_err(|err| {
        AppError::bridge(BridgeError::Io {
            context: "flush wire message",
            source: err,
        })
    })
}
