use thiserror::Error;

use super::{BridgeError, ConfigError, HostError, StorageError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn storage<E>(error: E) -> Self
    where
        E: Into<StorageError>,
    {
        error.into().into()
    }

    pub fn bridge<E>(error: E) -> Self
    where
        E: Into<BridgeError>,
    {
        error.into().into()
    }

    pub fn host<E>(error: E) -> Self
    where
        E: Into<HostError>,
    {
        error.into().into()
    }
}
