mod app;
mod bridge;
mod config;
mod host;
mod storage;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use bridge::BridgeError;
pub use config::ConfigError;
pub use host::HostError;
pub use storage::StorageError;
pub use validation::{TimeFieldKind, ValidationError};
