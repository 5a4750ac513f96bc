//! Durable per-video loop records.
mod memory;
mod record;
mod sqlite;


use async_trait::async_trait;

use crate::error::AppResult;
use crate::video::VideoId;

pub use memory::MemoryStore;
pub use record::{LoopRecord, StoredRecord, current_time_ms};
pub use sqlite::SqliteStore;

/// Key-value store of loop records keyed by video identifier.
#[async_trait]
pub trait LoopStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn load(&self, video_id: &VideoId) -> AppResult<Option<LoopRecord>>;

    /// Inserts or replaces the record for `video_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    async fn save(&self, video_id: &VideoId, record: LoopRecord) -> AppResult<()>;

    /// All records, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn list(&self) -> AppResult<Vec<StoredRecord>>;

    /// Removes records last written before `updated_before_ms` and returns
    /// their identifiers. With `dry_run` nothing is removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read or written.
    async fn prune(&self, updated_before_ms: u64, dry_run: bool) -> AppResult<Vec<VideoId>>;
}
