use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{LoopRecord, LoopStore, StoredRecord, current_time_ms};
use crate::error::AppResult;
use crate::video::VideoId;

/// Process-local store, used by `--memory-store` and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<VideoId, StoredRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record with an explicit write time.
    pub fn insert(&self, video_id: VideoId, record: LoopRecord, updated_at_ms: u64) {
        self.with_records(|records| {
            records.insert(
                video_id.clone(),
                StoredRecord {
                    video_id,
                    record,
                    updated_at_ms,
                },
            );
        });
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut HashMap<VideoId, StoredRecord>) -> T) -> T {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl LoopStore for MemoryStore {
    async fn load(&self, video_id: &VideoId) -> AppResult<Option<LoopRecord>> {
        Ok(self.with_records(|records| records.get(video_id).map(|stored| stored.record)))
    }

    async fn save(&self, video_id: &VideoId, record: LoopRecord) -> AppResult<()> {
        self.insert(video_id.clone(), record, current_time_ms());
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<StoredRecord>> {
        let mut all: Vec<StoredRecord> =
            self.with_records(|records| records.values().cloned().collect());
        all.sort_by(|a, b| {
            b.updated_at_ms
                .cmp(&a.updated_at_ms)
                .then_with(|| a.video_id.cmp(&b.video_id))
        });
        Ok(all)
    }

    async fn prune(&self, updated_before_ms: u64, dry_run: bool) -> AppResult<Vec<VideoId>> {
        Ok(self.with_records(|records| {
            let mut stale: Vec<VideoId> = records
                .values()
                .filter(|stored| stored.updated_at_ms < updated_before_ms)
                .map(|stored| stored.video_id.clone())
                .collect();
            stale.sort();
            if !dry_run {
                for video_id in &stale {
                    records.remove(video_id);
                }
            }
            stale
        }))
    }
}
