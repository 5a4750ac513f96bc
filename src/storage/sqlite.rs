use std::path::Path;

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::{LoopRecord, LoopStore, StoredRecord, current_time_ms};
use crate::error::{AppError, AppResult, StorageError};
use crate::video::VideoId;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS loop_records (
        video_id TEXT PRIMARY KEY,
        loop_start_seconds REAL NOT NULL,
        is_active INTEGER NOT NULL,
        updated_at_ms INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_loop_records_updated_at ON loop_records(updated_at_ms);";

/// SQLite-backed store. All statements run on the connection's worker
/// thread.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the parent directory cannot be created or the
    /// database cannot be opened or initialized.
    pub async fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                AppError::storage(StorageError::CreateDir {
                    path: parent.to_path_buf(),
                    source: err,
                })
            })?;
        }
        let conn = Connection::open(path).await.map_err(|err| {
            AppError::storage(StorageError::Open {
                path: path.to_path_buf(),
                source: err,
            })
        })?;
        Self::initialize(conn).await
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be initialized.
    pub async fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().await.map_err(|err| {
            AppError::storage(StorageError::Open {
                path: ":memory:".into(),
                source: err,
            })
        })?;
        Self::initialize(conn).await
    }

    /// Upserts `record` with an explicit write time.
    ///
    /// # Errors
    ///
    /// Returns an error when the record is not finite and non-negative or
    /// the write fails.
    pub async fn save_at(
        &self,
        video_id: &VideoId,
        record: LoopRecord,
        updated_at_ms: u64,
    ) -> AppResult<()> {
        if let Some(reason) = record.invalid_reason() {
            return Err(AppError::storage(StorageError::InvalidRecord {
                video_id: video_id.to_string(),
                reason,
            }));
        }
        let key = video_id.as_str().to_owned();
        let updated_at_ms = clamp_i64(updated_at_ms);
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO loop_records (video_id, loop_start_seconds, is_active, updated_at_ms)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(video_id) DO UPDATE SET
                        loop_start_seconds = excluded.loop_start_seconds,
                        is_active = excluded.is_active,
                        updated_at_ms = excluded.updated_at_ms",
                    rusqlite::params![
                        key,
                        record.loop_start_seconds,
                        i64::from(u8::from(record.is_active)),
                        updated_at_ms
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(|err| sqlite_error("save loop record", err))
    }

    async fn initialize(conn: Connection) -> AppResult<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(|err| sqlite_error("initialize loop store", err))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl LoopStore for SqliteStore {
    async fn load(&self, video_id: &VideoId) -> AppResult<Option<LoopRecord>> {
        let key = video_id.as_str().to_owned();
        let row = self
            .conn
            .call(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT loop_start_seconds, is_active FROM loop_records WHERE video_id = ?1",
                        rusqlite::params![key],
                        |row| Ok((row.get::<_, f64>(0)?, row.get::<_, i64>(1)?)),
                    )
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(|err| sqlite_error("load loop record", err))?;
        Ok(row.map(|(loop_start_seconds, is_active)| {
            LoopRecord::new(loop_start_seconds, is_active != 0)
        }))
    }

    async fn save(&self, video_id: &VideoId, record: LoopRecord) -> AppResult<()> {
        self.save_at(video_id, record, current_time_ms()).await
    }

    async fn list(&self) -> AppResult<Vec<StoredRecord>> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT video_id, loop_start_seconds, is_active, updated_at_ms
                     FROM loop_records ORDER BY updated_at_ms DESC, video_id ASC",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, f64>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, i64>(3)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|err| sqlite_error("list loop records", err))?;

        let mut records = Vec::with_capacity(rows.len());
        for (key, loop_start_seconds, is_active, updated_at_ms) in rows {
            let Some(video_id) = VideoId::new(&key) else {
                tracing::warn!("Skipping loop record with blank video id.");
                continue;
            };
            records.push(StoredRecord {
                video_id,
                record: LoopRecord::new(loop_start_seconds, is_active != 0),
                updated_at_ms: u64::try_from(updated_at_ms).unwrap_or(0),
            });
        }
        Ok(records)
    }

    async fn prune(&self, updated_before_ms: u64, dry_run: bool) -> AppResult<Vec<VideoId>> {
        let cutoff = clamp_i64(updated_before_ms);
        let keys = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let keys = {
                    let mut stmt = tx.prepare(
                        "SELECT video_id FROM loop_records WHERE updated_at_ms < ?1 ORDER BY video_id",
                    )?;
                    stmt.query_map(rusqlite::params![cutoff], |row| row.get::<_, String>(0))?
                        .collect::<Result<Vec<_>, _>>()?
                };
                if !dry_run {
                    tx.execute(
                        "DELETE FROM loop_records WHERE updated_at_ms < ?1",
                        rusqlite::params![cutoff],
                    )?;
                }
                tx.commit()?;
                Ok(keys)
            })
            .await
            .map_err(|err| sqlite_error("prune loop records", err))?;
        Ok(keys.iter().filter_map(|key| VideoId::new(key)).collect())
    }
}

fn sqlite_error(context: &'static str, source: tokio_rusqlite::Error) -> AppError {
    AppError::storage(StorageError::Sqlite { context, source })
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
