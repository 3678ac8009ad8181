//! SQLite-backed key/value slots.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::runtime::Runtime;

use equiptrack_inventory::{SlotStore, StorageError};

/// SQLite result code for "database or disk is full".
const SQLITE_FULL: &str = "13";

/// Synchronous key/value slots in a single SQLite table.
///
/// The async driver runs on an owned current-thread runtime, so every call
/// blocks the caller until the statement completes.
#[derive(Debug)]
pub struct SqliteSlotStore {
    pool: SqlitePool,
    path: PathBuf,
    runtime: Runtime,
}

impl SqliteSlotStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create storage directory at {parent:?}"))?;
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to create runtime for SqliteSlotStore")?;

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = runtime.block_on(async {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .with_context(|| format!("failed to open SQLite database at {path:?}"))?;

            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS storage_slots (
                    key        TEXT PRIMARY KEY,
                    value      TEXT NOT NULL,
                    written_at TEXT NOT NULL
                )
                "#,
            )
            .execute(&pool)
            .await
            .context("failed to create storage_slots table")?;

            Ok::<_, anyhow::Error>(pool)
        })?;

        tracing::debug!(path = %path.display(), "sqlite slot store opened");
        Ok(Self { pool, path, runtime })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When `key` was last written (RFC 3339), if ever.
    pub fn written_at(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.runtime.block_on(async {
            let row = sqlx::query("SELECT written_at FROM storage_slots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            row.map(|row| row.try_get::<String, _>("written_at"))
                .transpose()
                .map_err(map_sqlx_error)
        })
    }
}

impl SlotStore for SqliteSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.runtime.block_on(async {
            let row = sqlx::query("SELECT value FROM storage_slots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            row.map(|row| row.try_get::<String, _>("value"))
                .transpose()
                .map_err(map_sqlx_error)
        })
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();

        self.runtime.block_on(async {
            sqlx::query(
                r#"
                INSERT INTO storage_slots (key, value, written_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key)
                DO UPDATE SET
                    value = excluded.value,
                    written_at = excluded.written_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.runtime.block_on(async {
            sqlx::query("DELETE FROM storage_slots WHERE key = ?1")
                .bind(key)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            Ok(())
        })
    }
}

impl Drop for SqliteSlotStore {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(SQLITE_FULL) => {
            StorageError::QuotaExceeded
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StorageError::Unavailable(err.to_string())
        }
        _ => StorageError::Backend(err.to_string()),
    }
}

/// Resolve the default database path:
/// `{app_data_dir}/equiptrack/inventory.db`.
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("equiptrack");
    path.push("inventory.db");
    Ok(path)
}
