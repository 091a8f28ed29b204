//! SQLite analysis store
//!
//! Records live in the `palm_analyses` table. The reading is stored as JSON
//! text and timestamps as RFC 3339 strings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use palm_common::{AnalysisRecord, AnalysisStatus, AnalysisUpdate, Error, NewAnalysis, Reading, Result};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::AnalysisStore;

const SELECT_COLUMNS: &str =
    "SELECT id, image_data, status, progress, result, created_at, updated_at FROM palm_analyses";

/// SQLite-backed store
pub struct SqliteStore {
    pool: SqlitePool,
    /// Serializes read-merge-write cycles so SQLite never sees competing writers
    write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // mode=rwc: read, write, create
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        tracing::debug!("Connecting to database: {}", db_url);

        let pool = SqlitePool::connect(&db_url).await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database
    ///
    /// Limited to one connection that is never recycled: every `:memory:`
    /// connection is a separate database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the table if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        init_tables(&pool).await?;
        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }
}

async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS palm_analyses (
            id TEXT PRIMARY KEY,
            image_data TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'processing',
            progress INTEGER NOT NULL DEFAULT 0,
            result TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (palm_analyses)");
    Ok(())
}

fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}

fn record_from_row(row: &SqliteRow) -> Result<AnalysisRecord> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Failed to parse id: {}", e)))?;

    let status: String = row.try_get("status")?;
    let status: AnalysisStatus = status.parse()?;

    let progress: i64 = row.try_get("progress")?;
    let progress = u8::try_from(progress)
        .map_err(|_| Error::Internal(format!("Stored progress out of range: {}", progress)))?;

    let result: Option<String> = row.try_get("result")?;
    let result = result
        .map(|json| serde_json::from_str::<Reading>(&json))
        .transpose()?;

    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(AnalysisRecord {
        id,
        content_fingerprint: row.try_get("image_data")?,
        status,
        progress,
        result,
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

#[async_trait]
impl AnalysisStore for SqliteStore {
    async fn create(&self, new: NewAnalysis) -> Result<AnalysisRecord> {
        let record = AnalysisRecord::new(new);

        let _guard = self.write_lock.lock().await;
        sqlx::query(
            r#"
            INSERT INTO palm_analyses (id, image_data, status, progress, result, created_at, updated_at)
            VALUES (?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.content_fingerprint)
        .bind(record.status.as_str())
        .bind(i64::from(record.progress))
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn update(&self, id: Uuid, update: AnalysisUpdate) -> Result<Option<AnalysisRecord>> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut record = record_from_row(&row)?;
        record.apply(update)?;

        let result_json = record
            .result
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            UPDATE palm_analyses
            SET status = ?, progress = ?, result = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.status.as_str())
        .bind(i64::from(record.progress))
        .bind(result_json)
        .bind(record.updated_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
