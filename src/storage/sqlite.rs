//! SQLite feedback store
//!
//! Persistent storage on a single `feedback` table, accessed through a
//! deadpool-sqlite connection pool. Every operation checks out one pooled
//! connection, runs inside `interact`, and hands the connection back when the
//! guard drops, including on error paths.

use crate::error::{AvaliacaoError, Result};
use crate::storage::{FeedbackStore, ReportFilter, ScanOrder};
use crate::types::{AttendantAverages, FeedbackId, FeedbackRecord, NewFeedback, TIMESTAMP_FORMAT};
use async_trait::async_trait;
use chrono::Local;
use deadpool_sqlite::{Config, Pool, Runtime};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    respondent_name TEXT,
    attendant_name TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK(rating BETWEEN 1 AND 5),
    comment TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_feedback_attendant ON feedback(attendant_name);
"#;

const SELECT_OLDEST: &str = "SELECT id, respondent_name, attendant_name, rating, comment, created_at
     FROM feedback ORDER BY id ASC";

const SELECT_NEWEST: &str = "SELECT id, respondent_name, attendant_name, rating, comment, created_at
     FROM feedback ORDER BY id DESC";

/// SQLite-backed feedback store with connection pooling
pub struct SqliteFeedbackStore {
    pool: Pool,
    path: PathBuf,
}

impl SqliteFeedbackStore {
    /// Create a pool over the database file at `db_path`
    ///
    /// The file is created on first connection. Call [`init_schema`] (or use
    /// [`open`]) before reading or writing.
    ///
    /// [`init_schema`]: SqliteFeedbackStore::init_schema
    /// [`open`]: SqliteFeedbackStore::open
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        info!("Creating feedback store pool at: {}", path.display());

        let pool = Config::new(path.clone())
            .create_pool(Runtime::Tokio1)
            .map_err(|e| AvaliacaoError::Pool(format!("Failed to create connection pool: {}", e)))?;

        Ok(Self { pool, path })
    }

    /// Create the pool and make sure the schema exists
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let store = Self::new(db_path)?;
        store.init_schema().await?;
        Ok(store)
    }

    /// Database file backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the feedback table and index. Safe to call repeatedly.
    pub async fn init_schema(&self) -> Result<()> {
        self.with_conn(|conn| {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            debug!("SQLite journal mode: {}", mode);

            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        info!("Feedback schema ready");
        Ok(())
    }

    /// Run `f` on a pooled connection
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.pool.get().await.map_err(|e| {
            AvaliacaoError::Pool(format!("Failed to get connection from pool: {}", e))
        })?;

        conn.interact(move |conn: &mut Connection| -> Result<T> {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            f(conn)
        })
        .await
        .map_err(|e| AvaliacaoError::Pool(format!("Pool interaction failed: {}", e)))?
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    Ok(FeedbackRecord {
        id: FeedbackId(row.get("id")?),
        respondent_name: row.get("respondent_name")?,
        attendant_name: row.get("attendant_name")?,
        rating: row.get("rating")?,
        comment: row.get("comment")?,
        timestamp: row.get("created_at")?,
    })
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn insert(&self, feedback: &NewFeedback) -> Result<FeedbackId> {
        feedback.validate()?;

        let feedback = feedback.clone();

        let id = self
            .with_conn(move |conn| {
                // Take the write lock before stamping so timestamps follow id order
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let created_at = Local::now().format(TIMESTAMP_FORMAT).to_string();

                tx.execute(
                    "INSERT INTO feedback (respondent_name, attendant_name, rating, comment, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        feedback.respondent_name,
                        feedback.attendant_name,
                        feedback.rating,
                        feedback.comment,
                        created_at
                    ],
                )?;
                let id = FeedbackId(tx.last_insert_rowid());
                tx.commit()?;
                Ok(id)
            })
            .await?;

        debug!("Stored feedback {}", id);
        Ok(id)
    }

    async fn scan(&self, filter: &ReportFilter, order: ScanOrder) -> Result<Vec<FeedbackRecord>> {
        debug!("Scanning feedback (filter: {:?}, order: {:?})", filter, order);

        let sql = match order {
            ScanOrder::Oldest => SELECT_OLDEST,
            ScanOrder::Newest => SELECT_NEWEST,
        };
        let filter = filter.clone();

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], row_to_record)?;

            let mut records = Vec::new();
            for row in rows {
                let record = row?;
                if filter.matches(&record) {
                    records.push(record);
                }
            }
            Ok(records)
        })
        .await
    }

    async fn average_by_attendant(&self) -> Result<AttendantAverages> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT attendant_name, AVG(rating) FROM feedback GROUP BY attendant_name",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?;

            let mut averages = AttendantAverages::new();
            for row in rows {
                let (name, average) = row?;
                averages.insert(name, average);
            }
            Ok(averages)
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        let count = self
            .with_conn(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;

        Ok(count as usize)
    }
}
