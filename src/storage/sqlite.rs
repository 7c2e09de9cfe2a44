//! SQLite storage implementation
//!
//! This module provides a SQLite-backed implementation of the page store and
//! run log. A single connection is shared behind a mutex; every method takes
//! `&self` so the store can be handed to the sink as an `Arc`.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PageStore, RunLog, StorageError, StorageResult};
use crate::storage::{make_snippet, star_rating, RunRecord, RunStats, RunStatus, SearchHit};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and verifies it is usable
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Database opened, schema applied and pinged
    /// * `Err(StorageError::Connect)` - The store cannot be reached; the crawl
    ///   must not start
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(|e| {
            StorageError::Connect(format!("cannot open {}: {}", path.display(), e))
        })?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(|e| StorageError::Connect(e.to_string()))?;

        Self::from_connection(conn)
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Connect(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        initialize_schema(&conn).map_err(|e| StorageError::Connect(e.to_string()))?;

        // Ping it just to be sure it answers
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| StorageError::Connect(format!("ping failed: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Turns free text into an FTS5 expression matching any of its words
///
/// Each word is quoted so punctuation in user input can never be read as
/// query syntax. Returns `None` when the input holds no words.
fn fts_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| format!("\"{}\"", term))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

impl PageStore for SqliteStorage {
    fn upsert_page(&self, url: &str, title: &str, content: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn().execute(
            "INSERT INTO pages (url, title, content, crawled_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                crawled_at = excluded.crawled_at",
            params![url, title, content, now],
        )?;
        Ok(())
    }

    fn search(&self, query: &str, limit: usize) -> StorageResult<Vec<SearchHit>> {
        let Some(expr) = fts_query(query) else {
            return Ok(Vec::new());
        };

        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT pages.url, pages.title, pages.content, bm25(pages_fts) AS relevance
             FROM pages_fts
             JOIN pages ON pages.id = pages_fts.rowid
             WHERE pages_fts MATCH ?1
             ORDER BY relevance
             LIMIT ?2",
        )?;

        // bm25() is lower-is-better; flip it so higher scores rank first
        let rows = stmt
            .query_map(params![expr, limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    -row.get::<_, f64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let best = rows.first().map(|(_, _, _, score)| *score).unwrap_or(0.0);

        Ok(rows
            .into_iter()
            .map(|(url, title, content, score)| SearchHit {
                title,
                url,
                score,
                stars: star_rating(score, best),
                snippet: make_snippet(&content),
            })
            .collect())
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn run_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        stats: RunStats {
            attempted: row.get::<_, i64>(5)? as u64,
            succeeded: row.get::<_, i64>(6)? as u64,
            failed: row.get::<_, i64>(7)? as u64,
        },
    })
}

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, attempted, succeeded, failed";

impl RunLog for SqliteStorage {
    fn create_run(&self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn complete_run(&self, run_id: i64, stats: &RunStats) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn().execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, attempted = ?3, succeeded = ?4, failed = ?5
             WHERE id = ?6",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                stats.attempted as i64,
                stats.succeeded as i64,
                stats.failed as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn latest_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM runs ORDER BY id DESC LIMIT ?1",
            RUN_COLUMNS
        ))?;
        let runs = stmt
            .query_map(params![limit as i64], run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }
}
