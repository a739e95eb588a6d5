//! Clausal Storage Layer
//!
//! Implements the AnalysisStore trait on SQLite.
//!
//! # Architecture
//!
//! - One append-only table, `analysis_results`
//! - The analysis itself is stored as JSON text and decoded on read
//! - Ids come from SQLite `AUTOINCREMENT`, so they are strictly increasing
//!   and never reused
//!
//! # Examples
//!
//! ```no_run
//! use clausal_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for analysis records
//! ```

#![warn(missing_docs)]

use clausal_domain::traits::{AnalysisStore, StoreErrorKind};
use clausal_domain::{AnalysisId, AnalysisRecord, AnalysisResult, AnalysisSummary};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

const MEMORY_PATH: &str = ":memory:";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database could not be opened or queried
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),

    /// Database location could not be prepared on the filesystem
    #[error("Storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// No analysis with this id
    #[error("Analysis not found: {0}")]
    NotFound(AnalysisId),

    /// Stored content could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Whether this is a lookup miss rather than a storage failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Whether the storage medium itself failed
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}

impl StoreErrorKind for StoreError {
    fn is_not_found(&self) -> bool {
        StoreError::is_not_found(self)
    }
}

/// SQLite-based implementation of AnalysisStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share one store behind a mutex,
/// or give each thread its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    ///
    /// Missing parent directories are created. Use `:memory:` for an
    /// in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clausal_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("analyses.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.as_os_str() != MEMORY_PATH {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(std::io::Error::new(
                        e.kind(),
                        format!("cannot create database directory {}: {}", parent.display(), e),
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        debug!("Opened analysis store at {}", path.display());
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Number of stored analyses
    pub fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM analysis_results", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl AnalysisStore for SqliteStore {
    type Error = StoreError;

    fn save(&mut self, filename: &str, result: &AnalysisResult) -> Result<AnalysisId, Self::Error> {
        let content = serde_json::to_string(result)
            .map_err(|e| StoreError::InvalidData(format!("Cannot serialize analysis: {}", e)))?;

        self.conn.execute(
            "INSERT INTO analysis_results (filename, content, created_at) VALUES (?1, ?2, ?3)",
            params![filename, content, Self::now() as i64],
        )?;

        let id = AnalysisId::from_value(self.conn.last_insert_rowid());
        debug!("Saved analysis {} for '{}'", id, filename);
        Ok(id)
    }

    fn get_by_id(&self, id: AnalysisId) -> Result<AnalysisRecord, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT filename, content, created_at FROM analysis_results WHERE id = ?1",
                params![id.value()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        let (filename, content, created_at) = row.ok_or(StoreError::NotFound(id))?;
        let content: AnalysisResult = serde_json::from_str(&content).map_err(|e| {
            StoreError::InvalidData(format!("Analysis {} has corrupt content: {}", id, e))
        })?;

        Ok(AnalysisRecord {
            id,
            filename,
            content,
            created_at: created_at as u64,
        })
    }

    fn list_all(&self) -> Result<Vec<AnalysisSummary>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, created_at FROM analysis_results
             ORDER BY created_at DESC, id DESC",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(AnalysisSummary {
                    id: AnalysisId::from_value(row.get(0)?),
                    filename: row.get(1)?,
                    created_at: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }
}
