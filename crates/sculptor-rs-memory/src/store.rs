//! Artifact store abstraction and the SQLite-backed implementation.

use crate::error::StoreError;
use crate::model::{GenerationRecord, NewGenerationRecord};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS generations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    prompt TEXT NOT NULL,
    enhanced_prompt TEXT NOT NULL,
    image_path TEXT NOT NULL,
    model_path TEXT NOT NULL,
    image_data BLOB,
    model_data BLOB
);
";

const SELECT_COLUMNS: &str = "SELECT id, timestamp, prompt, enhanced_prompt, image_path, model_path, image_data, model_data FROM generations";

#[async_trait]
/// Append-only persistence for generation records.
pub trait ArtifactStore: Send + Sync {
    /// Persist a new record, assigning its id and timestamp.
    async fn append(&self, record: NewGenerationRecord) -> Result<GenerationRecord, StoreError>;

    /// All records, newest first.
    async fn list_all(&self) -> Result<Vec<GenerationRecord>, StoreError>;

    /// Number of persisted records.
    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list_all().await?.len())
    }

    /// Most recently appended record, if any.
    async fn latest(&self) -> Result<Option<GenerationRecord>, StoreError> {
        Ok(self.list_all().await?.into_iter().next())
    }
}

/// SQLite-backed artifact store with a single serialized writer.
pub struct SqliteArtifactStore {
    /// Connection shared by all callers; the lock serializes writes.
    conn: Mutex<Connection>,
    /// Database location, `None` for in-memory stores.
    path: Option<PathBuf>,
}

impl SqliteArtifactStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        info!("initialized sqlite artifact store (path={})", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        debug!("initialized in-memory artifact store");
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database path, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Row as read from SQLite, before timestamp parsing.
struct RawRow {
    id: i64,
    timestamp: String,
    prompt: String,
    enhanced_prompt: String,
    image_path: String,
    model_path: String,
    image_data: Option<Vec<u8>>,
    model_data: Option<Vec<u8>>,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            prompt: row.get(2)?,
            enhanced_prompt: row.get(3)?,
            image_path: row.get(4)?,
            model_path: row.get(5)?,
            image_data: row.get(6)?,
            model_data: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<GenerationRecord, StoreError> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        Ok(GenerationRecord {
            id: self.id,
            timestamp,
            original_prompt: self.prompt,
            enhanced_prompt: self.enhanced_prompt,
            image_ref: self.image_path,
            model_ref: self.model_path,
            image_bytes: self.image_data,
            model_bytes: self.model_data,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| StoreError::InvalidTimestamp {
            value: value.to_string(),
            message: err.to_string(),
        })
}

#[async_trait]
impl ArtifactStore for SqliteArtifactStore {
    async fn append(&self, record: NewGenerationRecord) -> Result<GenerationRecord, StoreError> {
        // Stored with microsecond precision; truncate so the returned record
        // matches what a later read produces.
        let timestamp = Utc::now().trunc_subsecs(6);
        let id = {
            let conn = self.conn.lock();
            conn.execute(
                "INSERT INTO generations
                    (timestamp, prompt, enhanced_prompt, image_path, model_path, image_data, model_data)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                    record.original_prompt,
                    record.enhanced_prompt,
                    record.image_ref,
                    record.model_ref,
                    record.image_bytes.as_deref(),
                    record.model_bytes.as_deref(),
                ],
            )?;
            conn.last_insert_rowid()
        };
        debug!(
            "stored generation record (id={}, prompt_len={}, image_bytes={}, model_bytes={})",
            id,
            record.original_prompt.len(),
            record.image_bytes.as_ref().map_or(0, Vec::len),
            record.model_bytes.as_ref().map_or(0, Vec::len)
        );
        Ok(record.into_record(id, timestamp))
    }

    async fn list_all(&self) -> Result<Vec<GenerationRecord>, StoreError> {
        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id DESC"))?;
            let rows = stmt
                .query_map([], RawRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        debug!("loaded generation history (records={})", rows.len());
        rows.into_iter().map(RawRow::into_record).collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM generations", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn latest(&self) -> Result<Option<GenerationRecord>, StoreError> {
        let row = {
            let conn = self.conn.lock();
            conn.query_row(
                &format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT 1"),
                [],
                RawRow::from_row,
            )
            .optional()?
        };
        row.map(RawRow::into_record).transpose()
    }
}
