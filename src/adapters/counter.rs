use crate::domain::ports::UsageCounter;
use crate::utils::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contador (
    id INTEGER PRIMARY KEY,
    count INTEGER NOT NULL
);
INSERT OR IGNORE INTO contador (id, count) VALUES (1, 0);
";

/// Persistent count of completed comparisons, stored in a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteUsageCounter {
    path: PathBuf,
}

impl SqliteUsageCounter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let counter = Self {
            path: path.as_ref().to_path_buf(),
        };
        counter.connect()?;
        Ok(counter)
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA)?;
        Self::ensure_updated_at(&conn)?;
        Ok(conn)
    }

    /// 舊版資料庫只有 (id, count) 兩欄，補上 updated_at
    fn ensure_updated_at(conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare("PRAGMA table_info(contador)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if !columns.iter().any(|name| name == "updated_at") {
            conn.execute("ALTER TABLE contador ADD COLUMN updated_at TEXT", [])?;
            tracing::debug!("Added updated_at column to usage counter table");
        }
        Ok(())
    }

    /// 最後一次遞增的時間（RFC 3339）
    pub fn last_updated(&self) -> Result<Option<String>> {
        let conn = self.connect()?;
        let updated: Option<Option<String>> = conn
            .query_row("SELECT updated_at FROM contador WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        Ok(updated.flatten())
    }
}

impl UsageCounter for SqliteUsageCounter {
    fn current(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COALESCE(count, 0) FROM contador WHERE id = 1", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn increment(&self) -> Result<u64> {
        let conn = self.connect()?;
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE contador SET count = COALESCE(count, 0) + 1, updated_at = ?1 WHERE id = 1",
            params![now],
        )?;
        let count: i64 = conn.query_row("SELECT COALESCE(count, 0) FROM contador WHERE id = 1", [], |row| row.get(0))?;
        tracing::debug!("Usage counter incremented to {}", count);
        Ok(count.max(0) as u64)
    }
}
