// src/db.rs
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;

const INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS scan_cursor (
  contract   TEXT NOT NULL,
  topic      TEXT NOT NULL,
  next_block INTEGER NOT NULL,
  updated_at TEXT NOT NULL,
  PRIMARY KEY (contract, topic)
);
"#;

/// Where a previous scan of (contract, topic) left off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub next_block: u64,
    pub updated_at: DateTime<Utc>,
}

/// Persisted scan cursor, one row per contract/topic pair
pub struct CheckpointStore {
    conn: Connection,
}

impl CheckpointStore {
    /// Open (or create) the cursor database, WAL mode for file-backed paths
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(INIT_SQL)?;
        Ok(Self { conn })
    }

    pub fn load(&self, contract: &str, topic: &str) -> Result<Option<Checkpoint>> {
        let row = self
            .conn
            .query_row(
                "SELECT next_block, updated_at FROM scan_cursor
                 WHERE LOWER(contract) = LOWER(?1) AND LOWER(topic) = LOWER(?2)",
                params![contract, topic],
                |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)),
            )
            .optional()?;

        Ok(row.map(|(next_block, updated_at)| Checkpoint {
            next_block: next_block.max(0) as u64,
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        }))
    }

    /// Record that every block below `next_block` has been scanned
    pub fn save(&self, contract: &str, topic: &str, next_block: u64) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO scan_cursor (contract, topic, next_block, updated_at)
            VALUES (LOWER(?1), LOWER(?2), ?3, ?4)
            ON CONFLICT(contract, topic) DO UPDATE SET
                next_block = excluded.next_block,
                updated_at = excluded.updated_at
            "#,
            params![contract, topic, next_block as i64, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
