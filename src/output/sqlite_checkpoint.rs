//! SQLite checkpoint sink
//!
//! Each snapshot replaces the `origin_emails` table inside one transaction, so
//! concurrent readers see either the previous snapshot or the new one.

use crate::output::traits::{CheckpointWriter, OutputResult};
use crate::state::OriginAggregate;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQL schema for the checkpoint database
pub const SCHEMA_SQL: &str = r#"
-- One row per origin with at least one address
CREATE TABLE IF NOT EXISTS origin_emails (
    url TEXT PRIMARY KEY NOT NULL,
    emails TEXT NOT NULL,
    email_count INTEGER NOT NULL
);

-- One row per checkpoint written
CREATE TABLE IF NOT EXISTS checkpoints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    written_at TEXT NOT NULL,
    origin_count INTEGER NOT NULL,
    email_count INTEGER NOT NULL
);
"#;

/// Writes the aggregate into a SQLite database
pub struct SqliteCheckpoint {
    conn: Connection,
    path: PathBuf,
}

impl SqliteCheckpoint {
    /// Opens (or creates) the checkpoint database
    pub fn open(path: impl Into<PathBuf>) -> OutputResult<Self> {
        let path = path.into();
        let conn = Connection::open(&path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self { conn, path })
    }

    /// Number of checkpoints recorded in this database
    pub fn checkpoint_count(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM checkpoints", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl CheckpointWriter for SqliteCheckpoint {
    fn write(&mut self, aggregate: &OriginAggregate) -> OutputResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM origin_emails", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO origin_emails (url, emails, email_count) VALUES (?1, ?2, ?3)",
            )?;
            for (origin, emails) in aggregate.iter() {
                insert.execute(params![
                    origin,
                    crate::state::join_emails(emails),
                    emails.len() as i64
                ])?;
            }
        }

        tx.execute(
            "INSERT INTO checkpoints (written_at, origin_count, email_count) VALUES (?1, ?2, ?3)",
            params![
                Utc::now().to_rfc3339(),
                aggregate.origin_count() as i64,
                aggregate.email_count() as i64
            ],
        )?;

        tx.commit()?;

        tracing::debug!(
            "Checkpoint written to {} ({} origins)",
            self.path.display(),
            aggregate.origin_count()
        );
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Reads a SQLite checkpoint back as `(origin, emails)` rows, ordered by origin
pub fn read_sqlite_rows(path: &Path) -> OutputResult<Vec<(String, Vec<String>)>> {
    let conn = Connection::open(path)?;
    let mut stmt = conn.prepare("SELECT url, emails FROM origin_emails ORDER BY url")?;

    let rows = stmt
        .query_map([], |row| {
            let origin: String = row.get(0)?;
            let emails: String = row.get(1)?;
            Ok((origin, emails))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows
        .into_iter()
        .map(|(origin, emails)| (origin, crate::output::csv_checkpoint::split_emails(&emails)))
        .collect())
}
