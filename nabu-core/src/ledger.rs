//! The job ledger (C7): an append-only record of completed work, enabling
//! crash-resumable sweeps (§4.7).
//!
//! The driver is the ledger's only writer (marks happen in the dispatch
//! loop after a worker returns its result), so no cross-worker write
//! contention needs to be designed for here.

use std::collections::HashSet;
use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::Result;

/// Persistent handle over the job ledger's SQLite file.
pub struct JobLedger {
    conn: Connection,
}

impl JobLedger {
    /// Open (creating if absent) the job ledger at `path`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] if the file cannot be
    /// opened or the schema cannot be created. Per §4.7, a caller that
    /// cannot open the ledger should warn and continue without resumption
    /// rather than treat this as fatal.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "create table if not exists jobs (job_id text not null, path text not null)",
            [],
        )?;
        conn.execute(
            "create index if not exists jobs_job_id on jobs(job_id)",
            [],
        )?;
        Ok(Self { conn })
    }

    /// The set of paths already marked complete under `job_id`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn completed(&self, job_id: &str) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("select path from jobs where job_id = ?1")?;
        let rows = stmt.query_map(params![job_id], |row| row.get::<_, String>(0))?;
        let mut out = HashSet::new();
        for row in rows {
            out.insert(row?);
        }
        Ok(out)
    }

    /// Record `path` as complete under `job_id`. Durable on return, so a
    /// caller that marks before dispatching the next task guarantees
    /// resumption skips only genuinely finished items. Duplicate marks are
    /// allowed and benign (§3's Job Record lifecycle).
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn mark(&self, job_id: &str, path: &str) -> Result<()> {
        self.conn.execute(
            "insert into jobs (job_id, path) values (?1, ?2)",
            params![job_id, path],
        )?;
        Ok(())
    }
}
