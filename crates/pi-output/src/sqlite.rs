//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `intake.db` file in the configured output directory with
//! three tables: `service_events`, `tick_summaries`, and `run_summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, RunSummaryRow, ServiceRow, TickSummaryRow};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `intake.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("intake.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS service_events (
                 served_at    INTEGER NOT NULL,
                 patient_id   TEXT    NOT NULL,
                 urgent       INTEGER NOT NULL,
                 arrival      INTEGER NOT NULL,
                 wait_minutes INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 minute            INTEGER PRIMARY KEY,
                 dispatched_urgent INTEGER NOT NULL,
                 dispatched_normal INTEGER NOT NULL,
                 capacity          INTEGER NOT NULL,
                 served            INTEGER NOT NULL,
                 pending           INTEGER NOT NULL,
                 waiting_urgent    INTEGER NOT NULL,
                 waiting_normal    INTEGER NOT NULL,
                 done              INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS run_summary (
                 final_minute         INTEGER NOT NULL,
                 total_patients       INTEGER NOT NULL,
                 total_urgent         INTEGER NOT NULL,
                 total_normal         INTEGER NOT NULL,
                 served               INTEGER NOT NULL,
                 average_wait_minutes REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_services(&mut self, rows: &[ServiceRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO service_events \
                 (served_at, patient_id, urgent, arrival, wait_minutes) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.served_at,
                    row.patient_id,
                    row.urgent as i64,
                    row.arrival,
                    row.wait_minutes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (minute, dispatched_urgent, dispatched_normal, capacity, served, \
              pending, waiting_urgent, waiting_normal, done) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.minute,
                row.dispatched_urgent,
                row.dispatched_normal,
                row.capacity,
                row.served,
                row.pending,
                row.waiting_urgent,
                row.waiting_normal,
                row.done,
            ],
        )?;
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO run_summary \
             (final_minute, total_patients, total_urgent, total_normal, served, \
              average_wait_minutes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.final_minute,
                row.total_patients,
                row.total_urgent,
                row.total_normal,
                row.served,
                row.average_wait_minutes,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
