//! SQLite output backend (feature `sqlite`).
//!
//! Creates `output.db` in the output directory with a `days` table and a
//! `deliveries` table keyed by `(day, customer_id)`.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::writer::OutputWriter;
use crate::{DayRow, DeliveryRow, OutputResult};

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS days (
                 day             INTEGER PRIMARY KEY,
                 customers       INTEGER NOT NULL,
                 served          INTEGER NOT NULL,
                 steps           INTEGER NOT NULL,
                 final_time_secs INTEGER NOT NULL,
                 mean_delay_mins REAL
             );
             CREATE TABLE IF NOT EXISTS deliveries (
                 day               INTEGER NOT NULL,
                 customer_id       INTEGER NOT NULL,
                 restaurants       INTEGER NOT NULL,
                 order_time_secs   INTEGER NOT NULL,
                 deadline_secs     INTEGER NOT NULL,
                 delivered_at_secs INTEGER NOT NULL,
                 delay_secs        INTEGER NOT NULL,
                 PRIMARY KEY (day, customer_id)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_day(&mut self, row: &DayRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO days \
             (day, customers, served, steps, final_time_secs, mean_delay_mins) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.day,
                row.customers as i64,
                row.served as i64,
                row.steps as i64,
                row.final_time_secs as i64,
                row.mean_delay_mins,
            ],
        )?;
        Ok(())
    }

    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO deliveries \
                 (day, customer_id, restaurants, order_time_secs, deadline_secs, \
                  delivered_at_secs, delay_secs) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.day,
                    row.customer_id,
                    row.restaurants,
                    row.order_time_secs as i64,
                    row.deadline_secs as i64,
                    row.delivered_at_secs as i64,
                    row.delay_secs as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
