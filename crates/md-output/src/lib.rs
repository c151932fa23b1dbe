//! `md-output` — episode output writers for the meal-delivery engine.
//!
//! | Feature   | Backend | Files created                    |
//! |-----------|---------|----------------------------------|
//! | *(none)*  | CSV     | `days.csv`, `deliveries.csv`     |
//! | `sqlite`  | SQLite  | `output.db`                      |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`DayOutputObserver`], which implements `md_sim::MdpObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use md_output::{CsvWriter, DayOutputObserver};
//!
//! let mut obs = DayOutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! for _ in 0..days {
//!     run_day(&mut mdp, &mut policy, &mut obs, max_steps)?;
//! }
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::DayOutputObserver;
pub use row::{DayRow, DeliveryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
