//! `pi-output` — run output writers for the patient intake simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend     | Files created                                              |
//! |-----------|-------------|------------------------------------------------------------|
//! | *(none)*  | CSV         | `service_events.csv`, `tick_summaries.csv`, `summary.csv`  |
//! | `sqlite`  | SQLite      | `intake.db`                                                |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `pi_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pi_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{RunSummaryRow, ServiceRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
