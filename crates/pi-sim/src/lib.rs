//! `pi-sim` — minute-stepped dispatch/serve loop for the patient intake
//! simulator.
//!
//! # Tick loop
//!
//! ```text
//! while running:
//!   ① Dispatch — release pending patients with arrival <= now into the
//!                urgent (priority) or normal (FIFO) queue.
//!   ② Serve    — draw capacity k from config.serve_range(); serve up to k,
//!                urgent queue exhausted before normal queue.
//!   ③ Report   — observer callbacks; status snapshot at output intervals.
//!   ④ Advance  — one minute forward; halt past config.end.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pi_core::SimConfig;
//! use pi_queue::PopulationGenerator;
//! use pi_sim::{NoopObserver, SimBuilder};
//!
//! let config = SimConfig { seed: 42, ..SimConfig::default() };
//! let mut sim = SimBuilder::new(config)
//!     .generated(PopulationGenerator::new(300, 42))
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("{summary}");
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::{DispatchOutcome, ServiceEvent, StatusSnapshot, SummaryReport, TickStats};
pub use sim::{DispatchTotals, RunState, Sim};
