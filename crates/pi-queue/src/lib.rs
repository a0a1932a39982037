//! `pi-queue` — the containers a patient moves through, plus the sources
//! that fill them.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`pending`]     | `PendingPool` (`BTreeMap<Minute, Vec<PatientKey>>`)       |
//! | [`urgent`]      | `UrgentQueue` (min-heap on arrival, FIFO tie-break)       |
//! | [`normal`]      | `NormalQueue` (strict FIFO)                               |
//! | [`population`]  | `PopulationGenerator`, `RawPatient`, `screen_records`     |
//! | [`loader`]      | `load_population_csv`, `load_population_reader`           |
//! | [`error`]       | `PopulationError`, `PopulationResult<T>`                  |
//!
//! # Ownership model
//!
//! Records live in a [`pi_core::PatientArena`]; every container here stores
//! [`pi_core::PatientKey`]s.  A key leaves one container before it enters the
//! next, so a patient is never in two places at once.

pub mod error;
pub mod loader;
pub mod normal;
pub mod pending;
pub mod population;
pub mod urgent;


pub use error::{PopulationError, PopulationResult};
pub use loader::{load_population_csv, load_population_reader, LoadedPopulation};
pub use normal::NormalQueue;
pub use pending::PendingPool;
pub use population::{screen_records, PopulationGenerator, RawPatient, Screened};
pub use urgent::UrgentQueue;
