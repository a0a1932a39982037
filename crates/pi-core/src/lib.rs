//! `pi-core` — foundational types for the patient intake simulator.
//!
//! This crate is a dependency of every other `pi-*` crate.  It has no `pi-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PatientId` (14-digit), `PatientKey` (arena index)    |
//! | [`time`]        | `Minute`, `SimClock`, `SimConfig`, `WaitAccounting`   |
//! | [`patient`]     | `Patient`, `Urgency`, `Gender`, `PatientArena`        |
//! | [`rng`]         | `PatientRng` (per-slot), `SimRng` (global)            |
//! | [`error`]       | `IntakeError`, `IntakeResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod ids;
pub mod patient;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{IntakeError, IntakeResult, QueueKind};
pub use ids::{PatientId, PatientKey, PATIENT_ID_LEN};
pub use patient::{Gender, Patient, PatientArena, Urgency};
pub use rng::{PatientRng, SimRng};
pub use time::{Minute, SimClock, SimConfig, WaitAccounting};
