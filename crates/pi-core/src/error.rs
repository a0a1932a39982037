//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `IntakeError` as one
//! variant via `#[from]`.  None of these errors is fatal: every failure is
//! local and the driver can retry with corrected input.

use std::fmt;

use thiserror::Error;

use crate::PatientKey;

/// Which service queue an operation targeted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueueKind {
    Urgent,
    Normal,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueueKind::Urgent => "urgent",
            QueueKind::Normal => "normal",
        })
    }
}

/// The top-level error type for `pi-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// A direct pop on an empty queue.  `serve` never raises this.
    #[error("{0} queue is empty")]
    EmptyQueue(QueueKind),

    #[error("invalid patient identifier {0:?}: expected exactly 14 ASCII digits")]
    InvalidIdentifier(String),

    #[error("invalid time value {0:?}: expected HH:MM between 00:00 and 23:59")]
    InvalidTimeValue(String),

    #[error("patient {0} not found")]
    PatientNotFound(PatientKey),

    #[error("container invariant violated: {0}")]
    Invariant(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `pi-*` crates.
pub type IntakeResult<T> = Result<T, IntakeError>;
