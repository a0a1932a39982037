//! Read-only views produced by the simulation: service events, per-tick
//! statistics, the status snapshot, and the end-of-run summary.
//!
//! The `Display` impls render the same console layout the front-desk
//! operators are used to (id lists separated by spaces, then a summary
//! block).

use std::fmt;

use pi_core::{Minute, PatientId, PatientKey, Urgency};

/// One patient leaving a queue for the Done collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceEvent {
    pub key:          PatientKey,
    pub id:           PatientId,
    pub urgency:      Urgency,
    pub arrival:      Minute,
    pub served_at:    Minute,
    /// Frozen at service time; never changes afterwards.
    pub wait_minutes: u32,
}

impl fmt::Display for ServiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Serving Patient ID: {}, Type: {}, Wait Time: {} minutes.",
            self.id, self.urgency, self.wait_minutes
        )
    }
}

/// How many patients one `dispatch` call moved into each queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub urgent: usize,
    pub normal: usize,
}

impl DispatchOutcome {
    #[inline]
    pub fn total(&self) -> usize {
        self.urgent + self.normal
    }
}

/// Counts reported to observers at the end of each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub dispatched:     DispatchOutcome,
    /// Capacity drawn for this tick.
    pub capacity:       usize,
    pub served:         usize,
    pub pending:        usize,
    pub waiting_urgent: usize,
    pub waiting_normal: usize,
    pub done:           usize,
}

// ── StatusSnapshot ────────────────────────────────────────────────────────────

/// Ordered identifiers of every queued and served patient.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Priority order (next to be served first).
    pub waiting_urgent: Vec<PatientId>,
    /// FIFO order.
    pub waiting_normal: Vec<PatientId>,
    /// Service order.
    pub done:           Vec<PatientId>,
}

fn write_ids(f: &mut fmt::Formatter<'_>, ids: &[PatientId]) -> fmt::Result {
    for id in ids {
        write!(f, "{id} ")?;
    }
    writeln!(f)
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Waiting Urgent Patients:")?;
        write_ids(f, &self.waiting_urgent)?;
        writeln!(f)?;
        writeln!(f, "Waiting Normal Patients:")?;
        write_ids(f, &self.waiting_normal)?;
        writeln!(f)?;
        writeln!(f, "Done Patients:")?;
        write_ids(f, &self.done)
    }
}

// ── SummaryReport ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SummaryReport {
    /// Patients dispatched so far (urgent + normal).
    pub total_patients:       usize,
    pub total_urgent:         usize,
    pub total_normal:         usize,
    pub served:               usize,
    /// Mean frozen wait over served patients; 0 when nobody was served.
    pub average_wait_minutes: f64,
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Summary:")?;
        writeln!(f, "--------------------------------")?;
        writeln!(f, "Total Patients: {}", self.total_patients)?;
        writeln!(f, "Urgent Patients: {}", self.total_urgent)?;
        writeln!(f, "Normal Patients: {}", self.total_normal)?;
        writeln!(f, "Served Patients: {}", self.served)?;
        writeln!(f, "Average Waiting Time: {:.2} minutes.", self.average_wait_minutes)
    }
}
