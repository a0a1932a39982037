//! Plain data row types written by output backends.
//!
//! Minutes are stored as their integer minute-of-day so rows sort and
//! aggregate numerically; writers may add an `HH:MM` rendering alongside.

use pi_core::Urgency;
use pi_sim::{ServiceEvent, SummaryReport, TickStats};

/// One served patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRow {
    pub served_at:    u32,
    pub patient_id:   String,
    pub urgent:       bool,
    pub arrival:      u32,
    pub wait_minutes: u32,
}

impl From<&ServiceEvent> for ServiceRow {
    fn from(e: &ServiceEvent) -> Self {
        Self {
            served_at:    e.served_at.get(),
            patient_id:   e.id.to_string(),
            urgent:       e.urgency == Urgency::Urgent,
            arrival:      e.arrival.get(),
            wait_minutes: e.wait_minutes,
        }
    }
}

/// Queue sizes and throughput for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub minute:            u32,
    pub dispatched_urgent: u64,
    pub dispatched_normal: u64,
    pub capacity:          u64,
    pub served:            u64,
    pub pending:           u64,
    pub waiting_urgent:    u64,
    pub waiting_normal:    u64,
    pub done:              u64,
}

impl TickSummaryRow {
    pub fn new(minute: u32, stats: &TickStats) -> Self {
        Self {
            minute,
            dispatched_urgent: stats.dispatched.urgent as u64,
            dispatched_normal: stats.dispatched.normal as u64,
            capacity:          stats.capacity as u64,
            served:            stats.served as u64,
            pending:           stats.pending as u64,
            waiting_urgent:    stats.waiting_urgent as u64,
            waiting_normal:    stats.waiting_normal as u64,
            done:              stats.done as u64,
        }
    }
}

/// End-of-run totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummaryRow {
    pub final_minute:         u32,
    pub total_patients:       u64,
    pub total_urgent:         u64,
    pub total_normal:         u64,
    pub served:               u64,
    pub average_wait_minutes: f64,
}

impl RunSummaryRow {
    pub fn new(final_minute: u32, summary: &SummaryReport) -> Self {
        Self {
            final_minute,
            total_patients:       summary.total_patients as u64,
            total_urgent:         summary.total_urgent as u64,
            total_normal:         summary.total_normal as u64,
            served:               summary.served as u64,
            average_wait_minutes: summary.average_wait_minutes,
        }
    }
}
