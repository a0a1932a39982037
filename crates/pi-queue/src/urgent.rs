//! `UrgentQueue` — urgent patients, earliest arrival first.
//!
//! A `BinaryHeap` of `Reverse` entries makes it a min-heap on
//! `(arrival, seq)`.  `seq` is a per-queue insertion counter, so two urgent
//! patients with the same arrival minute leave in the order they were pushed
//! and every run with the same input pops in the same order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use pi_core::{IntakeError, IntakeResult, Minute, Patient, PatientKey, QueueKind, Urgency};

/// Heap entry.  Field order is the priority order (derived `Ord`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
struct Entry {
    arrival: Minute,
    seq:     u64,
    key:     PatientKey,
}

#[derive(Default, Debug)]
pub struct UrgentQueue {
    heap:     BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl UrgentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an urgent patient.  O(log n).
    ///
    /// Fails with [`IntakeError::Invariant`] if `patient` is not urgent; the
    /// queue is left unchanged.
    pub fn push(&mut self, key: PatientKey, patient: &Patient) -> IntakeResult<()> {
        if patient.urgency != Urgency::Urgent {
            return Err(IntakeError::Invariant(format!(
                "{key} ({}) pushed onto the urgent queue",
                patient.urgency
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { arrival: patient.arrival, seq, key }));
        Ok(())
    }

    /// Remove and return the patient with the earliest arrival.
    pub fn pop_highest_priority(&mut self) -> IntakeResult<PatientKey> {
        self.heap
            .pop()
            .map(|Reverse(entry)| entry.key)
            .ok_or(IntakeError::EmptyQueue(QueueKind::Urgent))
    }

    /// Arrival minute of the current head, if any.
    pub fn peek_arrival(&self) -> Option<Minute> {
        self.heap.peek().map(|Reverse(entry)| entry.arrival)
    }

    /// Keys in the order they would be popped.  Does not touch the queue.
    pub fn peek_all(&self) -> Vec<PatientKey> {
        let mut entries: Vec<Entry> = self.heap.iter().map(|Reverse(e)| *e).collect();
        entries.sort_unstable();
        entries.into_iter().map(|e| e.key).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
