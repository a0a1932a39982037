//! `NormalQueue` — strict FIFO over normal patients.

use std::collections::VecDeque;

use pi_core::{IntakeError, IntakeResult, Patient, PatientKey, QueueKind, Urgency};

#[derive(Default, Debug)]
pub struct NormalQueue {
    buffer: VecDeque<PatientKey>,
}

impl NormalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a normal patient at the back.
    ///
    /// Fails with [`IntakeError::Invariant`] if `patient` is urgent.
    pub fn push(&mut self, key: PatientKey, patient: &Patient) -> IntakeResult<()> {
        if patient.urgency != Urgency::Normal {
            return Err(IntakeError::Invariant(format!(
                "{key} ({}) pushed onto the normal queue",
                patient.urgency
            )));
        }
        self.buffer.push_back(key);
        Ok(())
    }

    pub fn pop_front(&mut self) -> IntakeResult<PatientKey> {
        self.buffer
            .pop_front()
            .ok_or(IntakeError::EmptyQueue(QueueKind::Normal))
    }

    /// Front-to-back snapshot.
    pub fn peek_all(&self) -> Vec<PatientKey> {
        self.buffer.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
