//! Patient records and the arena that owns them.
//!
//! A [`Patient`] is immutable once created: the arrival minute and urgency
//! class never change.  Wait time is not stored on the record; it is computed
//! when the patient is served and frozen in the service record.
//!
//! [`PatientArena`] owns every record for a run.  Queues and pools hold
//! [`PatientKey`]s into it, so moving a patient between containers moves a
//! key and never copies the record.

use std::fmt;
use std::str::FromStr;

use crate::{IntakeError, IntakeResult, Minute, PatientId, PatientKey, QueueKind};

// ── Urgency ───────────────────────────────────────────────────────────────────

/// Priority class, fixed at creation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Urgency {
    Urgent,
    Normal,
}

impl Urgency {
    /// The service queue patients of this class are dispatched to.
    #[inline]
    pub fn queue(self) -> QueueKind {
        match self {
            Urgency::Urgent => QueueKind::Urgent,
            Urgency::Normal => QueueKind::Normal,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Urgency::Urgent => "Urgent",
            Urgency::Normal => "Normal",
        })
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" | "u" => Ok(Urgency::Urgent),
            "normal" | "n" => Ok(Urgency::Normal),
            other => Err(format!("invalid urgency {other:?}: expected \"urgent\" or \"normal\"")),
        }
    }
}

// ── Gender ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[inline]
    pub fn tag(self) -> char {
        match self {
            Gender::Male => 'M',
            Gender::Female => 'F',
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim() {
            "M" | "m" => Ok(Gender::Male),
            "F" | "f" => Ok(Gender::Female),
            other => Err(format!("invalid gender {other:?}: expected \"M\" or \"F\"")),
        }
    }
}

// ── Patient ───────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patient {
    pub id:      PatientId,
    pub gender:  Gender,
    pub arrival: Minute,
    pub urgency: Urgency,
}

impl Patient {
    pub fn new(id: PatientId, gender: Gender, arrival: Minute, urgency: Urgency) -> Self {
        Self { id, gender, arrival, urgency }
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} @{}", self.id, self.gender, self.urgency, self.arrival)
    }
}

// ── PatientArena ──────────────────────────────────────────────────────────────

/// Append-only owner of every patient record in a run.
#[derive(Clone, Debug, Default)]
pub struct PatientArena {
    records: Vec<Patient>,
}

impl PatientArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { records: Vec::with_capacity(n) }
    }

    /// Take ownership of `patient` and return its key.
    ///
    /// Fails with [`IntakeError::Config`] once every `u32` key is taken.
    pub fn insert(&mut self, patient: Patient) -> IntakeResult<PatientKey> {
        let key = key_for_slot(self.records.len())?;
        self.records.push(patient);
        Ok(key)
    }

    #[inline]
    pub fn get(&self, key: PatientKey) -> Option<&Patient> {
        self.records.get(key.index())
    }

    /// Like [`get`][Self::get] but maps a missing key to
    /// [`IntakeError::PatientNotFound`].
    pub fn try_get(&self, key: PatientKey) -> IntakeResult<&Patient> {
        self.get(key).ok_or(IntakeError::PatientNotFound(key))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All `(key, patient)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PatientKey, &Patient)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, p)| (PatientKey(i as u32), p))
    }
}

/// Key for the record stored at `slot`.
pub(crate) fn key_for_slot(slot: usize) -> IntakeResult<PatientKey> {
    PatientKey::try_from(slot)
        .map_err(|_| IntakeError::Config(format!("patient arena is full ({slot} records)")))
}

impl std::ops::Index<PatientKey> for PatientArena {
    type Output = Patient;

    #[inline]
    fn index(&self, key: PatientKey) -> &Patient {
        &self.records[key.index()]
    }
}
