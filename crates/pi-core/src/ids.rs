//! Patient identifiers.
//!
//! Two kinds of identity exist side by side:
//!
//! - [`PatientId`] is the national ID carried by the patient: a 14-digit
//!   numeric string.  It is validated once at construction, so holding a
//!   `PatientId` proves the format check passed.  Duplicates are legal.
//! - [`PatientKey`] is the arena index assigned when a patient is added to a
//!   simulation.  It is `Copy` and unique per run, which is what the queues
//!   store and move around.

use std::fmt;
use std::str::FromStr;

use crate::{IntakeError, IntakeResult};

/// Required length of a patient identifier.
pub const PATIENT_ID_LEN: usize = 14;

// ── PatientId ─────────────────────────────────────────────────────────────────

/// A validated 14-digit patient identifier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatientId([u8; PATIENT_ID_LEN]);

impl PatientId {
    /// Pure format predicate: exactly 14 ASCII digits.
    pub fn is_valid(raw: &str) -> bool {
        raw.len() == PATIENT_ID_LEN && raw.bytes().all(|b| b.is_ascii_digit())
    }

    /// Validate `raw` and wrap it.
    pub fn parse(raw: &str) -> IntakeResult<Self> {
        if !Self::is_valid(raw) {
            return Err(IntakeError::InvalidIdentifier(raw.to_owned()));
        }
        let mut digits = [0u8; PATIENT_ID_LEN];
        digits.copy_from_slice(raw.as_bytes());
        Ok(PatientId(digits))
    }

    /// Build from numeric digit values (0–9 each), as a generator produces
    /// them.  Fails if any value is not a single decimal digit.
    pub fn from_digits(values: [u8; PATIENT_ID_LEN]) -> IntakeResult<Self> {
        let mut digits = [0u8; PATIENT_ID_LEN];
        for (slot, &v) in digits.iter_mut().zip(values.iter()) {
            if v > 9 {
                let shown: String = values.iter().map(|d| d.to_string()).collect();
                return Err(IntakeError::InvalidIdentifier(shown));
            }
            *slot = b'0' + v;
        }
        Ok(PatientId(digits))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for PatientId {
    type Err = IntakeError;

    fn from_str(s: &str) -> IntakeResult<Self> {
        PatientId::parse(s)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PatientKey ────────────────────────────────────────────────────────────────

/// Index of a patient in a [`PatientArena`][crate::PatientArena].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatientKey(pub u32);

impl PatientKey {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PatientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatientKey({})", self.0)
    }
}

impl TryFrom<usize> for PatientKey {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<PatientKey, Self::Error> {
        u32::try_from(n).map(PatientKey)
    }
}
