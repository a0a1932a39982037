//! Population sources: the seeded random generator and the identifier
//! screen applied to externally supplied records.
//!
//! Both hand the simulation a fully formed `Vec<Patient>` before the first
//! tick.  Holding a [`Patient`] means its [`PatientId`] already passed the
//! 14-digit check; raw records that fail it are dropped here, logged, and
//! reported back to the caller, never forwarded.

use std::ops::RangeInclusive;

use pi_core::{
    Gender, IntakeError, Minute, PATIENT_ID_LEN, Patient, PatientId, PatientRng, Urgency,
};

// ── Generator ─────────────────────────────────────────────────────────────────

/// Deterministic random population generator.
///
/// Slot `i` is drawn from `PatientRng::new(seed, i)`, so the output depends
/// only on `(seed, count, window, probabilities)`: the `parallel` feature
/// produces exactly the same patients as the sequential path.
#[derive(Clone, Debug)]
pub struct PopulationGenerator {
    count:              usize,
    seed:               u64,
    window:             RangeInclusive<Minute>,
    urgent_probability: f64,
    male_probability:   f64,
}

impl PopulationGenerator {
    /// `count` patients arriving anywhere in the day, each class and gender
    /// equally likely.
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            window:             Minute::MIDNIGHT..=Minute::LAST,
            urgent_probability: 0.5,
            male_probability:   0.5,
        }
    }

    /// Restrict arrivals to `window` (inclusive).  An inverted window is
    /// normalised by swapping its ends.
    pub fn arrival_window(mut self, window: RangeInclusive<Minute>) -> Self {
        let (a, b) = window.into_inner();
        self.window = if a <= b { a..=b } else { b..=a };
        self
    }

    pub fn urgent_probability(mut self, p: f64) -> Self {
        self.urgent_probability = p;
        self
    }

    pub fn male_probability(mut self, p: f64) -> Self {
        self.male_probability = p;
        self
    }

    /// Generate the whole population in slot order.
    pub fn generate(&self) -> Vec<Patient> {
        #[cfg(not(feature = "parallel"))]
        {
            (0..self.count as u64).map(|slot| self.generate_slot(slot)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            (0..self.count as u64)
                .into_par_iter()
                .map(|slot| self.generate_slot(slot))
                .collect()
        }
    }

    fn generate_slot(&self, slot: u64) -> Patient {
        let mut rng = PatientRng::new(self.seed, slot);

        let id = loop {
            let mut digits = [0u8; PATIENT_ID_LEN];
            for d in digits.iter_mut() {
                *d = rng.gen_range(0..10u8);
            }
            match PatientId::from_digits(digits) {
                Ok(id) => break id,
                Err(e) => tracing::warn!(slot, error = %e, "regenerating patient identifier"),
            }
        };

        let gender = if rng.gen_bool(self.male_probability) {
            Gender::Male
        } else {
            Gender::Female
        };

        let (start, end) = (*self.window.start(), *self.window.end());
        let arrival = Minute::new(rng.gen_range(start.get()..=end.get())).unwrap_or(start);

        let urgency = if rng.gen_bool(self.urgent_probability) {
            Urgency::Urgent
        } else {
            Urgency::Normal
        };

        Patient::new(id, gender, arrival, urgency)
    }
}

// ── Screening raw records ─────────────────────────────────────────────────────

/// A patient record whose identifier has not been validated yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawPatient {
    pub id:      String,
    pub gender:  Gender,
    pub arrival: Minute,
    pub urgency: Urgency,
}

/// Outcome of [`screen_records`].
#[derive(Debug, Default)]
pub struct Screened {
    /// Records that passed, in input order.
    pub accepted: Vec<Patient>,
    /// One `InvalidIdentifier` per dropped record, in input order.
    pub rejected: Vec<IntakeError>,
}

/// Split `records` into valid patients and rejected identifiers.
///
/// Invalid identifiers are skipped, not fatal.
pub fn screen_records<I>(records: I) -> Screened
where
    I: IntoIterator<Item = RawPatient>,
{
    let mut out = Screened::default();
    for raw in records {
        match PatientId::parse(&raw.id) {
            Ok(id) => out
                .accepted
                .push(Patient::new(id, raw.gender, raw.arrival, raw.urgency)),
            Err(e) => {
                tracing::warn!(id = %raw.id, "dropping patient with invalid identifier");
                out.rejected.push(e);
            }
        }
    }
    out
}
