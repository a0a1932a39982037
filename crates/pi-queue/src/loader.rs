//! CSV population loader.
//!
//! # CSV format
//!
//! One row per patient:
//!
//! ```csv
//! id,gender,arrival,urgency
//! 29801011234567,M,05:00,urgent
//! 30112250987654,F,05:00,normal
//! 29905150011223,F,05:02,urgent
//! ```
//!
//! | Column    | Accepted values                                  |
//! |-----------|--------------------------------------------------|
//! | `id`      | any string; must be 14 digits to be accepted     |
//! | `gender`  | `M` / `F`                                        |
//! | `arrival` | `HH:MM`, 00:00–23:59                             |
//! | `urgency` | `urgent` / `normal` (case-insensitive)           |
//!
//! Rows with a bad identifier are dropped and reported in
//! [`LoadedPopulation::rejected`].  Any other malformed field fails the
//! whole load with [`PopulationError::Parse`], naming the row.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use pi_core::{Gender, IntakeError, Minute, Patient, Urgency};

use crate::population::{screen_records, RawPatient};
use crate::PopulationError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PopulationRecord {
    id:      String,
    gender:  String,
    arrival: String,
    urgency: String,
}

/// Result of a successful load.
#[derive(Debug, Default)]
pub struct LoadedPopulation {
    pub patients: Vec<Patient>,
    pub rejected: Vec<IntakeError>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a population from a CSV file.
pub fn load_population_csv(path: &Path) -> Result<LoadedPopulation, PopulationError> {
    let file = std::fs::File::open(path).map_err(PopulationError::Io)?;
    load_population_reader(file)
}

/// Like [`load_population_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded fixtures.
pub fn load_population_reader<R: Read>(reader: R) -> Result<LoadedPopulation, PopulationError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut raw = Vec::new();
    for (i, result) in csv_reader.deserialize::<PopulationRecord>().enumerate() {
        // Row 1 is the header.
        let row_no = i + 2;
        let row = result.map_err(|e| PopulationError::Parse(e.to_string()))?;
        raw.push(parse_record(row, row_no)?);
    }

    let screened = screen_records(raw);
    Ok(LoadedPopulation {
        patients: screened.accepted,
        rejected: screened.rejected,
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_record(row: PopulationRecord, row_no: usize) -> Result<RawPatient, PopulationError> {
    let at_row = |msg: String| PopulationError::Parse(format!("row {row_no}: {msg}"));

    let gender: Gender = row.gender.parse().map_err(at_row)?;
    let urgency: Urgency = row.urgency.parse().map_err(at_row)?;
    let arrival = Minute::parse(&row.arrival).map_err(|e| at_row(e.to_string()))?;

    Ok(RawPatient { id: row.id, gender, arrival, urgency })
}
