//! Fluent builder for constructing a [`Sim`].

use std::path::Path;

use pi_core::{Patient, SimConfig, SimRng};
use pi_queue::{load_population_csv, PopulationGenerator, RawPatient};

use crate::{Sim, SimError, SimResult};

/// Stream offset for the service-capacity RNG, derived from the root seed.
const CAPACITY_STREAM: u64 = 1;

/// Fluent builder for [`Sim`].
///
/// # Population sources (all optional, combined in call order)
///
/// | Method                 | Source                                        |
/// |------------------------|-----------------------------------------------|
/// | `.patients(v)`         | Already validated `Patient`s                  |
/// | `.raw_records(v)`      | Unvalidated records; bad identifiers dropped  |
/// | `.generated(g)`        | A seeded [`PopulationGenerator`]              |
/// | `.population_csv(p)`   | A CSV file (see [`pi_queue::loader`])         |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .generated(PopulationGenerator::new(300, seed))
///     .build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    patients: Vec<Patient>,
    raw:      Vec<RawPatient>,
    csv_path: Option<std::path::PathBuf>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            patients: Vec::new(),
            raw:      Vec::new(),
            csv_path: None,
        }
    }

    pub fn patients(mut self, patients: Vec<Patient>) -> Self {
        self.patients.extend(patients);
        self
    }

    /// Records whose identifiers have not been checked yet.  Invalid ones are
    /// dropped at [`build`][Self::build] time with a warning.
    pub fn raw_records(mut self, records: Vec<RawPatient>) -> Self {
        self.raw.extend(records);
        self
    }

    pub fn generated(mut self, generator: PopulationGenerator) -> Self {
        self.patients.extend(generator.generate());
        self
    }

    /// Load the population from a CSV file during `build`.
    pub fn population_csv(mut self, path: &Path) -> Self {
        self.csv_path = Some(path.to_path_buf());
        self
    }

    /// Validate the configuration, load any CSV population, and return a
    /// ready-to-run [`Sim`] with every patient in the pending pool.
    pub fn build(self) -> SimResult<Sim> {
        self.config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;

        let mut root = SimRng::new(self.config.seed);
        let capacity = self.patients.len() + self.raw.len();
        let mut sim = Sim::from_parts(self.config, root.child(CAPACITY_STREAM), capacity);

        sim.populate(self.patients)?;

        let rejected = sim.populate_records(self.raw)?;
        if !rejected.is_empty() {
            tracing::warn!(count = rejected.len(), "raw records dropped for invalid identifiers");
        }

        if let Some(path) = self.csv_path {
            let loaded = load_population_csv(&path)?;
            if !loaded.rejected.is_empty() {
                tracing::warn!(
                    path = %path.display(),
                    count = loaded.rejected.len(),
                    "CSV rows dropped for invalid identifiers"
                );
            }
            sim.populate(loaded.patients)?;
        }

        Ok(sim)
    }
}
