//! Deterministic per-patient and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Population generation gives every patient slot its own `SmallRng` seeded
//! by:
//!
//!   seed = global_seed XOR (slot * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive slots uniformly across the seed space.  Slot `i`
//! therefore draws the same patient whether the population is generated
//! sequentially or on a thread pool, and growing the population does not
//! disturb the patients already generated.
//!
//! Everything else (per-tick service capacity) draws from one `SimRng`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── PatientRng ────────────────────────────────────────────────────────────────

/// Per-slot deterministic RNG used while generating one patient.
pub struct PatientRng(SmallRng);

impl PatientRng {
    /// Seed deterministically from the run's global seed and a slot index.
    pub fn new(global_seed: u64, slot: u64) -> Self {
        let seed = global_seed ^ slot.wrapping_mul(MIXING_CONSTANT);
        PatientRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global draws (service capacity per tick).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
