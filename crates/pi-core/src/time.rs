//! Simulation time model.
//!
//! # Design
//!
//! Time is a minute-of-day counter, `Minute(0)` = 00:00 through
//! `Minute(1439)` = 23:59.  One tick is one simulated minute.  The string
//! form is always zero-padded `HH:MM`, but comparisons and arithmetic only
//! ever touch the integer, so "9:05" vs "10:00" ordering bugs cannot occur.
//!
//! `SimClock` owns the current minute and reports when the day is over; it
//! never wraps past midnight.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::{IntakeError, IntakeResult};

// ── Minute ────────────────────────────────────────────────────────────────────

/// Minute-of-day, 0–1439.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Minute(u16);

impl Minute {
    pub const MIDNIGHT: Minute = Minute(0);

    /// The last representable minute of the day (23:59).
    pub const LAST: Minute = Minute(1439);

    pub const PER_DAY: u32 = 1440;

    /// Validate a raw minute count.
    pub fn new(raw: u32) -> IntakeResult<Self> {
        if raw >= Self::PER_DAY {
            return Err(IntakeError::InvalidTimeValue(raw.to_string()));
        }
        Ok(Minute(raw as u16))
    }

    /// Build from hour (0–23) and minute (0–59).
    pub fn from_hm(hour: u32, minute: u32) -> IntakeResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(IntakeError::InvalidTimeValue(format!("{hour}:{minute}")));
        }
        Ok(Minute((hour * 60 + minute) as u16))
    }

    /// Parse `HH:MM`.  The hour may be one or two digits; the minute must be
    /// exactly two.
    pub fn parse(s: &str) -> IntakeResult<Self> {
        let invalid = || IntakeError::InvalidTimeValue(s.to_owned());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits_only = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits_only(h) || h.len() > 2 || !digits_only(m) || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub fn hour(self) -> u32 {
        self.get() / 60
    }

    #[inline]
    pub fn minute(self) -> u32 {
        self.get() % 60
    }

    /// The next minute, or `None` past 23:59.
    #[inline]
    pub fn next(self) -> Option<Minute> {
        Minute::new(self.get() + 1).ok()
    }

    /// Minutes elapsed from `earlier` to `self`; 0 if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Minute) -> u32 {
        self.get().saturating_sub(earlier.get())
    }
}

impl TryFrom<u32> for Minute {
    type Error = IntakeError;
    fn try_from(raw: u32) -> IntakeResult<Self> {
        Minute::new(raw)
    }
}

impl FromStr for Minute {
    type Err = IntakeError;
    fn from_str(s: &str) -> IntakeResult<Self> {
        Minute::parse(s)
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Manually advanced minute clock.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current minute.
    pub current: Minute,
    /// Last minute the clock may show (inclusive).
    pub end: Minute,
    /// Ticks elapsed since the clock was created.
    pub ticks: u64,
}

impl SimClock {
    pub fn new(start: Minute, end: Minute) -> Self {
        Self { current: start, end, ticks: 0 }
    }

    /// Advance by one minute.  Returns `false` (and leaves the clock on its
    /// final minute) once the next minute would pass `end`.
    #[inline]
    pub fn advance(&mut self) -> bool {
        match self.current.next() {
            Some(next) if next <= self.end => {
                self.current = next;
                self.ticks += 1;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tick {})", self.current, self.ticks)
    }
}

// ── WaitAccounting ────────────────────────────────────────────────────────────

/// How a served patient's final wait time is computed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitAccounting {
    /// `service minute − arrival minute`.
    #[default]
    ArrivalToService,
    /// Wait is never accumulated while queued, so every wait is 0.  Matches
    /// reports produced by the legacy console program.
    Frozen,
}

impl WaitAccounting {
    #[inline]
    pub fn wait_minutes(self, arrival: Minute, served_at: Minute) -> u32 {
        match self {
            WaitAccounting::ArrivalToService => served_at.since(arrival),
            WaitAccounting::Frozen => 0,
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// First simulated minute.  Default: 00:00.
    pub start: Minute,

    /// Last simulated minute (inclusive).  Default: 23:59.
    pub end: Minute,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Per-tick service capacity, drawn uniformly from this inclusive range
    /// by the driver loop.  Default: 5..=10.
    pub serve_min: usize,
    pub serve_max: usize,

    pub wait_accounting: WaitAccounting,

    /// Send observers a status snapshot every N ticks.  1 = every tick,
    /// 0 = never.  Tick statistics are reported every tick regardless.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start:                 Minute::MIDNIGHT,
            end:                   Minute::LAST,
            seed:                  0,
            serve_min:             5,
            serve_max:             10,
            wait_accounting:       WaitAccounting::default(),
            output_interval_ticks: 1,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> IntakeResult<()> {
        if self.start > self.end {
            return Err(IntakeError::Config(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        if self.serve_min > self.serve_max {
            return Err(IntakeError::Config(format!(
                "serve range {}..={} is empty",
                self.serve_min, self.serve_max
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn serve_range(&self) -> RangeInclusive<usize> {
        self.serve_min..=self.serve_max
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start, self.end)
    }
}
