//! `PendingPool` — patients who have not arrived yet.
//!
//! Keys are bucketed by arrival minute in a `BTreeMap`, so releasing every
//! patient with `arrival <= now` is a prefix split of the map: O(log A + k)
//! where A is the number of distinct pending arrival minutes and k the number
//! of patients released.  Nothing is rescanned on later ticks.
//!
//! Within one bucket keys keep population order, which makes the release
//! order (ascending arrival, then population order) reproducible.

use std::collections::BTreeMap;

use pi_core::{Minute, PatientKey};

#[derive(Default, Debug)]
pub struct PendingPool {
    inner: BTreeMap<Minute, Vec<PatientKey>>,
    /// Cached total patient count for O(1) `len()`.
    total: usize,
}

impl PendingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `key` until the clock reaches `arrival`.
    pub fn insert(&mut self, arrival: Minute, key: PatientKey) {
        self.inner.entry(arrival).or_default().push(key);
        self.total += 1;
    }

    /// Remove and return every patient whose arrival is `<= now`.
    ///
    /// Calling again with the same (or an earlier) `now` returns nothing:
    /// released patients are gone from the pool.
    pub fn release_eligible(&mut self, now: Minute) -> Vec<PatientKey> {
        let rest = match now.next() {
            Some(after) => self.inner.split_off(&after),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, rest);

        let released: Vec<PatientKey> = due.into_values().flatten().collect();
        self.total -= released.len();
        released
    }

    /// The earliest pending arrival, or `None` if empty.
    pub fn next_arrival(&self) -> Option<Minute> {
        self.inner.keys().next().copied()
    }

    /// Pending keys in release order (non-destructive).
    pub fn keys(&self) -> impl Iterator<Item = PatientKey> + '_ {
        self.inner.values().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future minutes with at least one pending patient.
    pub fn minute_count(&self) -> usize {
        self.inner.len()
    }
}
