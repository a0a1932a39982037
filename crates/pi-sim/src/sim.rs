//! The `Sim` struct and its tick loop.

use pi_core::{
    IntakeError, IntakeResult, Minute, Patient, PatientArena, PatientId, PatientKey, SimClock,
    SimConfig, SimRng, Urgency,
};
use pi_queue::{screen_records, NormalQueue, PendingPool, RawPatient, UrgentQueue};

use crate::{
    DispatchOutcome, ServiceEvent, SimObserver, SimResult, StatusSnapshot, SummaryReport,
    TickStats,
};

/// Whether the tick loop may continue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Stopped by [`Sim::stop`] or because the clock passed its last minute.
    /// Terminal.
    Halted,
}

/// Running totals of dispatched patients.  Monotonic; never reset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchTotals {
    pub urgent: usize,
    pub normal: usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The intake simulation.
///
/// `Sim` owns every patient (in a [`PatientArena`]) and the four containers
/// a patient key can be in:
///
/// ```text
/// pending ──dispatch──▶ urgent ─┐
///         └────────────▶ normal ─┴──serve──▶ done
/// ```
///
/// Each tick of [`step`][Self::step]:
///
/// 1. **Dispatch** — release every pending patient with `arrival <= now` and
///    route it by class.
/// 2. **Serve** — draw this tick's capacity from the configured range and
///    serve up to that many patients, urgent queue first.
/// 3. **Report** — observer callbacks; status snapshot at output intervals.
/// 4. **Advance** — one minute forward, or halt past the last minute.
///
/// The driver may also call [`dispatch`][Self::dispatch],
/// [`serve`][Self::serve] and [`advance_time`][Self::advance_time] itself;
/// within a tick `dispatch` must come before `serve`.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    /// Current minute.  Serving stamps `served_at` from here.
    pub clock: SimClock,

    pub arena: PatientArena,

    pub pending: PendingPool,
    pub urgent:  UrgentQueue,
    pub normal:  NormalQueue,
    /// Served patients, in service order.
    pub done:    Vec<ServiceEvent>,

    pub totals: DispatchTotals,

    /// Sum of frozen wait minutes over `done`.
    total_wait: u64,

    /// Draws per-tick service capacity.
    rng: SimRng,

    state: RunState,
}

impl Sim {
    pub(crate) fn from_parts(config: SimConfig, rng: SimRng, capacity: usize) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            arena: PatientArena::with_capacity(capacity),
            pending: PendingPool::new(),
            urgent: UrgentQueue::new(),
            normal: NormalQueue::new(),
            done: Vec::new(),
            totals: DispatchTotals::default(),
            total_wait: 0,
            rng,
            state: RunState::Running,
        }
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Seed the pending pool.  Returns the arena keys in input order.
    ///
    /// Every `Patient` already carries a validated identifier; duplicates are
    /// kept as separate entries.
    pub fn populate<I>(&mut self, patients: I) -> IntakeResult<Vec<PatientKey>>
    where
        I: IntoIterator<Item = Patient>,
    {
        let mut keys = Vec::new();
        for patient in patients {
            let arrival = patient.arrival;
            let key = self.arena.insert(patient)?;
            self.pending.insert(arrival, key);
            keys.push(key);
        }
        Ok(keys)
    }

    /// Screen raw records and populate with the ones that pass.  Returns one
    /// `InvalidIdentifier` per dropped record.
    pub fn populate_records<I>(&mut self, records: I) -> IntakeResult<Vec<IntakeError>>
    where
        I: IntoIterator<Item = RawPatient>,
    {
        let screened = screen_records(records);
        self.populate(screened.accepted)?;
        Ok(screened.rejected)
    }

    // ── Dispatcher ────────────────────────────────────────────────────────

    /// Move every patient with `arrival <= now` from the pending pool into the
    /// queue for its class.
    ///
    /// If `now` is ahead of the clock the clock jumps forward to it, so
    /// patients served afterwards are stamped with the dispatch minute.  A
    /// `now` past the last minute of the run fails with
    /// [`IntakeError::InvalidTimeValue`] and changes nothing.  Once halted,
    /// dispatch moves no one.
    pub fn dispatch(&mut self, now: Minute) -> SimResult<DispatchOutcome> {
        if self.is_halted() {
            return Ok(DispatchOutcome::default());
        }
        if now > self.clock.end {
            tracing::warn!(%now, end = %self.clock.end, "dispatch past the last minute rejected");
            return Err(IntakeError::InvalidTimeValue(now.to_string()).into());
        }
        if now > self.clock.current {
            self.clock.current = now;
        }

        let mut outcome = DispatchOutcome::default();
        for key in self.pending.release_eligible(now) {
            let patient = self.arena.try_get(key)?;
            match patient.urgency {
                Urgency::Urgent => {
                    self.urgent.push(key, patient)?;
                    outcome.urgent += 1;
                }
                Urgency::Normal => {
                    self.normal.push(key, patient)?;
                    outcome.normal += 1;
                }
            }
        }

        self.totals.urgent += outcome.urgent;
        self.totals.normal += outcome.normal;
        if outcome.total() > 0 {
            tracing::debug!(%now, urgent = outcome.urgent, normal = outcome.normal, "dispatched");
        }
        Ok(outcome)
    }

    /// [`dispatch`][Self::dispatch] with an `HH:MM` string.
    ///
    /// A malformed or out-of-range time fails with
    /// [`IntakeError::InvalidTimeValue`] before anything is touched.
    pub fn dispatch_at(&mut self, hhmm: &str) -> SimResult<DispatchOutcome> {
        let now = Minute::parse(hhmm).inspect_err(|e| {
            tracing::warn!(error = %e, "tick aborted");
        })?;
        self.dispatch(now)
    }

    // ── Server ────────────────────────────────────────────────────────────

    /// Serve up to `max_count` patients, urgent queue first.
    ///
    /// Running out of patients ends the loop early and is not an error.
    /// Returns the service events in service order; empty once halted.
    pub fn serve(&mut self, max_count: usize) -> SimResult<Vec<ServiceEvent>> {
        let mut events = Vec::new();
        if self.is_halted() {
            return Ok(events);
        }
        for _ in 0..max_count {
            let key = if !self.urgent.is_empty() {
                self.urgent.pop_highest_priority()?
            } else if !self.normal.is_empty() {
                self.normal.pop_front()?
            } else {
                break;
            };
            events.push(self.finish_service(key)?);
        }
        Ok(events)
    }

    /// Freeze the wait time of `key` and append it to `done`.
    fn finish_service(&mut self, key: PatientKey) -> IntakeResult<ServiceEvent> {
        let patient = self.arena.try_get(key)?;
        let served_at = self.clock.current;
        let wait_minutes = self
            .config
            .wait_accounting
            .wait_minutes(patient.arrival, served_at);

        let event = ServiceEvent {
            key,
            id: patient.id,
            urgency: patient.urgency,
            arrival: patient.arrival,
            served_at,
            wait_minutes,
        };
        tracing::info!(
            id = %event.id,
            class = %event.urgency,
            wait = event.wait_minutes,
            "serving patient"
        );

        self.total_wait += wait_minutes as u64;
        self.done.push(event);
        Ok(event)
    }

    // ── Clock & loop ──────────────────────────────────────────────────────

    /// Advance the clock one minute.  Halts instead of passing `config.end`.
    pub fn advance_time(&mut self) -> RunState {
        if self.state == RunState::Running && !self.clock.advance() {
            tracing::debug!(last = %self.clock.current, "end of day reached");
            self.state = RunState::Halted;
        }
        self.state
    }

    /// Explicit stop command.  Takes effect at the next tick boundary.
    pub fn stop(&mut self) {
        self.state = RunState::Halted;
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    #[inline]
    pub fn now(&self) -> Minute {
        self.clock.current
    }

    /// Process one tick at the current minute and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunState> {
        if self.is_halted() {
            return Ok(RunState::Halted);
        }
        let now = self.clock.current;
        observer.on_tick_start(now);

        let dispatched = self.dispatch(now)?;
        observer.on_dispatch(now, dispatched);

        let capacity = self.rng.gen_range(self.config.serve_range());
        let served = self.serve(capacity)?;
        for event in &served {
            observer.on_serve(event);
        }

        let stats = TickStats {
            dispatched,
            capacity,
            served: served.len(),
            pending: self.pending.len(),
            waiting_urgent: self.urgent.len(),
            waiting_normal: self.normal.len(),
            done: self.done.len(),
        };
        observer.on_tick_end(now, &stats);

        let interval = self.config.output_interval_ticks;
        if interval > 0 && self.clock.ticks % interval == 0 {
            observer.on_status(now, &self.status_snapshot());
        }

        Ok(self.advance_time())
    }

    /// Step until halted, then report the summary.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<SummaryReport> {
        while self.step(observer)? == RunState::Running {}
        let summary = self.summary_report();
        observer.on_sim_end(self.clock.current, &summary);
        Ok(summary)
    }

    /// Step at most `n` ticks (fewer if the run halts).  Does not call
    /// `on_sim_end`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<RunState> {
        for _ in 0..n {
            if self.step(observer)? == RunState::Halted {
                break;
            }
        }
        Ok(self.state)
    }

    // ── Reporter ──────────────────────────────────────────────────────────

    fn ids(&self, keys: impl IntoIterator<Item = PatientKey>) -> Vec<PatientId> {
        keys.into_iter()
            .filter_map(|k| self.arena.get(k).map(|p| p.id))
            .collect()
    }

    /// Urgent queue identifiers in priority order.
    pub fn waiting_urgent(&self) -> Vec<PatientId> {
        self.ids(self.urgent.peek_all())
    }

    /// Normal queue identifiers in FIFO order.
    pub fn waiting_normal(&self) -> Vec<PatientId> {
        self.ids(self.normal.peek_all())
    }

    /// Served identifiers in service order.
    pub fn done_ids(&self) -> Vec<PatientId> {
        self.done.iter().map(|e| e.id).collect()
    }

    pub fn average_wait_minutes(&self) -> f64 {
        if self.done.is_empty() {
            0.0
        } else {
            self.total_wait as f64 / self.done.len() as f64
        }
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            waiting_urgent: self.waiting_urgent(),
            waiting_normal: self.waiting_normal(),
            done:           self.done_ids(),
        }
    }

    pub fn summary_report(&self) -> SummaryReport {
        SummaryReport {
            total_patients:       self.totals.urgent + self.totals.normal,
            total_urgent:         self.totals.urgent,
            total_normal:         self.totals.normal,
            served:               self.done.len(),
            average_wait_minutes: self.average_wait_minutes(),
        }
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check that every arena key sits in exactly one container and that
    /// each queue holds only its own class.
    pub fn audit(&self) -> IntakeResult<()> {
        let mut seen = vec![0u8; self.arena.len()];
        let mut mark = |key: PatientKey, place: &str| -> IntakeResult<()> {
            let slot = seen
                .get_mut(key.index())
                .ok_or_else(|| IntakeError::Invariant(format!("{key} in {place} is not in the arena")))?;
            *slot += 1;
            if *slot > 1 {
                return Err(IntakeError::Invariant(format!("{key} found twice (again in {place})")));
            }
            Ok(())
        };

        for key in self.pending.keys() {
            mark(key, "pending")?;
        }
        for key in self.urgent.peek_all() {
            mark(key, "urgent queue")?;
            if self.arena[key].urgency != Urgency::Urgent {
                return Err(IntakeError::Invariant(format!("{key} is normal but in urgent queue")));
            }
        }
        for key in self.normal.peek_all() {
            mark(key, "normal queue")?;
            if self.arena[key].urgency != Urgency::Normal {
                return Err(IntakeError::Invariant(format!("{key} is urgent but in normal queue")));
            }
        }
        for event in &self.done {
            mark(event.key, "done")?;
        }

        match seen.iter().position(|&n| n == 0) {
            Some(i) => Err(IntakeError::Invariant(format!("PatientKey({i}) is in no container"))),
            None => Ok(()),
        }
    }
}
