//! Simulation observer trait for progress reporting and data collection.

use pi_core::Minute;

use crate::{DispatchOutcome, ServiceEvent, StatusSnapshot, SummaryReport, TickStats};

/// Callbacks invoked by [`Sim::step`][crate::Sim::step] and
/// [`Sim::run`][crate::Sim::run] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — console printer
///
/// ```rust,ignore
/// struct Console;
///
/// impl SimObserver for Console {
///     fn on_serve(&mut self, event: &ServiceEvent) {
///         println!("{event}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before dispatch.
    fn on_tick_start(&mut self, _now: Minute) {}

    /// Called after the dispatcher has moved this tick's arrivals.
    fn on_dispatch(&mut self, _now: Minute, _outcome: DispatchOutcome) {}

    /// Called once per served patient, in service order.
    fn on_serve(&mut self, _event: &ServiceEvent) {}

    /// Called at the end of each tick, after service.
    fn on_tick_end(&mut self, _now: Minute, _stats: &TickStats) {}

    /// Called at status intervals (every `config.output_interval_ticks`
    /// ticks) with the full ordered queue contents.
    fn on_status(&mut self, _now: Minute, _status: &StatusSnapshot) {}

    /// Called once when the run halts.
    fn on_sim_end(&mut self, _final_minute: Minute, _summary: &SummaryReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards every callback to both observers, `A` first.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_tick_start(&mut self, now: Minute) {
        self.0.on_tick_start(now);
        self.1.on_tick_start(now);
    }

    fn on_dispatch(&mut self, now: Minute, outcome: DispatchOutcome) {
        self.0.on_dispatch(now, outcome);
        self.1.on_dispatch(now, outcome);
    }

    fn on_serve(&mut self, event: &ServiceEvent) {
        self.0.on_serve(event);
        self.1.on_serve(event);
    }

    fn on_tick_end(&mut self, now: Minute, stats: &TickStats) {
        self.0.on_tick_end(now, stats);
        self.1.on_tick_end(now, stats);
    }

    fn on_status(&mut self, now: Minute, status: &StatusSnapshot) {
        self.0.on_status(now, status);
        self.1.on_status(now, status);
    }

    fn on_sim_end(&mut self, final_minute: Minute, summary: &SummaryReport) {
        self.0.on_sim_end(final_minute, summary);
        self.1.on_sim_end(final_minute, summary);
    }
}
