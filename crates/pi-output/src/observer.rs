//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pi_core::Minute;
use pi_sim::{ServiceEvent, SimObserver, SummaryReport, TickStats};

use crate::row::{RunSummaryRow, ServiceRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes service events, tick summaries, and the run
/// summary to any [`OutputWriter`] backend.
///
/// Service events are buffered for the duration of a tick and written as one
/// batch at tick end.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<ServiceRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_serve(&mut self, event: &ServiceEvent) {
        self.pending.push(ServiceRow::from(event));
    }

    fn on_tick_end(&mut self, now: Minute, stats: &TickStats) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_services(&rows);
            self.store_err(result);
        }
        let result = self.writer.write_tick_summary(&TickSummaryRow::new(now.get(), stats));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, final_minute: Minute, summary: &SummaryReport) {
        let result = self
            .writer
            .write_run_summary(&RunSummaryRow::new(final_minute.get(), summary));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
