//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `service_events.csv`
//! - `tick_summaries.csv`
//! - `summary.csv` (single row, written at the end of the run)

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, RunSummaryRow, ServiceRow, TickSummaryRow};

/// `HH:MM` rendering of a minute-of-day.
fn clock(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Writes run output to three CSV files.
pub struct CsvWriter {
    services:  Writer<File>,
    summaries: Writer<File>,
    run:       Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut services = Writer::from_path(dir.join("service_events.csv"))?;
        services.write_record([
            "served_at", "clock", "patient_id", "urgency", "arrival", "wait_minutes",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "minute",
            "clock",
            "dispatched_urgent",
            "dispatched_normal",
            "capacity",
            "served",
            "pending",
            "waiting_urgent",
            "waiting_normal",
            "done",
        ])?;

        let mut run = Writer::from_path(dir.join("summary.csv"))?;
        run.write_record([
            "final_minute",
            "total_patients",
            "total_urgent",
            "total_normal",
            "served",
            "average_wait_minutes",
        ])?;

        Ok(Self {
            services,
            summaries,
            run,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_services(&mut self, rows: &[ServiceRow]) -> OutputResult<()> {
        for row in rows {
            self.services.write_record(&[
                row.served_at.to_string(),
                clock(row.served_at),
                row.patient_id.clone(),
                if row.urgent { "urgent" } else { "normal" }.to_string(),
                row.arrival.to_string(),
                row.wait_minutes.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.minute.to_string(),
            clock(row.minute),
            row.dispatched_urgent.to_string(),
            row.dispatched_normal.to_string(),
            row.capacity.to_string(),
            row.served.to_string(),
            row.pending.to_string(),
            row.waiting_urgent.to_string(),
            row.waiting_normal.to_string(),
            row.done.to_string(),
        ])?;
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.run.write_record(&[
            row.final_minute.to_string(),
            row.total_patients.to_string(),
            row.total_urgent.to_string(),
            row.total_normal.to_string(),
            row.served.to_string(),
            format!("{:.3}", row.average_wait_minutes),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.services.flush()?;
        self.summaries.flush()?;
        self.run.flush()?;
        Ok(())
    }
}
