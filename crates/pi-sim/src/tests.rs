//! Integration tests for pi-sim.

use pi_core::{Gender, Minute, Patient, PatientId, SimConfig, Urgency, WaitAccounting};
use pi_queue::{PopulationGenerator, RawPatient};

use crate::{NoopObserver, RunState, ServiceEvent, Sim, SimBuilder, SimObserver, TickStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn at(hhmm: &str) -> Minute {
    Minute::parse(hhmm).unwrap()
}

fn pid(n: u64) -> PatientId {
    PatientId::parse(&format!("{n:014}")).unwrap()
}

fn patient(n: u64, urgency: Urgency, arrival: &str) -> Patient {
    Patient::new(pid(n), Gender::Female, at(arrival), urgency)
}

fn test_config() -> SimConfig {
    SimConfig { seed: 42, ..SimConfig::default() }
}

fn sim_with(patients: Vec<Patient>) -> Sim {
    SimBuilder::new(test_config()).patients(patients).build().unwrap()
}

/// Three-patient population from the intake walkthrough.
fn walkthrough() -> Sim {
    sim_with(vec![
        patient(1, Urgency::Urgent, "05:00"),
        patient(2, Urgency::Normal, "05:00"),
        patient(3, Urgency::Urgent, "05:02"),
    ])
}

/// Observer that records every service event and tick stat.
#[derive(Default)]
struct Recorder {
    events:   Vec<ServiceEvent>,
    ticks:    Vec<(Minute, TickStats)>,
    ended:    Option<Minute>,
    statuses: usize,
}

impl SimObserver for Recorder {
    fn on_serve(&mut self, event: &ServiceEvent) {
        self.events.push(*event);
    }
    fn on_tick_end(&mut self, now: Minute, stats: &TickStats) {
        self.ticks.push((now, *stats));
    }
    fn on_status(&mut self, _now: Minute, _status: &crate::StatusSnapshot) {
        self.statuses += 1;
    }
    fn on_sim_end(&mut self, final_minute: Minute, _summary: &crate::SummaryReport) {
        self.ended = Some(final_minute);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn everyone_starts_pending() {
        let sim = walkthrough();
        assert_eq!(sim.pending.len(), 3);
        assert!(sim.urgent.is_empty());
        assert!(sim.normal.is_empty());
        assert!(sim.done.is_empty());
        sim.audit().unwrap();
    }

    #[test]
    fn invalid_config_errors() {
        let config = SimConfig { serve_min: 9, serve_max: 3, ..test_config() };
        assert!(matches!(SimBuilder::new(config).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn raw_records_with_bad_ids_are_dropped() {
        let raw = vec![
            RawPatient {
                id:      "12345".into(),
                gender:  Gender::Male,
                arrival: at("00:00"),
                urgency: Urgency::Urgent,
            },
            RawPatient {
                id:      "29801011234567".into(),
                gender:  Gender::Male,
                arrival: at("00:00"),
                urgency: Urgency::Normal,
            },
        ];
        let mut sim = SimBuilder::new(test_config()).raw_records(raw).build().unwrap();
        assert_eq!(sim.arena.len(), 1);

        sim.run(&mut NoopObserver).unwrap();
        let everywhere: Vec<String> = sim
            .done_ids()
            .into_iter()
            .chain(sim.waiting_urgent())
            .chain(sim.waiting_normal())
            .map(|id| id.to_string())
            .collect();
        assert!(!everywhere.iter().any(|id| id == "12345"));
        assert_eq!(everywhere, vec!["29801011234567".to_string()]);
    }

    #[test]
    fn missing_csv_is_population_error() {
        let result = SimBuilder::new(test_config())
            .population_csv(std::path::Path::new("/no/such/population.csv"))
            .build();
        assert!(matches!(result, Err(SimError::Population(_))));
    }

    #[test]
    fn generated_population_is_pending() {
        let sim = SimBuilder::new(test_config())
            .generated(PopulationGenerator::new(100, 7))
            .build()
            .unwrap();
        assert_eq!(sim.pending.len(), 100);
        sim.audit().unwrap();
    }
}

// ── Dispatcher & server ───────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_serve_tests {
    use super::*;
    use pi_core::IntakeError;
    use crate::SimError;

    #[test]
    fn walkthrough_scenario() {
        let mut sim = walkthrough();

        let out = sim.dispatch_at("05:00").unwrap();
        assert_eq!((out.urgent, out.normal), (1, 1));
        assert_eq!(sim.pending.len(), 1);

        let first = sim.serve(1).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, pid(1));
        assert_eq!(first[0].arrival, at("05:00"));

        let out = sim.dispatch_at("05:02").unwrap();
        assert_eq!((out.urgent, out.normal), (1, 0));

        let next = sim.serve(2).unwrap();
        let ids: Vec<PatientId> = next.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![pid(3), pid(2)]);
        assert_eq!(next[0].urgency, Urgency::Urgent);
        assert_eq!(next[1].urgency, Urgency::Normal);

        // Served at 05:02; the normal patient arrived at 05:00.
        assert_eq!(next[0].wait_minutes, 0);
        assert_eq!(next[1].wait_minutes, 2);
        sim.audit().unwrap();
    }

    #[test]
    fn serve_on_empty_queues_is_not_an_error() {
        let mut sim = sim_with(vec![]);
        assert!(sim.serve(5).unwrap().is_empty());
        assert_eq!(sim.summary_report().average_wait_minutes, 0.0);
    }

    #[test]
    fn serve_zero_does_nothing() {
        let mut sim = walkthrough();
        sim.dispatch(at("05:00")).unwrap();
        assert!(sim.serve(0).unwrap().is_empty());
        assert_eq!(sim.urgent.len() + sim.normal.len(), 2);
    }

    #[test]
    fn serve_respects_max_count() {
        let patients = (0..10).map(|n| patient(n, Urgency::Normal, "01:00")).collect();
        let mut sim = sim_with(patients);
        sim.dispatch(at("01:00")).unwrap();
        assert_eq!(sim.serve(4).unwrap().len(), 4);
        assert_eq!(sim.normal.len(), 6);
    }

    #[test]
    fn urgent_drained_before_normal() {
        let mut patients: Vec<Patient> =
            (0..3).map(|n| patient(n, Urgency::Normal, "01:00")).collect();
        patients.extend((10..13).map(|n| patient(n, Urgency::Urgent, "01:30")));
        let mut sim = sim_with(patients);
        sim.dispatch(at("02:00")).unwrap();

        let served = sim.serve(4).unwrap();
        let classes: Vec<Urgency> = served.iter().map(|e| e.urgency).collect();
        assert_eq!(
            classes,
            vec![Urgency::Urgent, Urgency::Urgent, Urgency::Urgent, Urgency::Normal]
        );
    }

    #[test]
    fn dispatch_moves_exactly_once() {
        let mut sim = walkthrough();
        sim.dispatch(at("05:00")).unwrap();
        let again = sim.dispatch(at("05:00")).unwrap();
        assert_eq!(again.total(), 0);
        assert_eq!(sim.totals.urgent, 1);
        assert_eq!(sim.totals.normal, 1);
        sim.audit().unwrap();
    }

    #[test]
    fn invalid_time_leaves_state_unchanged() {
        let mut sim = walkthrough();
        for bad in ["24:00", "5:0", "noon"] {
            let err = sim.dispatch_at(bad).unwrap_err();
            assert!(matches!(err, SimError::Intake(IntakeError::InvalidTimeValue(_))));
        }
        assert_eq!(sim.pending.len(), 3);
        assert_eq!(sim.now(), Minute::MIDNIGHT);
        assert_eq!(sim.summary_report().total_patients, 0);
    }

    #[test]
    fn dispatch_ahead_of_clock_moves_the_clock() {
        let mut sim = walkthrough();
        assert_eq!(sim.now(), Minute::MIDNIGHT);

        sim.dispatch(at("05:02")).unwrap();
        assert_eq!(sim.now(), at("05:02"));

        let served = sim.serve(3).unwrap();
        assert_eq!(served.len(), 3);
        assert!(served.iter().all(|e| e.served_at == at("05:02")));
        assert_eq!(served[2].wait_minutes, 2);

        // An earlier minute does not wind the clock back.
        sim.dispatch(at("04:00")).unwrap();
        assert_eq!(sim.now(), at("05:02"));
        sim.audit().unwrap();
    }

    #[test]
    fn dispatch_and_serve_after_stop_do_nothing() {
        let mut sim = walkthrough();
        sim.dispatch(at("05:00")).unwrap();
        sim.stop();

        let out = sim.dispatch(at("05:02")).unwrap();
        assert_eq!(out.total(), 0);
        assert_eq!(sim.now(), at("05:00"));
        assert_eq!(sim.pending.len(), 1);

        assert!(sim.serve(10).unwrap().is_empty());
        assert_eq!(sim.urgent.len() + sim.normal.len(), 2);
        assert!(sim.done.is_empty());
        sim.audit().unwrap();
    }

    #[test]
    fn duplicate_ids_are_distinct_entries() {
        let mut sim = sim_with(vec![
            patient(5, Urgency::Normal, "03:00"),
            patient(5, Urgency::Normal, "03:00"),
        ]);
        sim.dispatch(at("03:00")).unwrap();
        let served = sim.serve(10).unwrap();
        assert_eq!(served.len(), 2);
        assert_ne!(served[0].key, served[1].key);
        assert_eq!(sim.done_ids(), vec![pid(5), pid(5)]);
        sim.audit().unwrap();
    }

    #[test]
    fn frozen_accounting_reports_zero_waits() {
        let config = SimConfig { wait_accounting: WaitAccounting::Frozen, ..test_config() };
        let mut sim = SimBuilder::new(config)
            .patients(vec![patient(1, Urgency::Normal, "00:00")])
            .build()
            .unwrap();
        sim.dispatch(at("00:00")).unwrap();
        sim.dispatch(at("03:00")).unwrap();
        let served = sim.serve(1).unwrap();
        assert_eq!(served[0].wait_minutes, 0);
        assert_eq!(sim.average_wait_minutes(), 0.0);
    }

    #[test]
    fn average_wait_is_mean_of_frozen_waits() {
        let mut sim = sim_with(vec![
            patient(1, Urgency::Normal, "00:00"),
            patient(2, Urgency::Normal, "00:04"),
        ]);
        sim.dispatch(at("00:04")).unwrap();
        sim.dispatch(at("00:10")).unwrap();
        // Waits: 10 and 6.
        sim.serve(2).unwrap();
        assert_eq!(sim.average_wait_minutes(), 8.0);
        assert_eq!(sim.summary_report().served, 2);
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod report_tests {
    use super::*;

    #[test]
    fn snapshot_orders_and_does_not_mutate() {
        let mut sim = sim_with(vec![
            patient(1, Urgency::Urgent, "06:10"),
            patient(2, Urgency::Urgent, "06:00"),
            patient(3, Urgency::Normal, "06:05"),
            patient(4, Urgency::Normal, "06:01"),
        ]);
        sim.dispatch(at("06:30")).unwrap();

        let status = sim.status_snapshot();
        assert_eq!(status.waiting_urgent, vec![pid(2), pid(1)]);
        // Released in arrival order, so 06:01 was pushed before 06:05.
        assert_eq!(status.waiting_normal, vec![pid(4), pid(3)]);
        assert!(status.done.is_empty());
        assert_eq!(sim.status_snapshot(), status);
    }

    #[test]
    fn summary_counts_dispatched_patients() {
        let mut sim = walkthrough();
        sim.dispatch(at("05:02")).unwrap();
        sim.serve(1).unwrap();
        let summary = sim.summary_report();
        assert_eq!(summary.total_patients, 3);
        assert_eq!(summary.total_urgent, 2);
        assert_eq!(summary.total_normal, 1);
        assert_eq!(summary.served, 1);
    }

    #[test]
    fn display_matches_console_layout() {
        let mut sim = walkthrough();
        sim.dispatch(at("05:00")).unwrap();
        let served = sim.serve(1).unwrap();
        assert_eq!(
            served[0].to_string(),
            "Serving Patient ID: 00000000000001, Type: Urgent, Wait Time: 0 minutes."
        );
        let text = sim.status_snapshot().to_string();
        assert!(text.contains("Waiting Normal Patients:\n00000000000002 \n"));
        assert!(sim.summary_report().to_string().contains("Total Patients: 2"));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;
    use pi_core::IntakeError;
    use crate::SimError;

    #[test]
    fn run_halts_after_last_minute() {
        let mut sim = walkthrough();
        let mut rec = Recorder::default();
        let summary = sim.run(&mut rec).unwrap();

        assert!(sim.is_halted());
        assert_eq!(rec.ticks.len(), 1440);
        assert_eq!(rec.ended, Some(Minute::LAST));
        assert_eq!(summary.served, 3);
        assert_eq!(rec.statuses, 1440);
    }

    #[test]
    fn stop_halts_at_tick_boundary() {
        let mut sim = walkthrough();
        sim.run_ticks(10, &mut NoopObserver).unwrap();
        assert_eq!(sim.now(), at("00:10"));
        sim.stop();
        assert_eq!(sim.step(&mut NoopObserver).unwrap(), RunState::Halted);
        assert_eq!(sim.now(), at("00:10"));
        assert_eq!(sim.advance_time(), RunState::Halted);
    }

    #[test]
    fn short_window_config() {
        let config = SimConfig { start: at("05:00"), end: at("05:05"), ..test_config() };
        let mut sim = SimBuilder::new(config)
            .patients(vec![patient(1, Urgency::Normal, "05:03")])
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.ticks.len(), 6);
        assert_eq!(rec.events.len(), 1);
        assert_eq!(rec.events[0].served_at, at("05:03"));
    }

    #[test]
    fn dispatch_past_end_is_rejected() {
        let config = SimConfig { start: at("05:00"), end: at("05:05"), ..test_config() };
        let mut sim = SimBuilder::new(config)
            .patients(vec![patient(1, Urgency::Normal, "05:03")])
            .build()
            .unwrap();

        let err = sim.dispatch(at("10:00")).unwrap_err();
        assert!(matches!(err, SimError::Intake(IntakeError::InvalidTimeValue(_))));
        assert_eq!(sim.now(), at("05:00"));
        assert_eq!(sim.pending.len(), 1);

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(sim.now() <= sim.clock.end);
        assert_eq!(rec.ticks.len(), 6);
        assert_eq!(rec.ticks.last().map(|(m, _)| *m), Some(at("05:05")));
        assert_eq!(rec.events[0].served_at, at("05:03"));
        assert_eq!(rec.events[0].wait_minutes, 0);
    }

    #[test]
    fn dispatch_to_last_minute_then_step_halts() {
        let config = SimConfig { start: at("05:00"), end: at("05:05"), ..test_config() };
        let mut sim = SimBuilder::new(config)
            .patients(vec![patient(1, Urgency::Urgent, "05:03")])
            .build()
            .unwrap();

        sim.dispatch(at("05:05")).unwrap();
        let mut rec = Recorder::default();
        assert_eq!(sim.step(&mut rec).unwrap(), RunState::Halted);
        assert_eq!(sim.now(), at("05:05"));
        assert_eq!(rec.events.len(), 1);
        assert_eq!(rec.events[0].served_at, at("05:05"));
        assert_eq!(rec.events[0].wait_minutes, 2);
    }

    #[test]
    fn status_interval_gates_only_snapshots() {
        let config = SimConfig { output_interval_ticks: 60, ..test_config() };
        let mut sim = SimBuilder::new(config)
            .patients(vec![patient(1, Urgency::Normal, "05:03")])
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.ticks.len(), 1440);
        assert_eq!(rec.statuses, 24);
    }

    #[test]
    fn same_seed_same_run() {
        let run = |seed: u64| {
            let config = SimConfig { seed, ..test_config() };
            let mut sim = SimBuilder::new(config)
                .generated(PopulationGenerator::new(500, seed))
                .build()
                .unwrap();
            let mut rec = Recorder::default();
            sim.run(&mut rec).unwrap();
            rec.events
        };
        assert_eq!(run(11), run(11));
    }

    /// Every testable property over a whole generated day, checked per tick.
    #[test]
    fn full_day_properties() {
        let config = SimConfig { serve_min: 0, serve_max: 3, ..test_config() };
        let mut sim = SimBuilder::new(config)
            .generated(PopulationGenerator::new(700, 2024))
            .build()
            .unwrap();
        let population = sim.arena.len();

        let mut last_urgent_arrival = Minute::MIDNIGHT;
        let mut normal_pop_order = Vec::new();

        while !sim.is_halted() {
            let now = sim.now();
            let mut rec = Recorder::default();
            sim.step(&mut rec).unwrap();
            sim.audit().unwrap();

            // Nothing left pending has arrived.
            assert!(sim.pending.keys().all(|k| sim.arena[k].arrival > now));

            let (_, stats) = rec.ticks[0];
            assert!(stats.served <= stats.capacity);
            if stats.served < stats.capacity {
                assert!(sim.urgent.is_empty() && sim.normal.is_empty());
            }

            // Urgent first within the tick; normal only once urgent is empty.
            let first_normal = rec.events.iter().position(|e| e.urgency == Urgency::Normal);
            if let Some(i) = first_normal {
                assert!(rec.events[i..].iter().all(|e| e.urgency == Urgency::Normal));
                assert!(sim.urgent.is_empty());
            }

            for e in &rec.events {
                assert_eq!(e.served_at, now);
                assert_eq!(e.wait_minutes, now.since(e.arrival));
                match e.urgency {
                    Urgency::Urgent => {
                        assert!(e.arrival >= last_urgent_arrival);
                        last_urgent_arrival = e.arrival;
                    }
                    Urgency::Normal => normal_pop_order.push(e.key),
                }
            }
        }

        // Dispatch runs every minute, so normal patients were pushed in
        // (arrival, population) order; FIFO pops must follow it.
        let mut normal_push_order: Vec<_> = sim
            .arena
            .iter()
            .filter(|(_, p)| p.urgency == Urgency::Normal)
            .map(|(k, p)| (p.arrival, k))
            .collect();
        normal_push_order.sort();
        let normal_push_order: Vec<_> = normal_push_order.into_iter().map(|(_, k)| k).collect();
        assert_eq!(normal_pop_order[..], normal_push_order[..normal_pop_order.len()]);
        let summary = sim.summary_report();
        assert_eq!(summary.total_patients, population);
        assert_eq!(summary.served + sim.urgent.len() + sim.normal.len(), population);
    }
}
