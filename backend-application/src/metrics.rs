use std::sync::atomic::{AtomicU64, Ordering};

use backend_domain::CycleReport;

#[derive(Debug, Default)]
pub struct Metrics {
    cycles: AtomicU64,
    cycles_failed: AtomicU64,
    cycles_skipped: AtomicU64,
    players_persisted: AtomicU64,
    players_skipped: AtomicU64,
    parse_failures: AtomicU64,
    runs_inserted: AtomicU64,
    server_runs_inserted: AtomicU64,
    chat_inserted: AtomicU64,
    snapshots_taken: AtomicU64,
    persistence_errors: AtomicU64,
}

impl Metrics {
    pub fn record_cycle(&self, report: &CycleReport) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        self.players_persisted
            .fetch_add(report.players_persisted as u64, Ordering::Relaxed);
        self.players_skipped
            .fetch_add(report.players_skipped as u64, Ordering::Relaxed);
        self.parse_failures.fetch_add(
            (report.player_parse_failures + report.run_parse_failures) as u64,
            Ordering::Relaxed,
        );
        self.runs_inserted
            .fetch_add(report.runs_inserted as u64, Ordering::Relaxed);
        self.server_runs_inserted
            .fetch_add(report.server_runs_inserted as u64, Ordering::Relaxed);
        self.chat_inserted
            .fetch_add(report.chat_inserted as u64, Ordering::Relaxed);
        self.snapshots_taken
            .fetch_add(report.snapshots_taken as u64, Ordering::Relaxed);
        self.persistence_errors
            .fetch_add(report.persistence_errors as u64, Ordering::Relaxed);
    }

    pub fn record_cycle_error(&self) {
        self.cycles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cycle_skipped(&self) {
        self.cycles_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("trials_ingest_cycles_total", &self.cycles),
            ("trials_ingest_cycles_failed_total", &self.cycles_failed),
            ("trials_ingest_cycles_skipped_total", &self.cycles_skipped),
            ("trials_players_persisted_total", &self.players_persisted),
            ("trials_players_skipped_total", &self.players_skipped),
            ("trials_parse_failures_total", &self.parse_failures),
            ("trials_runs_inserted_total", &self.runs_inserted),
            ("trials_server_runs_inserted_total", &self.server_runs_inserted),
            ("trials_chat_messages_inserted_total", &self.chat_inserted),
            ("trials_berry_snapshots_total", &self.snapshots_taken),
            ("trials_persistence_errors_total", &self.persistence_errors),
        ];

        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {name} counter\n{name} {}\n",
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_cycle_counters() {
        let metrics = Metrics::default();
        let report = CycleReport {
            players_persisted: 3,
            player_parse_failures: 1,
            run_parse_failures: 2,
            chat_inserted: 5,
            ..CycleReport::default()
        };
        metrics.record_cycle(&report);
        metrics.record_cycle(&report);
        metrics.record_cycle_skipped();

        let rendered = metrics.render_prometheus();
        assert!(rendered.contains("trials_ingest_cycles_total 2\n"));
        assert!(rendered.contains("trials_players_persisted_total 6\n"));
        assert!(rendered.contains("trials_parse_failures_total 6\n"));
        assert!(rendered.contains("trials_chat_messages_inserted_total 10\n"));
        assert!(rendered.contains("trials_ingest_cycles_skipped_total 1\n"));
        assert!(rendered.contains("# TYPE trials_ingest_cycles_failed_total counter\n"));
    }
}
