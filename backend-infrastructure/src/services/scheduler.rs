use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error};

use backend_application::commands::ingest_commands::run_ingest_cycle;
use backend_application::{AppError, AppState};

/// Starts a cycle every `poll_interval_seconds`, measured between starts.
/// Ticks that fall inside a running cycle are skipped.
pub async fn schedule_ingest(state: AppState) {
    let period = Duration::from_secs(state.config.poll_interval_seconds.max(1));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        match run_ingest_cycle(&state).await {
            Ok(_) => {}
            Err(AppError::CycleInProgress) => debug!("previous cycle still running, tick skipped"),
            Err(err) => error!("ingest cycle failed: {:#}", err),
        }
    }
}
