// Snapshot throttling

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A snapshot stamped later than `now` counts as fresh.
pub fn snapshot_due(latest_occurred: Option<i64>, now: i64, interval_hours: f64) -> bool {
    match latest_occurred {
        None => true,
        Some(latest) => {
            let elapsed_hours = (now - latest) as f64 / MILLIS_PER_HOUR;
            elapsed_hours >= interval_hours
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    #[test]
    fn first_snapshot_is_always_due() {
        assert!(snapshot_due(None, 0, 4.0));
    }

    #[test]
    fn respects_interval_boundary() {
        let now = 100 * HOUR;
        assert!(!snapshot_due(Some(now - 3 * HOUR), now, 4.0));
        assert!(snapshot_due(Some(now - 4 * HOUR), now, 4.0));
        assert!(snapshot_due(Some(now - 5 * HOUR), now, 4.0));
    }

    #[test]
    fn fractional_intervals() {
        let now = 10 * HOUR;
        assert!(snapshot_due(Some(now - HOUR / 2), now, 0.5));
        assert!(!snapshot_due(Some(now - HOUR / 4), now, 0.5));
    }

    #[test]
    fn future_snapshot_is_not_due() {
        assert!(!snapshot_due(Some(20 * HOUR), 10 * HOUR, 4.0));
    }
}
