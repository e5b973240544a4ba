// Run time display

/// `S.cc` up to a minute, `M:SS.cc` above. Hundredths are truncated.
pub fn format_run_time(millis: i64) -> String {
    let millis = millis.max(0);
    if millis <= 60_000 {
        let hundredths = millis / 10;
        return format!("{}.{:02}", hundredths / 100, hundredths % 100);
    }
    let minutes = millis / 60_000;
    let hundredths = (millis % 60_000) / 10;
    format!("{}:{:02}.{:02}", minutes, hundredths / 100, hundredths % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_runs_truncate_to_hundredths() {
        assert_eq!(format_run_time(14_238), "14.23");
        assert_eq!(format_run_time(5_009), "5.00");
        assert_eq!(format_run_time(60_000), "60.00");
        assert_eq!(format_run_time(0), "0.00");
    }

    #[test]
    fn long_runs_show_minutes() {
        assert_eq!(format_run_time(83_456), "1:23.45");
        assert_eq!(format_run_time(61_500), "1:01.50");
        assert_eq!(format_run_time(125_000), "2:05.00");
        assert_eq!(format_run_time(119_999), "1:59.99");
        assert_eq!(format_run_time(60_001), "1:00.00");
    }
}
