/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds in one day
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Add whole calendar months to a millisecond timestamp (UTC).
///
/// Day-of-month is clamped to the target month's length, so Jan 31 + 1 month
/// lands on the last day of February.
pub fn add_months_millis(ts: i64, months: u32) -> i64 {
    use chrono::{DateTime, Months};

    DateTime::from_timestamp_millis(ts)
        .and_then(|dt| dt.checked_add_months(Months::new(months)))
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(ts + i64::from(months) * 30 * DAY_MILLIS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn add_months_clamps_day() {
        let jan31 = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
        let feb = add_months_millis(jan31.timestamp_millis(), 1);
        let expected = Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap();
        assert_eq!(feb, expected.timestamp_millis());
    }

    #[test]
    fn add_months_across_year() {
        let nov = Utc.with_ymd_and_hms(2025, 11, 15, 0, 0, 0).unwrap();
        let next = add_months_millis(nov.timestamp_millis(), 3);
        let expected = Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap();
        assert_eq!(next, expected.timestamp_millis());
    }
}
