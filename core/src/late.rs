use chrono::{DateTime, FixedOffset};

const SECS_PER_HOUR: i64 = 3600;

/// Whole hours the commit landed after `due`, rounded up.
/// Commits on or before the deadline owe nothing.
pub fn late_hours(due: DateTime<FixedOffset>, commit: DateTime<FixedOffset>) -> u64 {
    let delta = due.timestamp() - commit.timestamp();
    if delta >= 0 {
        return 0;
    }
    let late = delta.unsigned_abs();
    let secs_per_hour = SECS_PER_HOUR as u64;
    late / secs_per_hour + u64::from(late % secs_per_hour != 0)
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::*;

    fn due() -> DateTime<FixedOffset> {
        DateTime::parse_from_str("2023-02-20 23:59:59 -0800", "%Y-%m-%d %H:%M:%S %z").unwrap()
    }

    #[test]
    fn on_time_owes_nothing() {
        assert_eq!(late_hours(due(), due()), 0);
        assert_eq!(late_hours(due(), due() - Duration::days(3)), 0);
        assert_eq!(late_hours(due(), due() - Duration::seconds(1)), 0);
    }

    #[test]
    fn any_fraction_counts_as_a_full_hour() {
        assert_eq!(late_hours(due(), due() + Duration::seconds(1)), 1);
        assert_eq!(late_hours(due(), due() + Duration::seconds(3601)), 2);
        assert_eq!(late_hours(due(), due() + Duration::seconds(7199)), 2);
    }

    #[test]
    fn exact_hours_are_not_rounded_up() {
        assert_eq!(late_hours(due(), due() + Duration::seconds(3600)), 1);
        assert_eq!(late_hours(due(), due() + Duration::hours(48)), 48);
    }

    #[test]
    fn offsets_are_compared_as_instants() {
        // 08:59:59 UTC, exactly one hour after the deadline (07:59:59 UTC).
        let commit =
            DateTime::parse_from_str("2023-02-21 09:59:59 +0100", "%Y-%m-%d %H:%M:%S %z").unwrap();
        assert_eq!(late_hours(due(), commit), 1);
    }
}
