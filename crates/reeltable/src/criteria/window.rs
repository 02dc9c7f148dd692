//! Creation-time windows.
//!
//! A window's boundary is always computed from the `now` handed in by the
//! caller, so "today" moves as the clock does. Nothing here is cached.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    Today,
    Last7Days,
    Last30Days,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [
        TimeWindow::Today,
        TimeWindow::Last7Days,
        TimeWindow::Last30Days,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::Today => "Today",
            TimeWindow::Last7Days => "Last 7 days",
            TimeWindow::Last30Days => "Last 30 days",
        }
    }

    /// The earliest creation instant that falls inside the window.
    ///
    /// `Today` starts at midnight in `now`'s own time zone; the rolling
    /// windows start exactly 7 or 30 days before `now`.
    pub fn start<Tz: TimeZone>(self, now: &DateTime<Tz>) -> DateTime<Utc> {
        match self {
            TimeWindow::Today => start_of_day(now),
            TimeWindow::Last7Days => now.with_timezone(&Utc) - Duration::days(7),
            TimeWindow::Last30Days => now.with_timezone(&Utc) - Duration::days(30),
        }
    }

    pub fn contains<Tz: TimeZone>(self, created_at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        *created_at >= self.start(now)
    }
}

fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    // Midnight can fall in a DST gap; the first valid instant after it is an hour later
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn today_starts_at_utc_midnight_for_utc_now() {
        let now = at("2024-05-10T15:30:00Z");
        assert_eq!(TimeWindow::Today.start(&now), at("2024-05-10T00:00:00Z"));
    }

    #[test]
    fn today_follows_the_clock_time_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = at("2024-05-10T23:30:00Z").with_timezone(&tz);
        // 01:30 on the 11th locally, so today began at 22:00 UTC on the 10th
        assert_eq!(TimeWindow::Today.start(&now), at("2024-05-10T22:00:00Z"));
    }

    #[test]
    fn rolling_windows_subtract_whole_days() {
        let now = at("2024-05-10T15:30:00Z");
        assert_eq!(
            TimeWindow::Last7Days.start(&now),
            at("2024-05-03T15:30:00Z")
        );
        assert_eq!(
            TimeWindow::Last30Days.start(&now),
            at("2024-04-10T15:30:00Z")
        );
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let now = at("2024-05-10T15:30:00Z");
        assert!(TimeWindow::Last7Days.contains(&at("2024-05-03T15:30:00Z"), &now));
        assert!(!TimeWindow::Last7Days.contains(&at("2024-05-03T15:29:59Z"), &now));
    }

    #[test]
    fn today_depends_on_evaluation_instant() {
        let created = at("2024-05-10T08:00:00Z");
        assert!(TimeWindow::Today.contains(&created, &at("2024-05-10T23:59:59Z")));
        assert!(!TimeWindow::Today.contains(&created, &at("2024-05-11T00:00:01Z")));
    }
}
