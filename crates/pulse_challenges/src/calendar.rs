//! Week and day arithmetic for the schedulers.
//!
//! Week keys are `{isoYear}-W{week:02}` with Monday-start ISO weeks, so they sort
//! chronologically as plain strings.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// Monday of the week named by `key`, or `None` if the key is malformed.
pub fn parse_week_key(key: &str) -> Option<NaiveDate> {
    let (year, week) = key.split_once("-W")?;
    NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Length of the run of completed entries at the head of `entries`, where each entry
/// must sit exactly `step` after the next one. Entries are `(date, completed)` in any order.
fn run_length(mut entries: Vec<(NaiveDate, bool)>, step: Duration) -> u32 {
    entries.sort_by(|a, b| b.0.cmp(&a.0));

    let mut streak = 0;
    let mut previous: Option<NaiveDate> = None;
    for (date, completed) in entries {
        if !completed {
            break;
        }
        if let Some(prev) = previous {
            if prev - date != step {
                break;
            }
        }
        streak += 1;
        previous = Some(date);
    }
    streak
}

/// Consecutive completed weeks counted from the most recent history entry backwards.
/// Unparseable keys end the streak.
pub fn week_streak<'a>(entries: impl IntoIterator<Item = (&'a str, bool)>) -> u32 {
    let mut parsed = Vec::new();
    for (key, completed) in entries {
        match parse_week_key(key) {
            Some(start) => parsed.push((start, completed)),
            None => return 0,
        }
    }
    run_length(parsed, Duration::days(7))
}

/// Consecutive answered days counted from the most recent archive entry backwards.
pub fn day_streak<'a>(entries: impl IntoIterator<Item = (&'a str, bool)>) -> u32 {
    let mut parsed = Vec::new();
    for (key, completed) in entries {
        match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
            Ok(date) => parsed.push((date, completed)),
            Err(_) => return 0,
        }
    }
    run_length(parsed, Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_key_uses_iso_year() {
        assert_eq!(week_key(d(2024, 3, 4)), "2024-W10");
        // 2024-12-30 is a Monday in ISO week 1 of 2025.
        assert_eq!(week_key(d(2024, 12, 30)), "2025-W01");
        assert_eq!(week_key(d(2021, 1, 3)), "2020-W53");
    }

    #[test]
    fn test_week_bounds() {
        assert_eq!(week_start(d(2024, 3, 7)), d(2024, 3, 4));
        assert_eq!(week_end(d(2024, 3, 7)), d(2024, 3, 10));
        assert_eq!(week_start(d(2024, 3, 4)), d(2024, 3, 4));
        assert_eq!(week_start(d(2024, 3, 10)), d(2024, 3, 4));
    }

    #[test]
    fn test_parse_week_key() {
        assert_eq!(parse_week_key("2024-W10"), Some(d(2024, 3, 4)));
        assert_eq!(parse_week_key("2024-10"), None);
        assert_eq!(parse_week_key("2024-W60"), None);
    }

    #[test]
    fn test_week_streak_stops_at_gap() {
        let history = [
            ("2024-W10", true),
            ("2024-W08", true),
            ("2024-W09", true),
            ("2024-W06", true),
        ];
        assert_eq!(week_streak(history), 3);
    }

    #[test]
    fn test_week_streak_stops_at_incomplete() {
        let history = [("2024-W10", true), ("2024-W09", false), ("2024-W08", true)];
        assert_eq!(week_streak(history), 1);
    }

    #[test]
    fn test_week_streak_bridges_year_boundary() {
        let history = [("2025-W01", true), ("2024-W52", true)];
        assert_eq!(week_streak(history), 2);
    }

    #[test]
    fn test_empty_streaks() {
        assert_eq!(week_streak(Vec::<(&str, bool)>::new()), 0);
        assert_eq!(day_streak(Vec::<(&str, bool)>::new()), 0);
    }

    #[test]
    fn test_day_streak() {
        let archive = [
            ("2024-03-04", true),
            ("2024-03-03", true),
            ("2024-03-01", true),
        ];
        assert_eq!(day_streak(archive), 2);
    }
}
