#[cfg(test)]
mod tests {
    use crate::calendar::{parse_week_key, week_end, week_key, week_start, week_streak};
    use chrono::{Datelike, Duration, NaiveDate, Weekday};
    use proptest::prelude::*;

    // Any day between 2000 and roughly 2054
    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..20_000).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
        })
    }

    proptest! {
        #[test]
        fn test_week_start_is_monday_within_six_days(date in any_date()) {
            let start = week_start(date);
            prop_assert_eq!(start.weekday(), Weekday::Mon);
            prop_assert!(start <= date);
            prop_assert!(date - start < Duration::days(7));
            prop_assert_eq!(week_end(date) - start, Duration::days(6));
        }

        #[test]
        fn test_week_key_round_trips_to_week_start(date in any_date()) {
            let key = week_key(date);
            prop_assert_eq!(parse_week_key(&key), Some(week_start(date)));
        }

        #[test]
        fn test_week_keys_sort_chronologically(a in any_date(), b in any_date()) {
            if week_start(a) < week_start(b) {
                prop_assert!(week_key(a) < week_key(b));
            }
        }

        #[test]
        fn test_consecutive_completed_weeks_form_full_streak(
            start in any_date(),
            weeks in 1usize..30,
        ) {
            let keys: Vec<String> = (0..weeks)
                .map(|i| week_key(start + Duration::days(7 * i as i64)))
                .collect();
            let streak = week_streak(keys.iter().map(|k| (k.as_str(), true)));
            prop_assert_eq!(streak as usize, weeks);
        }

        #[test]
        fn test_streak_never_exceeds_history_length(
            start in any_date(),
            gaps in proptest::collection::vec((1i64..4, any::<bool>()), 0..20),
        ) {
            let mut date = start;
            let mut keys = Vec::new();
            for (gap, completed) in &gaps {
                date += Duration::days(7 * gap);
                keys.push((week_key(date), *completed));
            }
            let streak = week_streak(keys.iter().map(|(k, c)| (k.as_str(), *c)));
            prop_assert!(streak as usize <= keys.len());
        }
    }
}
