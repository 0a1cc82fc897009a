use chrono::{Datelike, Duration, NaiveDate, Weekday};
use itertools::Itertools;
use rand::Rng;

use crate::config::PlanConfig;

/// Events per month are drawn from {1: 1, 2: 3, 3: 1}.
const MONTHLY_EVENT_COUNTS: [usize; 5] = [1, 2, 2, 2, 3];

/// Smallest date on or after `date` that falls on `weekday`
pub fn next_weekly_date(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let delta = (weekday.num_days_from_monday() as i64 - date.weekday().num_days_from_monday() as i64 + 7) % 7;

    date + Duration::days(delta)
}

pub fn main_announce_date(event_date: NaiveDate, cfg: &PlanConfig) -> NaiveDate {
    event_date - Duration::days(7 * cfg.main_announce_weeks)
}

pub fn full_generate_date(event_date: NaiveDate, cfg: &PlanConfig) -> NaiveDate {
    event_date - Duration::days(7 * cfg.full_generate_weeks)
}

/// The `horizon_weeks` consecutive weekly dates starting at the first event day on or after `start`
pub fn weekly_dates(start: NaiveDate, horizon_weeks: usize, weekday: Weekday) -> Vec<NaiveDate> {
    let first = next_weekly_date(start, weekday);

    (0..horizon_weeks as i64).map(|w| first + Duration::weeks(w)).collect()
}

/// Picks event dates inside the horizon.
///
/// Weekly dates are bucketed by (year, month) in calendar order. Each bucket
/// draws a target count, capped at the bucket size, and then removes that many
/// dates uniformly without replacement. Picks are returned ascending.
pub fn event_dates_in_horizon<R: Rng + ?Sized>(
    start: NaiveDate,
    horizon_weeks: usize,
    weekday: Weekday,
    rng: &mut R
) -> Vec<NaiveDate> {
    let dates = weekly_dates(start, horizon_weeks, weekday);
    let mut picks = Vec::new();

    for (_, bucket) in &dates.into_iter().chunk_by(|d| (d.year(), d.month())) {
        let mut days: Vec<NaiveDate> = bucket.collect();
        if days.is_empty() {
            continue;
        }

        let count = MONTHLY_EVENT_COUNTS[rng.random_range(0..MONTHLY_EVENT_COUNTS.len())].min(days.len());
        for _ in 0..count {
            let idx = rng.random_range(0..days.len());
            picks.push(days.remove(idx));
        }
    }

    picks.sort();
    picks
}

/// Last weekly date inside the horizon whose calendar month is fully visible.
///
/// Planning stops at month boundaries so a month is bucketed exactly once;
/// returns `None` when no month closes inside the horizon.
pub fn last_complete_month_date(start: NaiveDate, horizon_weeks: usize, weekday: Weekday) -> Option<NaiveDate> {
    let dates = weekly_dates(start, horizon_weeks, weekday);

    dates
        .into_iter()
        .rev()
        .find(|d| (*d + Duration::weeks(1)).month() != d.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_weekly_date() {
        // 2026-01-01 is a Thursday
        assert_eq!(next_weekly_date(date(2026, 1, 1), Weekday::Sat), date(2026, 1, 3));
        assert_eq!(next_weekly_date(date(2026, 1, 3), Weekday::Sat), date(2026, 1, 3));
        assert_eq!(next_weekly_date(date(2026, 1, 4), Weekday::Sat), date(2026, 1, 10));
        assert_eq!(next_weekly_date(date(2026, 1, 4), Weekday::Sun), date(2026, 1, 4));
    }

    #[test]
    fn test_announce_dates() {
        let cfg = PlanConfig::default();
        let event = date(2026, 3, 7);

        assert_eq!(main_announce_date(event, &cfg), date(2026, 1, 10));
        assert_eq!(full_generate_date(event, &cfg), date(2026, 2, 7));
    }

    #[test]
    fn test_month_bucket_limits() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for seed_day in 1..60 {
            let start = date(2026, 1, 1) + Duration::days(seed_day);
            let weekly = weekly_dates(start, 12, Weekday::Sat);
            let picks = event_dates_in_horizon(start, 12, Weekday::Sat, &mut rng);

            let mut available: HashMap<(i32, u32), usize> = HashMap::new();
            for d in &weekly {
                *available.entry((d.year(), d.month())).or_default() += 1;
            }

            let mut picked: HashMap<(i32, u32), usize> = HashMap::new();
            for d in &picks {
                assert!(weekly.contains(d));
                *picked.entry((d.year(), d.month())).or_default() += 1;
            }

            for (month, count) in &available {
                let n = picked.get(month).copied().unwrap_or(0);
                assert!(n >= 1, "month {:?} got no events", month);
                assert!(n <= *count);
                assert!(n <= 3);
            }
        }
    }

    #[test]
    fn test_picks_sorted_and_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let picks = event_dates_in_horizon(date(2026, 1, 1), 26, Weekday::Sat, &mut rng);

        assert!(picks.windows(2).all(|w| w[0] < w[1]));
        assert!(picks.iter().all(|d| d.weekday() == Weekday::Sat));
    }

    #[test]
    fn test_same_seed_same_calendar() {
        let a = event_dates_in_horizon(date(2026, 5, 1), 12, Weekday::Sat, &mut ChaCha8Rng::seed_from_u64(11));
        let b = event_dates_in_horizon(date(2026, 5, 1), 12, Weekday::Sat, &mut ChaCha8Rng::seed_from_u64(11));

        assert_eq!(a, b);
    }

    #[test]
    fn test_last_complete_month_date() {
        // Saturdays from 2026-01-03 for 12 weeks end on 2026-03-21; March is not closed.
        assert_eq!(
            last_complete_month_date(date(2026, 1, 1), 12, Weekday::Sat),
            Some(date(2026, 2, 28))
        );
        // Horizon ending on the last Saturday of March closes March.
        assert_eq!(
            last_complete_month_date(date(2026, 1, 1), 13, Weekday::Sat),
            Some(date(2026, 3, 28))
        );
        assert_eq!(last_complete_month_date(date(2026, 1, 1), 2, Weekday::Sat), None);
    }
}
