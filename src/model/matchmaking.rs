use std::collections::HashSet;

use chrono::NaiveDate;

use crate::model::{
    constants::{
        ELITE_PAIR_BONUS, ELITE_RANK, PAIR_SCORE_BASE, RANK_PROXIMITY_BASE, RANK_PROXIMITY_STEP, REMATCH_COOLDOWN_DAYS,
        REMATCH_REJECTED, STREAK_WEIGHT
    },
    rating_utils::clamp_streak,
    structures::{
        competitor::{Competitor, CompetitorId},
        pair_history::PairHistory
    }
};

/// True if the pair last fought fewer than `cooldown_days` before `event_date`
pub fn in_rematch_cooldown(last_fought: Option<NaiveDate>, event_date: NaiveDate, cooldown_days: i64) -> bool {
    last_fought.is_some_and(|last| (event_date - last).num_days() < cooldown_days)
}

/// Desirability of booking `a` against `b`. Higher is better.
///
/// Returns [`REMATCH_REJECTED`] when the pair is still inside its rematch
/// cooldown. Otherwise rewards rating proximity, rank proximity (when both
/// are ranked, with a bonus for two top-5 contenders) and hot streaks.
/// Title fights score double.
pub fn score_pair_with_cooldown(
    a: &Competitor,
    b: &Competitor,
    is_title: bool,
    last_fought: Option<NaiveDate>,
    event_date: NaiveDate,
    cooldown_days: i64
) -> f64 {
    if in_rematch_cooldown(last_fought, event_date, cooldown_days) {
        return REMATCH_REJECTED;
    }

    let mut score = PAIR_SCORE_BASE - (a.rating - b.rating).abs();

    if let (Some(rank_a), Some(rank_b)) = (a.rank_slot, b.rank_slot) {
        score += RANK_PROXIMITY_BASE - RANK_PROXIMITY_STEP * (rank_a as f64 - rank_b as f64).abs();
        if rank_a <= ELITE_RANK && rank_b <= ELITE_RANK {
            score += ELITE_PAIR_BONUS;
        }
    }

    score += STREAK_WEIGHT * clamp_streak(a.streak) as f64;
    score += STREAK_WEIGHT * clamp_streak(b.streak) as f64;

    if is_title {
        score *= 2.0;
    }

    score
}

/// [`score_pair_with_cooldown`] with the default 210-day cooldown
pub fn score_pair(
    a: &Competitor,
    b: &Competitor,
    is_title: bool,
    last_fought: Option<NaiveDate>,
    event_date: NaiveDate
) -> f64 {
    score_pair_with_cooldown(a, b, is_title, last_fought, event_date, REMATCH_COOLDOWN_DAYS)
}

/// Best opponent for `a` among `candidates`.
///
/// Skips `a` itself, anyone in `used_ids` and anyone still inside the rematch
/// cooldown with `a`. The first candidate seen wins ties. `None` means no
/// eligible opponent, which callers treat as an unfilled slot.
pub fn pick_best_opponent<'c, I>(
    a: &Competitor,
    candidates: I,
    used_ids: &HashSet<CompetitorId>,
    pairs: &PairHistory,
    event_date: NaiveDate,
    is_title: bool
) -> Option<&'c Competitor>
where
    I: IntoIterator<Item = &'c Competitor>
{
    let mut best: Option<(&Competitor, f64)> = None;

    for b in candidates {
        if b.id == a.id || used_ids.contains(&b.id) {
            continue;
        }

        let score = score_pair(a, b, is_title, pairs.last_fought(a.id, b.id), event_date);
        if score <= REMATCH_REJECTED {
            continue;
        }

        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((b, score))
        }
    }

    best.map(|(b, _)| b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::generate_competitor;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cooldown_rejects_iff_recent() {
        let a = generate_competitor(1, 1500.0, None);
        let b = generate_competitor(2, 1500.0, None);
        let event = date(2026, 6, 6);

        for days_ago in [0, 1, 100, 209, 210, 211, 400] {
            let last = Some(event - Duration::days(days_ago));
            let score = score_pair(&a, &b, false, last, event);

            if days_ago < REMATCH_COOLDOWN_DAYS {
                assert_eq!(score, REMATCH_REJECTED, "{} days ago should be rejected", days_ago);
            } else {
                assert!(score > REMATCH_REJECTED, "{} days ago should be allowed", days_ago);
            }
        }

        assert!(score_pair(&a, &b, false, None, event) > REMATCH_REJECTED);
    }

    #[test]
    fn test_score_components() {
        let event = date(2026, 6, 6);
        let mut a = generate_competitor(1, 1600.0, Some(2));
        let mut b = generate_competitor(2, 1550.0, Some(4));
        a.streak = 2;
        b.streak = 9;

        // 1000 - 50 + (120 - 40) + 40 + 20 + 50
        assert_eq!(score_pair(&a, &b, false, None, event), 1140.0);
        assert_eq!(score_pair(&a, &b, true, None, event), 2280.0);

        b.rank_slot = None;
        // 1000 - 50 + 20 + 50
        assert_eq!(score_pair(&a, &b, false, None, event), 1020.0);
    }

    #[test]
    fn test_pick_excludes_self_and_used() {
        let event = date(2026, 6, 6);
        let a = generate_competitor(1, 1500.0, None);
        let candidates = vec![
            a.clone(),
            generate_competitor(2, 1500.0, None),
            generate_competitor(3, 1490.0, None),
        ];
        let used: HashSet<CompetitorId> = [2].into_iter().collect();

        let best = pick_best_opponent(&a, &candidates, &used, &PairHistory::new(), event, false).unwrap();
        assert_eq!(best.id, 3);

        let used: HashSet<CompetitorId> = [2, 3].into_iter().collect();
        assert!(pick_best_opponent(&a, &candidates, &used, &PairHistory::new(), event, false).is_none());
    }

    #[test]
    fn test_pick_first_seen_wins_ties() {
        let event = date(2026, 6, 6);
        let a = generate_competitor(1, 1500.0, None);
        let candidates = vec![
            generate_competitor(5, 1520.0, None),
            generate_competitor(4, 1480.0, None),
        ];

        let best = pick_best_opponent(&a, &candidates, &HashSet::new(), &PairHistory::new(), event, false).unwrap();
        assert_eq!(best.id, 5);
    }

    #[test]
    fn test_pick_skips_cooldown_pairs() {
        let event = date(2026, 6, 6);
        let a = generate_competitor(1, 1500.0, None);
        let candidates = vec![
            generate_competitor(2, 1500.0, None),
            generate_competitor(3, 1300.0, None),
        ];
        let mut pairs = PairHistory::new();
        pairs.record(1, 2, event - Duration::days(30));

        let best = pick_best_opponent(&a, &candidates, &HashSet::new(), &pairs, event, false).unwrap();
        assert_eq!(best.id, 3);

        pairs.record(1, 3, event - Duration::days(30));
        assert!(pick_best_opponent(&a, &candidates, &HashSet::new(), &pairs, event, false).is_none());
    }
}
