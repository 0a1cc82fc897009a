use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{
    constants::RANKED_SLOTS,
    structures::{competitor::Competitor, rank_type::RankType}
};

fn by_rating_then_streak(a: &Competitor, b: &Competitor) -> Ordering {
    b.rating.total_cmp(&a.rating).then_with(|| b.streak.cmp(&a.streak))
}

/// Reassigns the division's rank slots.
///
/// Champions are marked [`RankType::Champ`] and hold no slot. Everyone else is
/// ordered by rating, then streak (both descending, stable on ties). The first
/// fifteen become slots 1..=15 and the rest are unranked. Roster order is left
/// untouched.
pub fn recompute_top15(roster: &mut [Competitor]) {
    let mut order: Vec<usize> = (0..roster.len()).filter(|&i| !roster[i].is_champion).collect();
    order.sort_by(|&i, &j| by_rating_then_streak(&roster[i], &roster[j]));

    for (position, &idx) in order.iter().enumerate() {
        let c = &mut roster[idx];
        if position < RANKED_SLOTS {
            c.rank_slot = Some(position as u32 + 1);
            c.rank_type = RankType::Ranked;
        } else {
            c.rank_slot = None;
            c.rank_type = RankType::Unranked;
        }
    }

    for c in roster.iter_mut().filter(|c| c.is_champion) {
        c.rank_slot = None;
        c.rank_type = RankType::Champ;
    }
}

/// Appends every competitor's current rank mark to its rank history.
pub fn append_rank_history(roster: &mut [Competitor], date: NaiveDate) {
    for c in roster.iter_mut() {
        let mark = c.rank_mark();
        c.rank_history.push(date, mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::generate_roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn assert_ranks_valid(roster: &[Competitor]) {
        let non_champs = roster.iter().filter(|c| !c.is_champion).count();
        let slots: Vec<u32> = roster.iter().filter_map(|c| c.rank_slot).collect();
        let unique: HashSet<u32> = slots.iter().copied().collect();

        assert_eq!(slots.len(), non_champs.min(RANKED_SLOTS));
        assert_eq!(unique.len(), slots.len());
        assert_eq!(unique, (1..=slots.len() as u32).collect());

        for c in roster.iter().filter(|c| c.is_champion) {
            assert_eq!(c.rank_slot, None);
            assert_eq!(c.rank_type, RankType::Champ);
        }
    }

    #[test]
    fn test_ranks_are_unique_and_gap_free() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for size in [0, 1, 5, 15, 16, 40] {
            let mut roster = generate_roster("Lightweight", size, &mut rng);
            recompute_top15(&mut roster);
            assert_ranks_valid(&roster);
        }
    }

    #[test]
    fn test_order_by_rating_then_streak() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roster = generate_roster("Welterweight", 4, &mut rng);
        for c in roster.iter_mut() {
            c.is_champion = false;
        }
        roster[0].rating = 1500.0;
        roster[0].streak = 1;
        roster[1].rating = 1600.0;
        roster[2].rating = 1500.0;
        roster[2].streak = 3;
        roster[3].rating = 1400.0;

        recompute_top15(&mut roster);

        let slots: Vec<Option<u32>> = roster.iter().map(|c| c.rank_slot).collect();
        assert_eq!(slots, vec![Some(3), Some(1), Some(2), Some(4)]);
        assert!(roster.iter().all(|c| c.rank_type == RankType::Ranked));
    }

    #[test]
    fn test_champion_never_slotted() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut roster = generate_roster("Bantamweight", 20, &mut rng);
        roster[7].is_champion = true;
        roster[7].rank_slot = Some(1);
        roster[7].rating = 3000.0;

        recompute_top15(&mut roster);

        assert_ranks_valid(&roster);
        assert_eq!(roster.iter().filter(|c| c.rank_type == RankType::Unranked).count(), 20 - 1 - RANKED_SLOTS);
    }

    #[test]
    fn test_rank_history_marks() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut roster = generate_roster("Flyweight", 18, &mut rng);
        let date = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();

        recompute_top15(&mut roster);
        append_rank_history(&mut roster, date);

        for c in &roster {
            let last = c.rank_history.last().unwrap();
            assert_eq!(last.date, date);
            if c.is_champion {
                assert_eq!(last.value, Some(0));
            } else {
                assert_eq!(last.value, c.rank_slot);
            }
        }
    }
}
