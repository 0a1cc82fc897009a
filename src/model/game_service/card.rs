use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use indexmap::IndexMap;
use rand::Rng;
use tracing::{debug, info};

use super::{append_fight, available_pool, booked_elsewhere, GameService};
use crate::{
    error::LeagueError,
    model::{
        constants::{
            MAX_CARD_SIZE, MIN_CARD_SIZE, RANK_GAP_WINDOW, RATING_GAP_WINDOW, SPECIAL_BOOKING_CHANCE,
            SPECIAL_BOOKING_STREAK, TOP_TIER_BOUT_LIMIT
        },
        matchmaking::pick_best_opponent,
        news,
        structures::{
            card_slot::CardSlot,
            competitor::{Competitor, CompetitorId},
            event::EventId,
            event_kind::EventKind,
            fight::Fight,
            league_state::LeagueState,
            pair_history::{pair_key, PairHistory, PairKey}
        }
    }
};

const MAIN_CARD_RANGE: std::ops::RangeInclusive<usize> = 6..=7;
const PRELIM_RANGE: std::ops::RangeInclusive<usize> = 8..=12;
const FALLBACK_PLAN: (usize, usize) = (6, 9);
const SEEDED_DIVISIONS: usize = 3;
const SEEDED_MIN_FIGHTS: usize = 2;
const DIVISION_CAP_MIN: usize = 4;
const DIVISION_CAP_MAX: usize = 6;

/// Booking constraints shared by every pairing inside one division
struct DivisionBook<'a> {
    event_id: EventId,
    event_date: NaiveDate,
    division: &'a str,
    booked_pairs: HashSet<PairKey>,
    event_pairs: HashSet<PairKey>,
    used: HashSet<CompetitorId>,
    pairs: PairHistory
}

impl DivisionBook<'_> {
    /// Pair not yet booked on another event nor on this card
    fn is_open(&self, a: CompetitorId, b: CompetitorId) -> bool {
        let key = pair_key(a, b);
        !self.booked_pairs.contains(&key) && !self.event_pairs.contains(&key)
    }

    /// Best opponent for `a` from `pool`, preferring those inside `window`.
    fn pick<'p>(
        &self,
        a: &Competitor,
        pool: &'p [Competitor],
        window: impl Fn(&Competitor) -> bool,
        cap_top_tier: bool
    ) -> Option<&'p Competitor> {
        let mut candidates: Vec<&Competitor> =
            pool.iter().filter(|b| window(b) && self.is_open(a.id, b.id)).collect();
        if candidates.is_empty() {
            candidates = pool.iter().filter(|b| self.is_open(a.id, b.id)).collect();
        }
        if cap_top_tier && a.is_top_tier() {
            candidates.retain(|b| !b.is_top_tier());
        }

        pick_best_opponent(a, candidates, &self.used, &self.pairs, self.event_date, false)
    }

    fn book(&mut self, state: &mut LeagueState, event_idx: usize, a: CompetitorId, b: CompetitorId, ranked: bool) -> bool {
        let mut fight = Fight::scheduled(state.meta.next_fight_id, self.event_id, self.division, a, b);
        fight.is_top15 = ranked;

        if append_fight(state, event_idx, fight).is_none() {
            return false;
        }

        self.used.insert(a);
        self.used.insert(b);
        self.event_pairs.insert(pair_key(a, b));
        true
    }
}

fn rank_gap(a: &Competitor, b: &Competitor) -> u32 {
    a.rank_slot.unwrap_or_default().abs_diff(b.rank_slot.unwrap_or_default())
}

/// Theme-country competitors first, then by rating
fn order_pool(pool: &mut [Competitor], theme: &str) {
    let boost = |c: &Competitor| !theme.trim().is_empty() && c.country == theme;
    pool.sort_by(|a, b| boost(b).cmp(&boost(a)).then_with(|| b.rating.total_cmp(&a.rating)));
}

impl GameService {
    /// Builds the rest of an event's card around its marquee bouts.
    ///
    /// Picks a card size, splits it into per-division targets, books ranked
    /// and unranked bouts in each division, backfills any shortfall and
    /// finally labels every non-marquee fight with a card slot. A division
    /// that runs out of eligible pairings simply books fewer fights.
    pub fn fill_full_card(
        &mut self,
        state: &mut LeagueState,
        event_idx: usize,
        event_date: NaiveDate
    ) -> Result<(), LeagueError> {
        let divisions = state.division_names();
        if divisions.is_empty() {
            return Ok(());
        }

        let event_id = state.events[event_idx].id;
        let kind = state.events[event_idx].kind;
        let theme = state.events[event_idx].theme_country.clone();
        let (main_count, prelim_count) = self.pick_card_plan(kind);

        let mut existing_counts: HashMap<String, usize> = HashMap::new();
        let mut existing_top: HashMap<String, usize> = HashMap::new();
        for fight in state.event_fights(event_id).filter(|f| f.is_scheduled() && !f.is_marquee()) {
            *existing_counts.entry(fight.division.clone()).or_default() += 1;
            if state.fight_is_ranked(fight)? {
                *existing_top.entry(fight.division.clone()).or_default() += 1;
            }
        }

        let targets = self.division_targets(&divisions, &existing_counts, main_count + prelim_count);
        let top_targets = self.top_targets(&divisions, &existing_top, &targets, main_count);
        let mut top_tier_count = count_top_tier_bouts(state, event_id)?;

        for division in &divisions {
            self.fill_division(
                state,
                event_idx,
                event_date,
                division,
                &theme,
                targets[division],
                top_targets[division],
                &mut top_tier_count
            )?;
        }

        assign_card_slots(state, event_id, main_count)?;

        let booked = state.event_fights(event_id).filter(|f| f.is_scheduled()).count();
        state.events[event_idx].note(news::full_card_msg(booked));
        info!(event_id, main_count, prelim_count, booked, "Full card announced");

        Ok(())
    }

    /// Random (main card, prelims) split whose total with marquee slots lands in 16..=20.
    fn pick_card_plan(&mut self, kind: EventKind) -> (usize, usize) {
        let marquee = kind.marquee_slots();
        let options: Vec<(usize, usize)> = MAIN_CARD_RANGE
            .flat_map(|main| PRELIM_RANGE.map(move |prelims| (main, prelims)))
            .filter(|(main, prelims)| (MIN_CARD_SIZE..=MAX_CARD_SIZE).contains(&(main + prelims + marquee)))
            .collect();

        if options.is_empty() {
            return FALLBACK_PLAN;
        }

        options[self.rng.random_range(0..options.len())]
    }

    /// Per-division fight targets summing to `total` where caps allow.
    ///
    /// Up to three randomly chosen divisions are guaranteed two fights; the
    /// remainder is handed out one at a time to random divisions below the
    /// cap of 40% of the card, clamped to 4..=6. With fewer than three
    /// divisions there is no cap.
    fn division_targets(
        &mut self,
        divisions: &[String],
        existing: &HashMap<String, usize>,
        total: usize
    ) -> IndexMap<String, usize> {
        let cap = if divisions.len() < SEEDED_DIVISIONS {
            total
        } else {
            (total * 2 / 5).clamp(DIVISION_CAP_MIN, DIVISION_CAP_MAX)
        };

        let mut keyed: Vec<(u32, &String)> = divisions.iter().map(|d| (self.rng.random::<u32>(), d)).collect();
        keyed.sort_by_key(|(key, _)| *key);
        let seeds: Vec<String> = keyed
            .into_iter()
            .take(divisions.len().min(SEEDED_DIVISIONS))
            .map(|(_, d)| d.clone())
            .collect();

        let mut targets: IndexMap<String, usize> = divisions
            .iter()
            .map(|d| (d.clone(), existing.get(d).copied().unwrap_or(0)))
            .collect();
        let mut remaining = total.saturating_sub(targets.values().sum());

        for division in &seeds {
            let target = &mut targets[division];
            let add = SEEDED_MIN_FIGHTS.saturating_sub(*target).min(remaining);
            *target += add;
            remaining -= add;
        }

        while remaining > 0 {
            let open: Vec<&String> = targets.iter().filter(|(_, t)| **t < cap).map(|(d, _)| d).collect();
            if open.is_empty() {
                break;
            }

            let division = open[self.rng.random_range(0..open.len())].clone();
            targets[&division] += 1;
            remaining -= 1;
        }

        targets
    }

    /// Spreads the ranked-fight quota (at least the main card size) over
    /// divisions that still have room under their total target.
    fn top_targets(
        &mut self,
        divisions: &[String],
        existing_top: &HashMap<String, usize>,
        targets: &IndexMap<String, usize>,
        main_count: usize
    ) -> IndexMap<String, usize> {
        let existing_sum: usize = existing_top.values().sum();
        let mut remaining = main_count.max(existing_sum) - existing_sum;
        let mut top: IndexMap<String, usize> = divisions
            .iter()
            .map(|d| (d.clone(), existing_top.get(d).copied().unwrap_or(0)))
            .collect();

        while remaining > 0 {
            let open: Vec<&String> = divisions.iter().filter(|d| top[*d] < targets[*d]).collect();
            if open.is_empty() {
                break;
            }

            let division = open[self.rng.random_range(0..open.len())].clone();
            top[&division] += 1;
            remaining -= 1;
        }

        top
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_division(
        &mut self,
        state: &mut LeagueState,
        event_idx: usize,
        event_date: NaiveDate,
        division: &str,
        theme: &str,
        target_total: usize,
        top_target: usize,
        top_tier_count: &mut usize
    ) -> Result<(), LeagueError> {
        let event_id = state.events[event_idx].id;
        let rest_days = self.sim.rest_days;

        let (mut used, booked_pairs) = booked_elsewhere(state, division, event_id);
        let mut event_pairs = HashSet::new();
        let (mut top_existing, mut unranked_existing) = (0, 0);
        for fight in state.event_fights(event_id).filter(|f| f.division == division) {
            used.insert(fight.a_id);
            used.insert(fight.b_id);
            event_pairs.insert(pair_key(fight.a_id, fight.b_id));

            if fight.is_scheduled() && !fight.is_marquee() {
                if fight.is_top15 {
                    top_existing += 1;
                } else {
                    unranked_existing += 1;
                }
            }
        }

        let top_target = top_target.min(target_total);
        let mut top_needed = top_target.saturating_sub(top_existing);
        let mut unranked_needed = target_total.saturating_sub(top_target).saturating_sub(unranked_existing);

        let mut top_pool = available_pool(state, division, true, event_date, rest_days, &used)?;
        let mut unranked_pool = available_pool(state, division, false, event_date, rest_days, &used)?;
        order_pool(&mut top_pool, theme);
        order_pool(&mut unranked_pool, theme);

        let mut book = DivisionBook {
            event_id,
            event_date,
            division,
            booked_pairs,
            event_pairs,
            used,
            pairs: state.pairs(division)
        };

        let allow_special = self.rng.random::<f64>() < SPECIAL_BOOKING_CHANCE;

        while top_needed > 0 && top_pool.len() >= 2 {
            let a = top_pool.remove(0);
            let cap = *top_tier_count >= TOP_TIER_BOUT_LIMIT;

            // Hot streaks may jump the rank window
            let picked = if allow_special && a.streak >= SPECIAL_BOOKING_STREAK {
                book.pick(&a, &top_pool, |_| true, cap)
            } else {
                book.pick(&a, &top_pool, |b| rank_gap(&a, b) <= RANK_GAP_WINDOW, cap)
            };
            let Some(b) = picked.map(|b| (b.id, b.is_top_tier())) else {
                continue;
            };

            top_pool.retain(|c| c.id != b.0);
            if book.book(state, event_idx, a.id, b.0, true) {
                top_needed -= 1;
                if a.is_top_tier() && b.1 {
                    *top_tier_count += 1;
                }
            }
        }

        while unranked_needed > 0 && unranked_pool.len() >= 2 {
            let a = unranked_pool.remove(0);
            let picked = book.pick(&a, &unranked_pool, |b| (a.rating - b.rating).abs() <= RATING_GAP_WINDOW, false);
            let Some(b_id) = picked.map(|b| b.id) else {
                break;
            };

            unranked_pool.retain(|c| c.id != b_id);
            if book.book(state, event_idx, a.id, b_id, false) {
                unranked_needed -= 1;
            }
        }

        let mut current_total = state
            .event_fights(event_id)
            .filter(|f| f.division == division && f.is_scheduled() && !f.is_marquee())
            .count();
        let ranked_chance = state.events[event_idx].kind.ranked_backfill_chance();

        while current_total < target_total {
            let mut use_top = self.rng.random::<f64>() < ranked_chance && top_pool.len() >= 2;
            if !use_top && unranked_pool.len() < 2 {
                use_top = true;
            }

            let pool = if use_top { &mut top_pool } else { &mut unranked_pool };
            if pool.len() < 2 {
                break;
            }

            let a = pool.remove(0);
            let cap = use_top && *top_tier_count >= TOP_TIER_BOUT_LIMIT;
            let picked = if use_top {
                book.pick(&a, pool, |b| rank_gap(&a, b) <= RANK_GAP_WINDOW, cap)
            } else {
                book.pick(&a, pool, |b| (a.rating - b.rating).abs() <= RATING_GAP_WINDOW, false)
            };
            // `a` is already out of the pool, so skipping keeps the loop finite
            let Some(b) = picked.map(|b| (b.id, b.is_top_tier())) else {
                continue;
            };

            pool.retain(|c| c.id != b.0);
            if book.book(state, event_idx, a.id, b.0, use_top) {
                current_total += 1;
                if use_top && a.is_top_tier() && b.1 {
                    *top_tier_count += 1;
                }
            }
        }

        debug!(event_id, division, target_total, booked = current_total, "Filled division");

        Ok(())
    }
}

/// Non-cancelled bouts on the event where both sides are top tier
fn count_top_tier_bouts(state: &LeagueState, event_id: EventId) -> Result<usize, LeagueError> {
    let mut count = 0;

    for fight in state.event_fights(event_id).filter(|f| !f.is_cancelled()) {
        let a = state.competitor(&fight.division, fight.a_id)?;
        let b = state.competitor(&fight.division, fight.b_id)?;
        if a.is_top_tier() && b.is_top_tier() {
            count += 1;
        }
    }

    Ok(count)
}

/// Labels every unslotted fight: the best-rated ranked bouts fill the main
/// card quota, everything else goes to the prelims.
fn assign_card_slots(state: &mut LeagueState, event_id: EventId, main_count: usize) -> Result<(), LeagueError> {
    let mut ranked: Vec<(usize, f64)> = Vec::new();

    for (idx, fight) in state.fights.iter().enumerate() {
        if fight.event_id != event_id || fight.card_slot.is_some() {
            continue;
        }
        if state.fight_is_ranked(fight)? {
            ranked.push((idx, state.average_rating(fight)?));
        }
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (idx, _) in ranked.into_iter().take(main_count) {
        state.fights[idx].card_slot = Some(CardSlot::MainCard);
    }

    for fight in state.fights.iter_mut().filter(|f| f.event_id == event_id && f.card_slot.is_none()) {
        fight.card_slot = Some(CardSlot::Prelims);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{calendar::next_weekly_date, structures::event::Event},
        utils::test_utils::generate_league_state
    };

    fn event_with_marquee(state: &mut LeagueState, service: &mut GameService, kind: EventKind) -> usize {
        let date = next_weekly_date(state.meta.current_date, service.plan.event_weekday);
        let id = state.meta.next_event_id;
        state.meta.next_event_id += 1;
        state.events.push(Event::new(id, date, kind, "Apex".to_string(), String::new()));

        let idx = state.events.len() - 1;
        service.plan_main_event(state, idx).unwrap();
        idx
    }

    #[test]
    fn test_two_division_card_size() {
        for seed in 0..20 {
            let mut state = generate_league_state(&["Lightweight", "Welterweight"], 60, seed);
            let mut service = GameService::new(&state.meta);
            let kind = if seed % 2 == 0 {
                EventKind::Numbered
            } else {
                EventKind::FightNight
            };
            let idx = event_with_marquee(&mut state, &mut service, kind);
            let event_id = state.events[idx].id;
            let date = state.events[idx].date;

            let marquee = state.event_fights(event_id).filter(|f| f.is_marquee()).count();
            assert_eq!(marquee, kind.marquee_slots());

            service.fill_full_card(&mut state, idx, date).unwrap();

            let fights: Vec<&Fight> = state.event_fights(event_id).collect();
            assert!(
                (MIN_CARD_SIZE..=MAX_CARD_SIZE).contains(&fights.len()),
                "seed {} booked {} fights",
                seed,
                fights.len()
            );
            assert!(fights.iter().all(|f| f.card_slot.is_some()));
            assert!(fights.iter().all(|f| f.a_id != f.b_id));

            let main_card = fights.iter().filter(|f| f.card_slot == Some(CardSlot::MainCard)).count();
            assert!(main_card > 0 && main_card <= *MAIN_CARD_RANGE.end());

            // Nobody is booked twice on the same card
            let mut seen = HashSet::new();
            for f in &fights {
                assert!(seen.insert(f.a_id));
                assert!(seen.insert(f.b_id));
            }
        }
    }

    #[test]
    fn test_division_targets() {
        let state = generate_league_state(&["Lightweight"], 4, 1);
        let mut service = GameService::new(&state.meta);
        let divisions: Vec<String> = ["A", "B", "C", "D", "E"].iter().map(|s| s.to_string()).collect();

        for _ in 0..50 {
            let targets = service.division_targets(&divisions, &HashMap::new(), 16);

            assert_eq!(targets.values().sum::<usize>(), 16);
            assert!(targets.values().all(|t| *t <= 6));
            assert!(targets.values().filter(|t| **t >= 2).count() >= 3);
        }

        for total in [18, 19, 20] {
            for _ in 0..100 {
                let targets = service.division_targets(&divisions, &HashMap::new(), total);

                assert_eq!(targets.values().sum::<usize>(), total);
                let max = targets.values().copied().max().unwrap();
                assert!(max <= DIVISION_CAP_MAX, "total {} gave one division {} fights", total, max);
            }
        }

        // Three divisions cannot absorb 20 fights under the cap
        let three: Vec<String> = divisions[..3].to_vec();
        let targets = service.division_targets(&three, &HashMap::new(), 20);
        assert!(targets.values().all(|t| *t == DIVISION_CAP_MAX));

        let two: Vec<String> = vec!["A".to_string(), "B".to_string()];
        let targets = service.division_targets(&two, &HashMap::new(), 18);
        assert_eq!(targets.values().sum::<usize>(), 18);
    }

    #[test]
    fn test_card_plan_in_bounds() {
        let state = generate_league_state(&["Lightweight"], 4, 1);
        let mut service = GameService::new(&state.meta);

        for kind in [EventKind::FightNight, EventKind::Numbered, EventKind::Country] {
            for _ in 0..30 {
                let (main, prelims) = service.pick_card_plan(kind);
                assert!(MAIN_CARD_RANGE.contains(&main));
                assert!(PRELIM_RANGE.contains(&prelims));
                assert!((MIN_CARD_SIZE..=MAX_CARD_SIZE).contains(&(main + prelims + kind.marquee_slots())));
            }
        }
    }

    #[test]
    fn test_theme_country_first() {
        let state = generate_league_state(&["Lightweight"], 10, 1);
        let mut pool: Vec<Competitor> = state.roster("Lightweight").unwrap().to_vec();
        pool[9].country = "Iceland".to_string();
        pool[9].rating = 1.0;

        order_pool(&mut pool, "Iceland");

        assert_eq!(pool[0].country, "Iceland");
        assert!(pool[1..].windows(2).all(|w| w[0].rating >= w[1].rating));
    }
}
