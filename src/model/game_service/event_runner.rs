use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, info};

use super::{available_pool, booked_elsewhere, GameService};
use crate::{
    error::LeagueError,
    model::{
        constants::{REPLACEMENT_GAP_RANKED, REPLACEMENT_GAP_UNRANKED},
        matchmaking::pick_best_opponent,
        news,
        ranking::{append_rank_history, recompute_top15},
        simulation::{random_method_and_time, simulate_fight},
        structures::{
            competitor::{Competitor, CompetitorId},
            event::EventId,
            fight::FightOutcome,
            fight_status::FightStatus,
            league_state::LeagueState
        }
    }
};

impl GameService {
    /// Runs the event scheduled on `today`, if there is one and it has not
    /// been run yet. Returns the id of the event that was run.
    ///
    /// Builds the card on demand when it was never generated, processes
    /// withdrawals for cards generated this tick, simulates every scheduled
    /// fight (main event first), then recomputes every division's rankings.
    pub fn run_event(&mut self, state: &mut LeagueState, today: NaiveDate) -> Result<Option<EventId>, LeagueError> {
        let Some(event_idx) = state.event_index_on(today) else {
            return Ok(None);
        };
        if state.events[event_idx].completed {
            return Ok(None);
        }

        if state.events[event_idx].generated_on.is_none() {
            self.fill_full_card(state, event_idx, today)?;
            let event = &mut state.events[event_idx];
            event.generated_on = Some(today);
            event.announced_full_on = Some(today);
        }

        if state.events[event_idx].generated_on == Some(today) {
            self.process_withdrawals(state, event_idx, today)?;
        }

        let event_id = state.events[event_idx].id;
        let mut card: Vec<usize> = state
            .fights
            .iter()
            .enumerate()
            .filter(|(_, f)| f.event_id == event_id && f.is_scheduled())
            .map(|(idx, _)| idx)
            .collect();
        card.sort_by_key(|idx| !state.fights[*idx].is_main_event);

        let champions_before: HashMap<String, CompetitorId> = state
            .divisions
            .iter()
            .filter_map(|(division, roster)| roster.iter().find(|c| c.is_champion).map(|c| (division.clone(), c.id)))
            .collect();

        for fight_idx in card {
            self.resolve_fight(state, event_idx, fight_idx, today, &champions_before)?;
        }

        for roster in state.divisions.values_mut() {
            recompute_top15(roster);
            append_rank_history(roster, today);
        }

        let event = &mut state.events[event_idx];
        event.completed = true;
        info!(
            event_id,
            event = %event.display_name(&self.plan.brand),
            date = %today,
            "Event completed"
        );

        Ok(Some(event_id))
    }

    fn resolve_fight(
        &mut self,
        state: &mut LeagueState,
        event_idx: usize,
        fight_idx: usize,
        today: NaiveDate,
        champions_before: &HashMap<String, CompetitorId>
    ) -> Result<(), LeagueError> {
        let fight = &state.fights[fight_idx];
        let division = fight.division.clone();
        let is_title = fight.is_title_fight;

        if fight.is_self_paired() {
            let name = state.competitor_name(&division, fight.a_id);
            state.fights[fight_idx].status = FightStatus::Cancelled;
            state.events[event_idx].note(news::self_pairing_msg(&name));
            return Ok(());
        }

        let a = state.competitor(&division, fight.a_id)?.clone();
        let b = state.competitor(&division, fight.b_id)?.clone();

        let result = simulate_fight(&a, &b, today, &self.sim, &mut self.rng);
        let finish = random_method_and_time(&mut self.rng);

        let fight = &mut state.fights[fight_idx];
        fight.status = FightStatus::Completed;
        fight.outcome = Some(FightOutcome {
            winner_id: result.winner_id,
            method: finish.method.clone(),
            round: finish.round,
            time: finish.time.clone()
        });

        for (id, rating, next_available, won) in [
            (a.id, result.rating_a, result.next_available_a, result.a_won),
            (b.id, result.rating_b, result.next_available_b, !result.a_won)
        ] {
            let c = state.competitor_mut(&division, id)?;
            c.rating = rating;
            c.next_available_date = Some(next_available);
            c.last_fight_date = Some(today);
            if won {
                c.record_win();
            } else {
                c.record_loss();
            }
            c.rating_history.push(today, rating);
        }

        let (winner, loser) = if result.a_won { (&a, &b) } else { (&b, &a) };
        let event = &mut state.events[event_idx];
        event.note(news::result_msg(&winner.name, &loser.name, &finish.method, finish.round, &finish.time));
        if result.injury_days_a > 0 {
            event.note(news::injury_msg(&a.name, result.injury_days_a));
        }
        if result.injury_days_b > 0 {
            event.note(news::injury_msg(&b.name, result.injury_days_b));
        }
        debug!(
            division = %division,
            winner = %winner.name,
            loser = %loser.name,
            method = %finish.method,
            "Fight resolved"
        );

        state.pairs_mut(&division).record(a.id, b.id, today);

        if is_title {
            state.meta.last_title_fight_date = Some(today);
            self.settle_title(state, event_idx, &division, winner, champions_before.get(&division).copied())?;
        }

        Ok(())
    }

    /// Moves the belt when the title-fight winner is not the incumbent.
    fn settle_title(
        &self,
        state: &mut LeagueState,
        event_idx: usize,
        division: &str,
        winner: &Competitor,
        incumbent: Option<CompetitorId>
    ) -> Result<(), LeagueError> {
        if incumbent == Some(winner.id) {
            state.events[event_idx].note(news::title_defence_msg(division, &winner.name));
            info!(division, champion = %winner.name, "Title defended");
            return Ok(());
        }

        if let Some(old) = incumbent {
            state.competitor_mut(division, old)?.is_champion = false;
        }
        state.competitor_mut(division, winner.id)?.is_champion = true;

        state.events[event_idx].note(news::title_change_msg(division, &winner.name));
        info!(division, champion = %winner.name, "New champion crowned");

        Ok(())
    }

    /// Rolls a withdrawal for every scheduled fight on the card.
    ///
    /// A withdrawn side is replaced by the best same-tier alternate close in
    /// rating to the side that stays, falling back to anyone of that tier.
    /// With no alternate, or when the champion pulls out of a title fight,
    /// the fight is cancelled.
    fn process_withdrawals(
        &mut self,
        state: &mut LeagueState,
        event_idx: usize,
        event_date: NaiveDate
    ) -> Result<(), LeagueError> {
        let event_id = state.events[event_idx].id;
        let rest_days = self.sim.rest_days;

        for division in state.division_names() {
            let card: Vec<usize> = state
                .fights
                .iter()
                .enumerate()
                .filter(|(_, f)| f.event_id == event_id && f.division == division && f.is_scheduled())
                .map(|(idx, _)| idx)
                .collect();

            // Replacements come from outside this card and every other card
            let mut used: HashSet<CompetitorId> =
                card.iter().flat_map(|idx| [state.fights[*idx].a_id, state.fights[*idx].b_id]).collect();
            used.extend(booked_elsewhere(state, &division, event_id).0);
            let pairs = state.pairs(&division);
            let mut top_pool = available_pool(state, &division, true, event_date, rest_days, &used)?;
            let mut unranked_pool = available_pool(state, &division, false, event_date, rest_days, &used)?;

            for fight_idx in card {
                if self.rng.random::<f64>() >= self.sim.withdrawal_chance {
                    continue;
                }

                let fight = &state.fights[fight_idx];
                let (a_id, b_id) = (fight.a_id, fight.b_id);
                let (is_top, is_title) = (fight.is_top15, fight.is_title_fight);
                let (out_id, stay_id) = if self.rng.random::<f64>() < 0.5 {
                    (a_id, b_id)
                } else {
                    (b_id, a_id)
                };

                let out_name = state.competitor_name(&division, out_id);
                state.events[event_idx].note(news::withdrawal_msg(&out_name));
                info!(event_id, division = %division, competitor = %out_name, "Withdrawal");

                let champion_out = is_title && state.competitor(&division, out_id)?.is_champion;
                let stay = state.competitor(&division, stay_id)?.clone();

                let pool = if is_top { &mut top_pool } else { &mut unranked_pool };
                let gap = if is_top {
                    REPLACEMENT_GAP_RANKED
                } else {
                    REPLACEMENT_GAP_UNRANKED
                };

                let replacement = if champion_out {
                    None
                } else {
                    let close: Vec<&Competitor> =
                        pool.iter().filter(|c| (c.rating - stay.rating).abs() <= gap).collect();
                    let candidates = if close.is_empty() { pool.iter().collect() } else { close };

                    pick_best_opponent(&stay, candidates, &used, &pairs, event_date, false).map(|c| c.id)
                };

                let Some(replacement_id) = replacement else {
                    state.fights[fight_idx].status = FightStatus::Cancelled;
                    let a = state.competitor_name(&division, a_id);
                    let b = state.competitor_name(&division, b_id);
                    state.events[event_idx].note(news::cancelled_msg(&a, &b));
                    info!(event_id, division = %division, "Fight cancelled after withdrawal");
                    continue;
                };

                let in_name = state.competitor_name(&division, replacement_id);
                state.events[event_idx].note(news::replacement_msg(&out_name, &in_name));

                let fight = &mut state.fights[fight_idx];
                if out_id == a_id {
                    fight.a_id = replacement_id;
                } else {
                    fight.b_id = replacement_id;
                }
                used.insert(replacement_id);
                pool.retain(|c| c.id != replacement_id);
            }
        }

        Ok(())
    }
}
