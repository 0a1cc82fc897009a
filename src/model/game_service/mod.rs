mod card;
mod event_runner;
mod planning;

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{
    config::{PlanConfig, SimConfig},
    error::LeagueError,
    model::{
        calendar::next_weekly_date,
        news,
        structures::{
            competitor::{Competitor, CompetitorId},
            event::EventId,
            fight::{Fight, FightId},
            fight_status::FightStatus,
            league_state::LeagueState,
            pair_history::{pair_key, PairKey},
            save_metadata::SaveMetadata
        }
    }
};

/// Drives the weekly tick against a [`LeagueState`].
///
/// The service owns the only random generator used by the core. Every call
/// that needs randomness draws from it in a fixed order, so a league
/// replayed from the same snapshot produces the same calendar, cards and
/// results.
pub struct GameService {
    pub sim: SimConfig,
    pub plan: PlanConfig,
    rng: ChaCha8Rng
}

/// Generator seed for a tick starting on `meta.current_date`
pub fn tick_seed(meta: &SaveMetadata) -> u64 {
    meta.random_seed
        .wrapping_add(meta.current_date.num_days_from_ce() as u64)
}

impl GameService {
    pub fn new(meta: &SaveMetadata) -> GameService {
        GameService::with_config(meta, SimConfig::default(), PlanConfig::default())
    }

    pub fn with_config(meta: &SaveMetadata, sim: SimConfig, plan: PlanConfig) -> GameService {
        GameService {
            sim,
            plan,
            rng: ChaCha8Rng::seed_from_u64(tick_seed(meta))
        }
    }

    /// Re-seeds the generator from the league's seed and current date.
    pub fn reseed(&mut self, meta: &SaveMetadata) {
        self.rng = ChaCha8Rng::seed_from_u64(tick_seed(meta));
    }

    /// Prepares a freshly loaded league: seeds histories and plans the horizon.
    /// Atomic: on error `state` is left untouched.
    pub fn initialize(&mut self, state: &mut LeagueState) -> Result<(), LeagueError> {
        self.atomically(state, |service, working| {
            let today = working.meta.current_date;

            service.ensure_histories_initialized(working, today);
            service.ensure_events_planned(working, today)
        })
    }

    /// Runs one weekly tick and returns the event that was run, if any.
    ///
    /// The tick plans at the current date, advances to the next event day,
    /// plans again and finally runs the event on the new date. Atomic: on
    /// error `state` keeps its previous contents.
    pub fn advance_week(&mut self, state: &mut LeagueState) -> Result<Option<EventId>, LeagueError> {
        self.atomically(state, |service, working| {
            let today = working.meta.current_date;

            service.ensure_histories_initialized(working, today);
            service.ensure_events_planned(working, today)?;

            let next = service.advance_to_next_week(working);
            service.ensure_events_planned(working, next)?;
            service.run_event(working, next)
        })
    }

    fn atomically<T, F>(&mut self, state: &mut LeagueState, step: F) -> Result<T, LeagueError>
    where
        F: FnOnce(&mut GameService, &mut LeagueState) -> Result<T, LeagueError>
    {
        if state.divisions.is_empty() {
            return Err(LeagueError::EmptyLeague);
        }

        self.reseed(&state.meta);
        let mut working = state.clone();
        let result = step(self, &mut working)?;
        *state = working;

        Ok(result)
    }

    /// Fills in missing divisions and seeds empty rating/rank histories with
    /// the competitor's current values. Returns whether anything changed.
    pub fn ensure_histories_initialized(&self, state: &mut LeagueState, start_date: NaiveDate) -> bool {
        let mut changed = false;

        for (division, roster) in state.divisions.iter_mut() {
            for c in roster.iter_mut() {
                if c.division.trim().is_empty() {
                    c.division = division.clone();
                    changed = true;
                }
                if c.rating_history.is_empty() {
                    c.rating_history.push(start_date, c.rating);
                    changed = true;
                }
                if c.rank_history.is_empty() {
                    let mark = c.rank_mark();
                    c.rank_history.push(start_date, mark);
                    changed = true;
                }
            }
        }

        changed
    }

    /// Moves the league to the next event day and returns it.
    pub fn advance_to_next_week(&self, state: &mut LeagueState) -> NaiveDate {
        let today = state.meta.current_date;
        let next = if today.weekday() != self.plan.event_weekday {
            next_weekly_date(today, self.plan.event_weekday)
        } else {
            today + Duration::weeks(1)
        };

        debug!(from = %today, to = %next, "Advancing league date");
        state.meta.current_date = next;
        next
    }

    /// Cancels any scheduled fight whose two sides are the same competitor.
    pub fn cancel_self_fights(&self, state: &mut LeagueState) {
        let mut cancelled = Vec::new();

        for fight in state.fights.iter_mut() {
            if fight.is_scheduled() && fight.is_self_paired() {
                fight.status = FightStatus::Cancelled;
                cancelled.push((fight.event_id, fight.division.clone(), fight.a_id));
            }
        }

        for (event_id, division, id) in cancelled {
            let name = state.competitor_name(&division, id);
            if let Some(idx) = state.event_index(event_id) {
                state.events[idx].note(news::self_pairing_msg(&name));
            }
            info!(event_id, division = %division, id, "Cancelled self-paired fight");
        }
    }
}

/// Competitors and pairs held by scheduled fights of `division` on events
/// other than `event_id`.
fn booked_elsewhere(
    state: &LeagueState,
    division: &str,
    event_id: EventId
) -> (HashSet<CompetitorId>, HashSet<PairKey>) {
    let mut ids = HashSet::new();
    let mut pairs = HashSet::new();

    for fight in state
        .fights
        .iter()
        .filter(|f| f.is_scheduled() && f.division == division && f.event_id != event_id)
    {
        ids.insert(fight.a_id);
        ids.insert(fight.b_id);
        pairs.insert(pair_key(fight.a_id, fight.b_id));
    }

    (ids, pairs)
}

/// Everyone already on the card of `event_id` in `division`
fn event_used_ids(state: &LeagueState, event_id: EventId, division: &str) -> HashSet<CompetitorId> {
    state
        .event_fights(event_id)
        .filter(|f| f.division == division)
        .flat_map(|f| [f.a_id, f.b_id])
        .collect()
}

/// Available, unused competitors of one tier, cloned so booking loops can
/// consume them without touching the roster.
fn available_pool(
    state: &LeagueState,
    division: &str,
    ranked: bool,
    when: NaiveDate,
    rest_days: i64,
    used: &HashSet<CompetitorId>
) -> Result<Vec<Competitor>, LeagueError> {
    let tier = if ranked {
        state.ranked(division)?
    } else {
        state.unranked(division)?
    };

    Ok(tier
        .into_iter()
        .filter(|c| c.is_available(when, rest_days) && !used.contains(&c.id))
        .cloned()
        .collect())
}

/// Appends `fight` to the league and consumes a fight id.
///
/// A self-paired fight is refused with a note on the event instead.
fn append_fight(state: &mut LeagueState, event_idx: usize, fight: Fight) -> Option<FightId> {
    if fight.is_self_paired() {
        let name = state.competitor_name(&fight.division, fight.a_id);
        state.events[event_idx].note(news::self_pairing_msg(&name));
        return None;
    }

    let id = fight.id;
    debug!(
        fight_id = id,
        event_id = fight.event_id,
        division = %fight.division,
        a = fight.a_id,
        b = fight.b_id,
        "Booked fight"
    );
    state.fights.push(fight);
    state.meta.next_fight_id += 1;

    Some(id)
}
