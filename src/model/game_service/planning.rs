use chrono::{Duration, NaiveDate};
use rand::Rng;
use tracing::{debug, info};

use super::{append_fight, booked_elsewhere, event_used_ids, GameService};
use crate::{
    error::LeagueError,
    model::{
        calendar::{
            event_dates_in_horizon, full_generate_date, last_complete_month_date, main_announce_date, next_weekly_date
        },
        constants::{
            CO_MAIN_TITLE_CHANCE, MARQUEE_POOL, PAIR_SCORE_BASE, RANK_PROXIMITY_BASE, RANK_PROXIMITY_STEP,
            REMATCH_COOLDOWN_DAYS, TITLE_CHALLENGER_POOL, TITLE_CHALLENGER_PREFERRED
        },
        matchmaking::{in_rematch_cooldown, pick_best_opponent},
        news,
        structures::{
            card_slot::CardSlot,
            competitor::{Competitor, CompetitorId},
            event::Event,
            event_kind::EventKind,
            fight::Fight,
            league_state::LeagueState,
            pair_history::pair_key
        }
    }
};

const CITIES: [&str; 10] = [
    "Las Vegas",
    "New York",
    "London",
    "Paris",
    "Abu Dhabi",
    "Singapore",
    "Tokyo",
    "Sydney",
    "Toronto",
    "Mexico City"
];
const HOME_VENUES: [&str; 5] = ["Las Vegas", "Apex", "New York", "London", "Paris"];

impl GameService {
    /// Brings the calendar and every due event up to date for `today`.
    ///
    /// 1. Plans newly visible calendar months (a no-op when nothing new is visible).
    /// 2. Cancels self-paired fights.
    /// 3. Announces marquee bouts for events inside the main announce window.
    /// 4. Builds the full card for events inside the full generate window.
    ///
    /// Calling it twice with the same `today` books nothing the second time.
    pub fn ensure_events_planned(&mut self, state: &mut LeagueState, today: NaiveDate) -> Result<(), LeagueError> {
        self.plan_calendar(state, today);
        self.cancel_self_fights(state);

        for idx in 0..state.events.len() {
            let event = &state.events[idx];
            if event.completed {
                continue;
            }

            let event_date = event.date;
            if today >= main_announce_date(event_date, &self.plan) && event.announced_main_on.is_none() {
                self.plan_main_event(state, idx)?;
                state.events[idx].announced_main_on = Some(today);
            }

            let event = &state.events[idx];
            if today >= full_generate_date(event_date, &self.plan) && event.generated_on.is_none() {
                self.fill_full_card(state, idx, event_date)?;
                let event = &mut state.events[idx];
                event.generated_on = Some(today);
                event.announced_full_on = Some(today);
            }
        }

        Ok(())
    }

    /// Creates events for calendar months that have come fully into view.
    fn plan_calendar(&mut self, state: &mut LeagueState, today: NaiveDate) {
        let weekday = self.plan.event_weekday;
        let Some(until) = last_complete_month_date(today, self.plan.horizon_weeks, weekday) else {
            return;
        };

        let mut from = next_weekly_date(today, weekday);
        if let Some(done) = state.meta.planned_through {
            from = from.max(next_weekly_date(done + Duration::days(1), weekday));
        }
        if until < from {
            return;
        }

        let weeks = ((until - from).num_days() / 7 + 1) as usize;
        let picks = event_dates_in_horizon(from, weeks, weekday, &mut self.rng);
        state.meta.planned_through = Some(until);

        let mut created = 0;
        for date in picks {
            if state.event_index_on(date).is_some() {
                continue;
            }

            let kind = self.pick_event_kind();
            let (location, theme) = self.pick_location_and_theme(state, kind);
            let id = state.meta.next_event_id;
            state.meta.next_event_id += 1;

            debug!(event_id = id, date = %date, kind = %kind, location = %location, "Planned event");
            state.events.push(Event::new(id, date, kind, location, theme));
            created += 1;
        }

        info!(from = %from, until = %until, created, "Planned calendar");
    }

    fn pick_event_kind(&mut self) -> EventKind {
        let r = self.rng.random::<f64>();

        if r < 0.55 {
            EventKind::FightNight
        } else if r < 0.85 {
            EventKind::Numbered
        } else {
            EventKind::Country
        }
    }

    /// Country events draw a theme from every competitor's country (so bigger
    /// nations come up more often) and tour a world city.
    fn pick_location_and_theme(&mut self, state: &LeagueState, kind: EventKind) -> (String, String) {
        if kind != EventKind::Country {
            let venue = HOME_VENUES[self.rng.random_range(0..HOME_VENUES.len())];
            return (venue.to_string(), String::new());
        }

        let countries: Vec<&str> = state
            .divisions
            .values()
            .flatten()
            .map(|c| c.country.as_str())
            .filter(|c| !c.trim().is_empty())
            .collect();

        let theme = if countries.is_empty() {
            String::new()
        } else {
            countries[self.rng.random_range(0..countries.len())].to_string()
        };
        let city = CITIES[self.rng.random_range(0..CITIES.len())];

        (city.to_string(), theme)
    }

    /// Announces the event and books its marquee bout(s).
    pub fn plan_main_event(&mut self, state: &mut LeagueState, event_idx: usize) -> Result<(), LeagueError> {
        let divisions = state.division_names();
        if divisions.is_empty() {
            return Ok(());
        }

        let kind = state.events[event_idx].kind;
        let main_division = divisions[self.rng.random_range(0..divisions.len())].clone();

        let name = state.events[event_idx].display_name(&self.plan.brand);
        state.events[event_idx].note(name.clone());
        info!(event = %name, division = %main_division, "Announcing main event");

        self.plan_featured_bout(state, event_idx, &main_division, kind.title_chance(), CardSlot::MainEvent)?;

        if kind == EventKind::Numbered {
            let others: Vec<&String> = divisions.iter().filter(|d| **d != main_division).collect();
            let co_division = if others.is_empty() {
                main_division.clone()
            } else {
                others[self.rng.random_range(0..others.len())].clone()
            };

            self.plan_featured_bout(state, event_idx, &co_division, CO_MAIN_TITLE_CHANCE, CardSlot::CoMain)?;
        }

        Ok(())
    }

    /// Books one marquee bout in `division`: a title fight when the dice,
    /// the champion and the league title cooldown allow it, otherwise the
    /// best pairing among the top eight. Leaves the slot empty if neither works.
    fn plan_featured_bout(
        &mut self,
        state: &mut LeagueState,
        event_idx: usize,
        division: &str,
        title_chance: f64,
        slot: CardSlot
    ) -> Result<(), LeagueError> {
        let event_id = state.events[event_idx].id;
        let event_date = state.events[event_idx].date;
        let rest_days = self.sim.rest_days;

        let (mut booked_ids, booked_pairs) = booked_elsewhere(state, division, event_id);
        booked_ids.extend(event_used_ids(state, event_id, division));
        let pairs = state.pairs(division);

        let mut ranked: Vec<&Competitor> = state
            .ranked(division)?
            .into_iter()
            .filter(|c| c.is_available(event_date, rest_days) && !booked_ids.contains(&c.id))
            .collect();
        ranked.sort_by_key(|c| c.rank_slot);

        let mut title_bout: Option<(CompetitorId, CompetitorId)> = None;
        if let Some(champ) = state.champion(division) {
            if champ.is_available(event_date, rest_days)
                && self.rng.random::<f64>() < title_chance
                && !booked_ids.contains(&champ.id)
                && !has_scheduled_title(state, division, champ.id)
                && self.title_due(state, event_date)
            {
                let used = [champ.id].into_iter().collect();
                let preferred = ranked.iter().take(TITLE_CHALLENGER_PREFERRED).copied();
                let wider = ranked.iter().take(TITLE_CHALLENGER_POOL).copied();

                title_bout = pick_best_opponent(champ, preferred, &used, &pairs, event_date, true)
                    .or_else(|| pick_best_opponent(champ, wider, &used, &pairs, event_date, true))
                    .map(|challenger| (champ.id, challenger.id));
            }
        }

        if let Some((champ_id, challenger_id)) = title_bout {
            let mut fight = Fight::scheduled(state.meta.next_fight_id, event_id, division, champ_id, challenger_id);
            fight.is_top15 = true;
            fight.is_title_fight = true;
            fight.is_main_event = slot == CardSlot::MainEvent;
            fight.card_slot = Some(slot);

            if let Some(fight_id) = append_fight(state, event_idx, fight) {
                let a = state.competitor_name(division, champ_id);
                let b = state.competitor_name(division, challenger_id);
                self.note_marquee(state, event_idx, slot, fight_id, division, &a, &b, true);
            }
            return Ok(());
        }

        let contenders: Vec<&Competitor> = ranked.into_iter().take(MARQUEE_POOL).collect();
        let mut best: Option<(CompetitorId, CompetitorId, f64)> = None;

        for (i, a) in contenders.iter().enumerate() {
            for b in contenders.iter().skip(i + 1) {
                let key = pair_key(a.id, b.id);
                if booked_pairs.contains(&key)
                    || in_rematch_cooldown(pairs.last_fought(a.id, b.id), event_date, REMATCH_COOLDOWN_DAYS)
                {
                    continue;
                }

                let rank_gap = (a.rank_slot.unwrap_or_default() as f64 - b.rank_slot.unwrap_or_default() as f64).abs();
                let score =
                    PAIR_SCORE_BASE - (a.rating - b.rating).abs() + RANK_PROXIMITY_BASE - RANK_PROXIMITY_STEP * rank_gap;

                if best.map_or(true, |(_, _, best_score)| score > best_score) {
                    best = Some((a.id, b.id, score));
                }
            }
        }

        let Some((a_id, b_id, _)) = best else {
            debug!(event_id, division, ?slot, "No marquee pairing available");
            return Ok(());
        };

        let mut fight = Fight::scheduled(state.meta.next_fight_id, event_id, division, a_id, b_id);
        fight.is_top15 = true;
        fight.is_main_event = slot == CardSlot::MainEvent;
        fight.card_slot = Some(slot);

        if let Some(fight_id) = append_fight(state, event_idx, fight) {
            let a = state.competitor_name(division, a_id);
            let b = state.competitor_name(division, b_id);
            self.note_marquee(state, event_idx, slot, fight_id, division, &a, &b, false);
        }

        Ok(())
    }

    /// League-wide title cooldown since the last title fight
    fn title_due(&self, state: &LeagueState, event_date: NaiveDate) -> bool {
        state
            .meta
            .last_title_fight_date
            .map_or(true, |last| (event_date - last).num_days() >= self.plan.title_cooldown_days)
    }

    #[allow(clippy::too_many_arguments)]
    fn note_marquee(
        &self,
        state: &mut LeagueState,
        event_idx: usize,
        slot: CardSlot,
        fight_id: i32,
        division: &str,
        a: &str,
        b: &str,
        is_title: bool
    ) {
        let event = &mut state.events[event_idx];

        let message = if slot == CardSlot::MainEvent {
            event.main_fight_id = Some(fight_id);
            news::main_event_msg(division, a, b, is_title)
        } else {
            news::co_main_msg(division, a, b, is_title)
        };

        info!(event_id = event.id, fight_id, "{}", message);
        event.note(message);
    }
}

fn has_scheduled_title(state: &LeagueState, division: &str, champ_id: CompetitorId) -> bool {
    state
        .fights
        .iter()
        .any(|f| f.is_scheduled() && f.division == division && f.is_title_fight && f.involves(champ_id))
}
