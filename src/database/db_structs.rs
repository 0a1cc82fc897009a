//! Persisted record shapes.
//!
//! Rows mirror the on-disk document field for field. Decoding is lenient:
//! a malformed number or date turns into a default instead of failing the
//! whole load.

use std::str::FromStr;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    config::LeagueConfig,
    model::{
        constants::DEFAULT_RATING,
        structures::{
            card_slot::CardSlot,
            competitor::Competitor,
            event::Event,
            event_kind::EventKind,
            fight::{Fight, FightOutcome},
            fight_status::FightStatus,
            history::{HistoryEntry, HistoryLog},
            league_state::LeagueState,
            pair_history::PairHistory,
            rank_type::RankType,
            save_metadata::SaveMetadata
        }
    }
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts a number, a numeric string or a bool. Anything else is `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr
{
    let value = Value::deserialize(deserializer)?;

    Ok(match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => (if b { "1" } else { "0" }).parse().ok(),
        _ => None
    })
}

/// Accepts any scalar as text; `null` and containers become empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>
{
    let value = Value::deserialize(deserializer)?;

    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new()
    })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

fn flag(value: bool) -> Option<u8> {
    Some(value as u8)
}

fn is_set(value: Option<u8>) -> bool {
    value.is_some_and(|v| v != 0)
}

fn optional_text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<f64>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankPoint {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    /// Empty for unranked, 0 for the champion
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<u32>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorRow {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub division: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient")]
    pub age: Option<u32>,
    /// Display form of the rank: `C`, the slot number or `NR`
    #[serde(default, deserialize_with = "lenient_text")]
    pub rank_raw: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rank_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rank_slot: String,
    #[serde(default, deserialize_with = "lenient")]
    pub is_champ: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub wins: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub draws: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub losses: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub streak: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_fight_date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub next_available_date: String,
    #[serde(default)]
    pub rating_history: Vec<RatingPoint>,
    #[serde(default)]
    pub rank_history: Vec<RankPoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_active: Option<u8>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    #[serde(default, deserialize_with = "lenient")]
    pub event_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub event_date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub generated_on: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub announced_main_on: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub announced_full_on: String,
    #[serde(default, deserialize_with = "lenient")]
    pub completed: Option<u8>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub main_fight_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub event_kind: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub theme_country: String,
    #[serde(default)]
    pub notes: Vec<String>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightRow {
    #[serde(default, deserialize_with = "lenient")]
    pub fight_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub event_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub division: String,
    #[serde(default, deserialize_with = "lenient")]
    pub a_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub b_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_top15: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_main_event: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_title_fight: Option<u8>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub card_slot: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub winner_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub method: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub round: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time_mmss: String
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRow {
    #[serde(default, deserialize_with = "lenient")]
    pub a_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub b_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_fought: String
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub current_date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub next_event_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub next_fight_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_title_fight_date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub random_seed: Option<u64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub planned_through: String
}

/// The whole persisted document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSnapshot {
    #[serde(default)]
    pub divisions: IndexMap<String, Vec<CompetitorRow>>,
    #[serde(default)]
    pub events: Vec<EventRow>,
    #[serde(default)]
    pub fights: Vec<FightRow>,
    #[serde(default)]
    pub pair_history: IndexMap<String, Vec<PairRow>>,
    #[serde(default)]
    pub meta: MetaRow
}

impl From<&Competitor> for CompetitorRow {
    fn from(c: &Competitor) -> Self {
        let rank_raw = if c.is_champion {
            "C".to_string()
        } else {
            c.rank_slot.map(|s| s.to_string()).unwrap_or_else(|| "NR".to_string())
        };

        CompetitorRow {
            id: Some(c.id),
            division: c.division.clone(),
            name: c.name.clone(),
            country: c.country.clone(),
            age: Some(c.age),
            rank_raw,
            rank_type: c.rank_type.to_string(),
            rank_slot: optional_text(c.rank_slot),
            is_champ: flag(c.is_champion),
            wins: Some(c.wins),
            draws: Some(c.draws),
            losses: Some(c.losses),
            rating: Some(c.rating),
            streak: Some(c.streak),
            last_fight_date: format_date(c.last_fight_date),
            next_available_date: format_date(c.next_available_date),
            rating_history: c
                .rating_history
                .iter()
                .map(|e| RatingPoint {
                    date: format_date(Some(e.date)),
                    value: Some(e.value)
                })
                .collect(),
            rank_history: c
                .rank_history
                .iter()
                .map(|e| RankPoint {
                    date: format_date(Some(e.date)),
                    value: e.value
                })
                .collect(),
            is_active: flag(c.is_active)
        }
    }
}

impl CompetitorRow {
    /// `None` when the row has no usable id.
    pub fn into_competitor(self) -> Option<Competitor> {
        let id = self.id?;
        let is_champion = is_set(self.is_champ) || self.rank_raw.trim().eq_ignore_ascii_case("C");
        let rank_slot = if is_champion {
            None
        } else {
            self.rank_slot
                .trim()
                .parse()
                .ok()
                .or_else(|| self.rank_raw.trim().parse().ok())
        };
        // The stored rank type is display only; flags and slot decide
        let rank_type = if is_champion {
            RankType::Champ
        } else if rank_slot.is_some() {
            RankType::Ranked
        } else {
            RankType::Unranked
        };

        let mut c = Competitor::new(id, &self.division, &self.name, &self.country, self.age.unwrap_or(0));
        c.rank_slot = rank_slot;
        c.rank_type = rank_type;
        c.is_champion = is_champion;
        c.wins = self.wins.unwrap_or(0);
        c.draws = self.draws.unwrap_or(0);
        c.losses = self.losses.unwrap_or(0);
        c.rating = self.rating.filter(|r| r.is_finite()).unwrap_or(DEFAULT_RATING);
        c.streak = self.streak.unwrap_or(0);
        c.last_fight_date = parse_date(&self.last_fight_date);
        c.next_available_date = parse_date(&self.next_available_date);
        c.rating_history = self
            .rating_history
            .into_iter()
            .filter_map(|p| {
                Some(HistoryEntry {
                    date: parse_date(&p.date)?,
                    value: p.value?
                })
            })
            .collect::<HistoryLog<f64>>();
        c.rank_history = self
            .rank_history
            .into_iter()
            .filter_map(|p| {
                Some(HistoryEntry {
                    date: parse_date(&p.date)?,
                    value: p.value
                })
            })
            .collect();
        c.is_active = self.is_active.map_or(true, |v| v != 0);

        Some(c)
    }
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        EventRow {
            event_id: Some(e.id),
            event_date: format_date(Some(e.date)),
            generated_on: format_date(e.generated_on),
            announced_main_on: format_date(e.announced_main_on),
            announced_full_on: format_date(e.announced_full_on),
            completed: flag(e.completed),
            main_fight_id: optional_text(e.main_fight_id),
            event_kind: e.kind.to_string(),
            location: e.location.clone(),
            theme_country: e.theme_country.clone(),
            notes: e.notes.clone()
        }
    }
}

impl EventRow {
    /// `None` when the row has no usable id or date.
    pub fn into_event(self) -> Option<Event> {
        let id = self.event_id?;
        let date = parse_date(&self.event_date)?;
        let kind = EventKind::from_str(self.event_kind.trim()).unwrap_or_default();

        let mut event = Event::new(id, date, kind, self.location, self.theme_country);
        event.generated_on = parse_date(&self.generated_on);
        event.announced_main_on = parse_date(&self.announced_main_on);
        event.announced_full_on = parse_date(&self.announced_full_on);
        event.completed = is_set(self.completed);
        event.main_fight_id = self.main_fight_id.trim().parse().ok();
        event.notes = self.notes;

        Some(event)
    }
}

impl From<&Fight> for FightRow {
    fn from(f: &Fight) -> Self {
        let outcome = f.outcome.as_ref();

        FightRow {
            fight_id: Some(f.id),
            event_id: Some(f.event_id),
            division: f.division.clone(),
            a_id: Some(f.a_id),
            b_id: Some(f.b_id),
            is_top15: flag(f.is_top15),
            is_main_event: flag(f.is_main_event),
            is_title_fight: flag(f.is_title_fight),
            card_slot: optional_text(f.card_slot),
            status: f.status.to_string(),
            winner_id: optional_text(outcome.map(|o| o.winner_id)),
            method: outcome.map(|o| o.method.clone()).unwrap_or_default(),
            round: optional_text(outcome.map(|o| o.round)),
            time_mmss: outcome.map(|o| o.time.clone()).unwrap_or_default()
        }
    }
}

impl FightRow {
    /// `None` when the row is missing an id or either side.
    pub fn into_fight(self) -> Option<Fight> {
        let mut fight = Fight::scheduled(self.fight_id?, self.event_id?, &self.division, self.a_id?, self.b_id?);

        fight.is_top15 = is_set(self.is_top15);
        fight.is_main_event = is_set(self.is_main_event);
        fight.is_title_fight = is_set(self.is_title_fight);
        fight.card_slot = CardSlot::from_str(self.card_slot.trim()).ok();
        fight.status = FightStatus::from_str(self.status.trim()).unwrap_or_default();
        fight.outcome = self.winner_id.trim().parse().ok().map(|winner_id| FightOutcome {
            winner_id,
            method: self.method,
            round: self.round.trim().parse().unwrap_or(0),
            time: self.time_mmss
        });

        Some(fight)
    }
}

impl From<&SaveMetadata> for MetaRow {
    fn from(meta: &SaveMetadata) -> Self {
        MetaRow {
            current_date: format_date(Some(meta.current_date)),
            next_event_id: Some(meta.next_event_id),
            next_fight_id: Some(meta.next_fight_id),
            last_title_fight_date: format_date(meta.last_title_fight_date),
            random_seed: Some(meta.random_seed),
            planned_through: format_date(meta.planned_through)
        }
    }
}

impl MetaRow {
    pub fn into_metadata(self) -> SaveMetadata {
        let defaults = LeagueConfig::default();
        let current_date = parse_date(&self.current_date).unwrap_or(defaults.start_date);

        let mut meta = SaveMetadata::new(current_date, self.random_seed.unwrap_or(defaults.seed));
        meta.next_event_id = self.next_event_id.unwrap_or(1).max(1);
        meta.next_fight_id = self.next_fight_id.unwrap_or(1).max(1);
        meta.last_title_fight_date = parse_date(&self.last_title_fight_date);
        meta.planned_through = parse_date(&self.planned_through);

        meta
    }
}

impl From<&LeagueState> for LeagueSnapshot {
    fn from(state: &LeagueState) -> Self {
        LeagueSnapshot {
            divisions: state
                .divisions
                .iter()
                .map(|(division, roster)| (division.clone(), roster.iter().map(CompetitorRow::from).collect()))
                .collect(),
            events: state.events.iter().map(EventRow::from).collect(),
            fights: state.fights.iter().map(FightRow::from).collect(),
            pair_history: state
                .pair_history
                .iter()
                .map(|(division, pairs)| {
                    let rows = pairs
                        .iter()
                        .map(|(&(a, b), &date)| PairRow {
                            a_id: Some(a),
                            b_id: Some(b),
                            last_fought: format_date(Some(date))
                        })
                        .collect();
                    (division.clone(), rows)
                })
                .collect(),
            meta: MetaRow::from(&state.meta)
        }
    }
}

impl LeagueSnapshot {
    /// Rebuilds the league. Rows without an id (or an event without a date)
    /// are dropped; every other malformed field takes its default.
    pub fn into_state(self) -> LeagueState {
        let mut state = LeagueState::new(self.meta.into_metadata());

        for (division, rows) in self.divisions {
            let roster = rows.into_iter().filter_map(CompetitorRow::into_competitor).collect();
            state.add_division(&division, roster);
        }

        state.events = self.events.into_iter().filter_map(EventRow::into_event).collect();
        state.fights = self.fights.into_iter().filter_map(FightRow::into_fight).collect();

        for (division, rows) in self.pair_history {
            let mut pairs = PairHistory::new();
            for row in rows {
                if let (Some(a), Some(b), Some(date)) = (row.a_id, row.b_id, parse_date(&row.last_fought)) {
                    pairs.record(a, b, date);
                }
            }
            state.pair_history.insert(division, pairs);
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::generate_competitor;

    #[test]
    fn test_competitor_row_defaults_on_garbage() {
        let json = r#"{
            "id": "17",
            "division": "Lightweight",
            "name": "Test",
            "age": "unknown",
            "rankRaw": "4",
            "isChamp": 0,
            "rating": "not a number",
            "streak": null,
            "lastFightDate": "2026-13-45",
            "nextAvailableDate": "",
            "ratingHistory": [{"date": "2026-01-03", "value": 1510.5}, {"date": "bad", "value": 1}],
            "isActive": 1
        }"#;

        let row: CompetitorRow = serde_json::from_str(json).unwrap();
        let c = row.into_competitor().unwrap();

        assert_eq!(c.id, 17);
        assert_eq!(c.age, 0);
        assert_eq!(c.rating, DEFAULT_RATING);
        assert_eq!(c.streak, 0);
        assert_eq!(c.rank_slot, Some(4));
        assert_eq!(c.rank_type, RankType::Ranked);
        assert_eq!(c.last_fight_date, None);
        assert_eq!(c.next_available_date, None);
        assert_eq!(c.rating_history.len(), 1);
        assert!(c.is_active);
    }

    #[test]
    fn test_champion_from_rank_raw() {
        let row = CompetitorRow {
            id: Some(3),
            rank_raw: "C".to_string(),
            rank_slot: "2".to_string(),
            ..Default::default()
        };

        let c = row.into_competitor().unwrap();
        assert!(c.is_champion);
        assert_eq!(c.rank_slot, None);
        assert_eq!(c.rank_type, RankType::Champ);
    }

    #[test]
    fn test_row_without_id_is_dropped() {
        assert!(CompetitorRow::default().into_competitor().is_none());
        assert!(FightRow::default().into_fight().is_none());
        assert!(EventRow {
            event_id: Some(1),
            event_date: "soon".to_string(),
            ..Default::default()
        }
        .into_event()
        .is_none());
    }

    #[test]
    fn test_competitor_row_keeps_fields() {
        let mut c = generate_competitor(9, 1612.25, Some(6));
        c.streak = -2;
        c.wins = 7;
        c.last_fight_date = NaiveDate::from_ymd_opt(2026, 2, 7);
        c.rank_history.push(NaiveDate::from_ymd_opt(2026, 2, 7).unwrap(), Some(6));
        c.rank_history.push(NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(), None);

        let row = CompetitorRow::from(&c);
        assert_eq!(row.rank_raw, "6");
        assert_eq!(row.rank_type, "RANKED");
        assert_eq!(row.last_fight_date, "2026-02-07");

        assert_eq!(row.into_competitor().unwrap(), c);
    }

    #[test]
    fn test_fight_outcome_from_strings() {
        let row = FightRow {
            fight_id: Some(5),
            event_id: Some(2),
            division: "Flyweight".to_string(),
            a_id: Some(1),
            b_id: Some(2),
            card_slot: "MAIN_EVENT".to_string(),
            status: "completed".to_string(),
            winner_id: "2".to_string(),
            method: "KO (Punches)".to_string(),
            round: "3".to_string(),
            time_mmss: "01:42".to_string(),
            ..Default::default()
        };

        let fight = row.into_fight().unwrap();
        assert_eq!(fight.card_slot, Some(CardSlot::MainEvent));
        assert_eq!(fight.status, FightStatus::Completed);
        let outcome = fight.outcome.unwrap();
        assert_eq!(outcome.winner_id, 2);
        assert_eq!(outcome.round, 3);
        assert_eq!(outcome.time, "01:42");
    }
}
