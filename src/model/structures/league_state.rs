use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::{
    error::LeagueError,
    model::structures::{
        competitor::{Competitor, CompetitorId},
        event::{Event, EventId},
        fight::Fight,
        pair_history::PairHistory,
        save_metadata::SaveMetadata
    }
};

/// The in-memory league snapshot a weekly tick runs against.
///
/// Division order is insertion order and is part of the deterministic
/// contract: every per-division pass walks the rosters in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueState {
    pub divisions: IndexMap<String, Vec<Competitor>>,
    pub events: Vec<Event>,
    pub fights: Vec<Fight>,
    pub pair_history: IndexMap<String, PairHistory>,
    pub meta: SaveMetadata
}

impl LeagueState {
    pub fn new(meta: SaveMetadata) -> Self {
        LeagueState {
            divisions: IndexMap::new(),
            events: Vec::new(),
            fights: Vec::new(),
            pair_history: IndexMap::new(),
            meta
        }
    }

    pub fn add_division(&mut self, name: &str, roster: Vec<Competitor>) {
        self.divisions.insert(name.to_string(), roster);
        self.pair_history.entry(name.to_string()).or_default();
    }

    pub fn division_names(&self) -> Vec<String> {
        self.divisions.keys().cloned().collect()
    }

    pub fn roster(&self, division: &str) -> Result<&[Competitor], LeagueError> {
        self.divisions
            .get(division)
            .map(|r| r.as_slice())
            .ok_or_else(|| LeagueError::UnknownDivision(division.to_string()))
    }

    pub fn competitor(&self, division: &str, id: CompetitorId) -> Result<&Competitor, LeagueError> {
        self.roster(division)?
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| LeagueError::MissingCompetitor {
                division: division.to_string(),
                id
            })
    }

    pub fn competitor_mut(&mut self, division: &str, id: CompetitorId) -> Result<&mut Competitor, LeagueError> {
        self.divisions
            .get_mut(division)
            .ok_or_else(|| LeagueError::UnknownDivision(division.to_string()))?
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| LeagueError::MissingCompetitor {
                division: division.to_string(),
                id
            })
    }

    /// Name for notes; falls back to `#id` when the competitor is unknown.
    pub fn competitor_name(&self, division: &str, id: CompetitorId) -> String {
        self.competitor(division, id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|_| format!("#{}", id))
    }

    pub fn champion(&self, division: &str) -> Option<&Competitor> {
        self.divisions.get(division)?.iter().find(|c| c.is_champion)
    }

    /// Ranked, non-champion competitors of a division
    pub fn ranked(&self, division: &str) -> Result<Vec<&Competitor>, LeagueError> {
        Ok(self
            .roster(division)?
            .iter()
            .filter(|c| !c.is_champion && c.is_ranked())
            .collect())
    }

    /// Unranked, non-champion competitors of a division
    pub fn unranked(&self, division: &str) -> Result<Vec<&Competitor>, LeagueError> {
        Ok(self
            .roster(division)?
            .iter()
            .filter(|c| !c.is_champion && !c.is_ranked())
            .collect())
    }

    /// Copy of a division's pair history (empty if none recorded yet)
    pub fn pairs(&self, division: &str) -> PairHistory {
        self.pair_history.get(division).cloned().unwrap_or_default()
    }

    pub fn pairs_mut(&mut self, division: &str) -> &mut PairHistory {
        self.pair_history.entry(division.to_string()).or_default()
    }

    pub fn event_index(&self, id: EventId) -> Option<usize> {
        self.events.iter().position(|e| e.id == id)
    }

    pub fn event_index_on(&self, date: NaiveDate) -> Option<usize> {
        self.events.iter().position(|e| e.date == date)
    }

    pub fn event_fights(&self, event_id: EventId) -> impl Iterator<Item = &Fight> {
        self.fights.iter().filter(move |f| f.event_id == event_id)
    }

    /// Both sides ranked (champions hold no slot, so title fights are not "ranked").
    pub fn fight_is_ranked(&self, fight: &Fight) -> Result<bool, LeagueError> {
        let a = self.competitor(&fight.division, fight.a_id)?;
        let b = self.competitor(&fight.division, fight.b_id)?;

        Ok(a.is_ranked() && b.is_ranked())
    }

    pub fn average_rating(&self, fight: &Fight) -> Result<f64, LeagueError> {
        let a = self.competitor(&fight.division, fight.a_id)?;
        let b = self.competitor(&fight.division, fight.b_id)?;

        Ok((a.rating + b.rating) / 2.0)
    }

    pub fn competitor_count(&self) -> usize {
        self.divisions.values().map(|r| r.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeagueError;

    fn state() -> LeagueState {
        let mut state = LeagueState::new(SaveMetadata::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 1));
        let mut champ = Competitor::new(1, "Flyweight", "Champ", "US", 30);
        champ.is_champion = true;
        let mut ranked = Competitor::new(2, "Flyweight", "Ranked", "BR", 28);
        ranked.rank_slot = Some(1);
        let unranked = Competitor::new(3, "Flyweight", "Prospect", "MX", 24);

        state.add_division("Flyweight", vec![champ, ranked, unranked]);
        state
    }

    #[test]
    fn test_missing_competitor_is_error() {
        let state = state();

        match state.competitor("Flyweight", 99) {
            Err(LeagueError::MissingCompetitor { division, id }) => {
                assert_eq!(division, "Flyweight");
                assert_eq!(id, 99);
            }
            other => panic!("Expected MissingCompetitor, got {:?}", other)
        }
        assert!(matches!(
            state.competitor("Heavyweight", 1),
            Err(LeagueError::UnknownDivision(_))
        ));
    }

    #[test]
    fn test_pools_exclude_champion() {
        let state = state();

        assert_eq!(state.champion("Flyweight").unwrap().id, 1);
        assert_eq!(state.ranked("Flyweight").unwrap().iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(state.unranked("Flyweight").unwrap().iter().map(|c| c.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_competitor_name_fallback() {
        let state = state();

        assert_eq!(state.competitor_name("Flyweight", 2), "Ranked");
        assert_eq!(state.competitor_name("Flyweight", 42), "#42");
    }
}
