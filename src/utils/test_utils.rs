use chrono::NaiveDate;
use rand::Rng;

use crate::{
    model::structures::{
        competitor::{Competitor, CompetitorId},
        league_state::LeagueState,
        rank_type::RankType
    },
    utils::roster_gen
};

pub fn test_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
}

/// A 30 year old Lightweight with no record. A rank slot also marks the
/// competitor as ranked.
pub fn generate_competitor(id: CompetitorId, rating: f64, rank_slot: Option<u32>) -> Competitor {
    let mut c = Competitor::new(id, "Lightweight", &format!("Fighter {}", id), "USA", 30);
    c.rating = rating;
    c.rank_slot = rank_slot;
    if rank_slot.is_some() {
        c.rank_type = RankType::Ranked;
    }

    c
}

/// Unranked roster with ids `1..=size` and no champion
pub fn generate_roster<R: Rng + ?Sized>(division: &str, size: usize, rng: &mut R) -> Vec<Competitor> {
    roster_gen::generate_roster(division, 1, size, rng)
}

/// Generated league starting on 2026-01-01, one champion per division.
/// Ids start at 1 in the first division.
pub fn generate_league_state(divisions: &[&str], roster_size: usize, seed: u64) -> LeagueState {
    roster_gen::generate_league(seed, divisions, roster_size, test_start_date())
}
