//! Generates a fresh, playable league from a seed.

use chrono::NaiveDate;
use rand::{seq::IndexedRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::model::{
    constants::DEFAULT_RATING,
    ranking::recompute_top15,
    rating_utils::gaussian,
    structures::{
        competitor::{Competitor, CompetitorId},
        league_state::LeagueState,
        save_metadata::SaveMetadata
    }
};

pub const DEFAULT_DIVISIONS: [&str; 8] = [
    "Flyweight",
    "Bantamweight",
    "Featherweight",
    "Lightweight",
    "Welterweight",
    "Middleweight",
    "Light Heavyweight",
    "Heavyweight"
];

const FIRST_NAMES: [&str; 24] = [
    "Alex", "Bruno", "Carlos", "Dmitri", "Eddie", "Felipe", "Georges", "Hiro", "Ivan", "Jamal", "Khalid", "Leon",
    "Marco", "Nate", "Omar", "Pavel", "Quinn", "Rafael", "Sean", "Tariq", "Umar", "Viktor", "Wesley", "Yusuf"
];

const LAST_NAMES: [&str; 24] = [
    "Almeida", "Barros", "Costa", "Dvorak", "Evans", "Ferreira", "Garcia", "Hayes", "Ito", "Jensen", "Kowalski",
    "Lopez", "Moreau", "Nakamura", "Okafor", "Petrov", "Quintero", "Rossi", "Silva", "Tanaka", "Usman", "Volkov",
    "Walker", "Yilmaz"
];

const COUNTRIES: [&str; 12] = [
    "USA", "Brazil", "Russia", "Mexico", "England", "Ireland", "Japan", "Poland", "Nigeria", "Australia", "Georgia",
    "France"
];

const AGE_RANGE: std::ops::RangeInclusive<u32> = 21..=38;
const RATING_SPREAD: f64 = 110.0;

fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Silva");

    format!("{} {}", first, last)
}

/// `size` unranked competitors with ids `first_id..first_id + size`
pub fn generate_roster<R: Rng + ?Sized>(
    division: &str,
    first_id: CompetitorId,
    size: usize,
    rng: &mut R
) -> Vec<Competitor> {
    (0..size)
        .map(|i| {
            let name = random_name(rng);
            let country = COUNTRIES.choose(rng).copied().unwrap_or("USA");
            let age = rng.random_range(AGE_RANGE);

            let mut c = Competitor::new(first_id + i as CompetitorId, division, &name, country, age);
            c.rating = gaussian(rng, DEFAULT_RATING, RATING_SPREAD).round();
            c
        })
        .collect()
}

/// Crowns the highest rated competitor and ranks the rest.
pub fn crown_and_rank(roster: &mut [Competitor]) {
    for c in roster.iter_mut() {
        c.is_champion = false;
    }

    let best = roster
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.rating.total_cmp(&b.rating))
        .map(|(idx, _)| idx);

    if let Some(idx) = best {
        roster[idx].is_champion = true;
    }

    recompute_top15(roster);
}

/// Builds a league of `divisions`, each with `roster_size` competitors.
///
/// Competitor ids are unique across the league and start at 1, assigned
/// division by division in the given order.
pub fn generate_league(seed: u64, divisions: &[&str], roster_size: usize, date: NaiveDate) -> LeagueState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = LeagueState::new(SaveMetadata::new(date, seed));
    let mut next_id: CompetitorId = 1;

    for division in divisions {
        let mut roster = generate_roster(division, next_id, roster_size, &mut rng);
        next_id += roster_size as CompetitorId;

        crown_and_rank(&mut roster);
        state.add_division(division, roster);
    }

    info!(
        divisions = divisions.len(),
        competitors = state.competitor_count(),
        seed,
        "Generated league"
    );

    state
}
