use chrono::{Duration, NaiveDate};
use rand::Rng;
use strum_macros::Display;

use crate::{
    config::SimConfig,
    model::{
        rating_utils::{apply_elo, effective_rating, elo_probability},
        structures::competitor::{Competitor, CompetitorId}
    }
};

const DECISIONS: [&str; 3] = ["U-DEC", "S-DEC", "M-DEC"];
const KNOCKOUTS: [&str; 4] = ["KO (head kick)", "TKO (punches)", "TKO (ground and pound)", "TKO (doctor stoppage)"];
const SUBMISSIONS: [&str; 5] = ["SUB (RNC)", "SUB (Armbar)", "SUB (Guillotine)", "SUB (Triangle)", "SUB (Kimura)"];
const KNOCKOUT_ROUNDS: [u8; 5] = [1, 1, 2, 2, 3];
const SUBMISSION_ROUNDS: [u8; 4] = [1, 2, 2, 3];
const FINAL_ROUND: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedFight {
    pub winner_id: CompetitorId,
    pub loser_id: CompetitorId,
    pub a_won: bool,
    pub rating_a: f64,
    pub rating_b: f64,
    pub next_available_a: NaiveDate,
    pub next_available_b: NaiveDate,
    /// Extra injury downtime in days; 0 when the side came out healthy
    pub injury_days_a: i64,
    pub injury_days_b: i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FinishCategory {
    Decision,
    Knockout,
    Submission
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finish {
    pub category: FinishCategory,
    pub method: String,
    pub round: u8,
    pub time: String
}

/// Bernoulli draw: true if side A wins given both effective ratings.
pub fn choose_winner<R: Rng + ?Sized>(effective_a: f64, effective_b: f64, rng: &mut R) -> bool {
    rng.random::<f64>() < elo_probability(effective_a, effective_b)
}

/// Rest period after a fight, plus injury downtime with probability `injury_chance`.
/// Returns the next available date and the extra days applied.
pub fn after_fight_availability<R: Rng + ?Sized>(
    event_date: NaiveDate,
    cfg: &SimConfig,
    rng: &mut R
) -> (NaiveDate, i64) {
    let base = event_date + Duration::days(cfg.rest_days);

    if rng.random::<f64>() < cfg.injury_chance {
        let extra = rng.random_range(cfg.injury_min_days..=cfg.injury_max_days);
        return (base + Duration::days(extra), extra);
    }

    (base, 0)
}

/// Resolves a single fight.
///
/// Draw order: effective rating A, effective rating B, winner, availability A,
/// availability B. The rating update runs on the base ratings, not the
/// effective ones.
pub fn simulate_fight<R: Rng + ?Sized>(
    a: &Competitor,
    b: &Competitor,
    event_date: NaiveDate,
    cfg: &SimConfig,
    rng: &mut R
) -> SimulatedFight {
    let effective_a = effective_rating(a.rating, a.age, a.streak, cfg.sigma, rng);
    let effective_b = effective_rating(b.rating, b.age, b.streak, cfg.sigma, rng);
    let a_won = choose_winner(effective_a, effective_b, rng);

    let (rating_a, rating_b) = apply_elo(a.rating, b.rating, a_won, cfg.k, a.rank_value(), b.rank_value());
    let (next_available_a, injury_days_a) = after_fight_availability(event_date, cfg, rng);
    let (next_available_b, injury_days_b) = after_fight_availability(event_date, cfg, rng);

    let (winner_id, loser_id) = if a_won { (a.id, b.id) } else { (b.id, a.id) };

    SimulatedFight {
        winner_id,
        loser_id,
        a_won,
        rating_a,
        rating_b,
        next_available_a,
        next_available_b,
        injury_days_a,
        injury_days_b
    }
}

pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Seconds into the round; non-final rounds end no later than 4:50.
fn finish_time<R: Rng + ?Sized>(round: u8, rng: &mut R) -> u32 {
    let upper = if round < FINAL_ROUND { 291 } else { 301 };
    rng.random_range(10..upper)
}

/// Draws how a fight ended: decision 52%, KO/TKO 30%, submission 18%.
pub fn random_method_and_time<R: Rng + ?Sized>(rng: &mut R) -> Finish {
    let roll = rng.random::<f64>();

    let (category, round, seconds, method) = if roll < 0.52 {
        let seconds = rng.random_range(10..301);
        (FinishCategory::Decision, FINAL_ROUND, seconds, DECISIONS[rng.random_range(0..DECISIONS.len())])
    } else if roll < 0.82 {
        let round = KNOCKOUT_ROUNDS[rng.random_range(0..KNOCKOUT_ROUNDS.len())];
        let seconds = finish_time(round, rng);
        (FinishCategory::Knockout, round, seconds, KNOCKOUTS[rng.random_range(0..KNOCKOUTS.len())])
    } else {
        let round = SUBMISSION_ROUNDS[rng.random_range(0..SUBMISSION_ROUNDS.len())];
        let seconds = finish_time(round, rng);
        (FinishCategory::Submission, round, seconds, SUBMISSIONS[rng.random_range(0..SUBMISSIONS.len())])
    };

    Finish {
        category,
        method: method.to_string(),
        round,
        time: format_mmss(seconds)
    }
}
