use std::f64::consts::PI;

use rand::Rng;

use crate::model::constants::{
    AGE_BONUS_FLOOR, AGE_BONUS_PEAK, AGE_BONUS_SLOPE, AGE_PEAK, ELO_SCALE, MISMATCH_BASE, MISMATCH_RATING_CAP,
    MISMATCH_SPAN, RANK_FACTOR_MAX, RANK_GAP_SCALE, RANK_GAP_UNRANKED, STREAK_MAX, STREAK_MIN, STREAK_WEIGHT,
    UPSET_WEIGHT, VOLATILITY_MAX, VOLATILITY_MIN
};

/// Probability that a competitor rated `ra` beats one rated `rb`
pub fn elo_probability(ra: f64, rb: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rb - ra) / ELO_SCALE))
}

/// Peaks at +20 for 30-year-olds and loses 4 per year away from it, floored at -40.
pub fn age_bonus(age: u32) -> f64 {
    let distance = (age as i32 - AGE_PEAK).abs() as f64;

    (AGE_BONUS_PEAK - AGE_BONUS_SLOPE * distance).max(AGE_BONUS_FLOOR)
}

pub fn clamp_streak(streak: i32) -> i32 {
    streak.clamp(STREAK_MIN, STREAK_MAX)
}

pub fn streak_bonus(streak: i32) -> f64 {
    STREAK_WEIGHT * clamp_streak(streak) as f64
}

/// Box-Muller draw from N(mean, std_dev). Consumes exactly two uniforms.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = 1.0 - rng.random::<f64>();
    let standard = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();

    mean + std_dev * standard
}

/// Fight-night form: base rating adjusted for age and streak plus performance noise.
pub fn effective_rating<R: Rng + ?Sized>(base: f64, age: u32, streak: i32, sigma: f64, rng: &mut R) -> f64 {
    base + age_bonus(age) + streak_bonus(streak) + gaussian(rng, 0.0, sigma)
}

fn mismatch_factor(ra: f64, rb: f64) -> f64 {
    let diff = (ra - rb).abs();

    MISMATCH_BASE + (diff / MISMATCH_RATING_CAP).min(1.0) * MISMATCH_SPAN
}

fn rank_factor(rank_a: Option<u32>, rank_b: Option<u32>) -> f64 {
    let gap = match (rank_a, rank_b) {
        (None, None) => return 0.0,
        (Some(a), Some(b)) => (a as f64 - b as f64).abs(),
        _ => RANK_GAP_UNRANKED
    };

    (gap / RANK_GAP_SCALE).min(1.0) * RANK_FACTOR_MAX
}

/// Rewards the winner in proportion to how unlikely the win was.
fn upset_bonus(winner_expected: f64) -> f64 {
    (0.5 - winner_expected).max(0.0) * UPSET_WEIGHT
}

/// Rating change for side A. Side B receives exactly the negation.
///
/// The base K is scaled by a volatility multiplier built from the rating
/// mismatch, the rank gap and the size of the upset, clamped to
/// `[VOLATILITY_MIN, VOLATILITY_MAX]`.
pub fn elo_delta(ra: f64, rb: f64, winner_is_a: bool, k: f64, rank_a: Option<u32>, rank_b: Option<u32>) -> f64 {
    let pa = elo_probability(ra, rb);
    let sa = if winner_is_a { 1.0 } else { 0.0 };
    let winner_expected = if winner_is_a { pa } else { 1.0 - pa };

    let multiplier =
        (mismatch_factor(ra, rb) + rank_factor(rank_a, rank_b) + upset_bonus(winner_expected)).clamp(VOLATILITY_MIN, VOLATILITY_MAX);

    k * multiplier * (sa - pa)
}

/// Applies a zero-sum Elo update and returns the new `(ra, rb)`.
pub fn apply_elo(ra: f64, rb: f64, winner_is_a: bool, k: f64, rank_a: Option<u32>, rank_b: Option<u32>) -> (f64, f64) {
    let delta = elo_delta(ra, rb, winner_is_a, k, rank_a, rank_b);

    (ra + delta, rb - delta)
}
