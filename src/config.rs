use std::env;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::constants::{DEFAULT_K, DEFAULT_SIGMA};

/// Tunables for a single fight and its aftermath
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Standard deviation of the per-fight performance noise
    pub sigma: f64,
    pub k: f64,
    pub injury_chance: f64,
    pub withdrawal_chance: f64,
    pub rest_days: i64,
    pub injury_min_days: i64,
    pub injury_max_days: i64
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            k: DEFAULT_K,
            injury_chance: 0.12,
            withdrawal_chance: 0.10,
            rest_days: 49,
            injury_min_days: 28,
            injury_max_days: 84
        }
    }
}

/// Tunables for the event calendar and card planning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub main_announce_weeks: i64,
    pub full_generate_weeks: i64,
    pub horizon_weeks: usize,
    /// Day of the week every event lands on
    pub event_weekday: Weekday,
    /// Minimum days between two title fights anywhere in the league
    pub title_cooldown_days: i64,
    pub brand: String
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            main_announce_weeks: 8,
            full_generate_weeks: 4,
            horizon_weeks: 12,
            event_weekday: Weekday::Sat,
            title_cooldown_days: 56,
            brand: "XFC".to_string()
        }
    }
}

/// Host-level settings, resolved from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub data_path: String,
    pub seed: u64,
    pub start_date: NaiveDate
}

impl LeagueConfig {
    /// Reads `LEAGUE_DATA_PATH`, `LEAGUE_SEED` and `LEAGUE_START_DATE`.
    /// Missing or malformed values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            data_path: env::var("LEAGUE_DATA_PATH").unwrap_or(defaults.data_path),
            seed: env::var("LEAGUE_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.seed),
            start_date: env::var("LEAGUE_START_DATE")
                .ok()
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
                .unwrap_or(defaults.start_date)
        }
    }
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            data_path: "league.json".to_string(),
            seed: 12345,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_defaults() {
        let cfg = SimConfig::default();

        assert_eq!(cfg.rest_days, 49);
        assert_eq!(cfg.injury_min_days, 28);
        assert_eq!(cfg.injury_max_days, 84);
        assert!(cfg.injury_chance > 0.0 && cfg.injury_chance < 1.0);
    }

    #[test]
    fn test_plan_defaults() {
        let cfg = PlanConfig::default();

        assert_eq!(cfg.main_announce_weeks, 8);
        assert_eq!(cfg.full_generate_weeks, 4);
        assert_eq!(cfg.event_weekday, Weekday::Sat);
        assert_eq!(cfg.title_cooldown_days, 56);
    }
}
