// Rating model constants
pub const DEFAULT_RATING: f64 = 1500.0;
pub const DEFAULT_K: f64 = 24.0;
pub const DEFAULT_SIGMA: f64 = 90.0;
pub const ELO_SCALE: f64 = 400.0;
pub const AGE_PEAK: i32 = 30;
pub const AGE_BONUS_PEAK: f64 = 20.0;
pub const AGE_BONUS_SLOPE: f64 = 4.0;
pub const AGE_BONUS_FLOOR: f64 = -40.0;
pub const STREAK_MIN: i32 = -3;
pub const STREAK_MAX: i32 = 5;
pub const STREAK_WEIGHT: f64 = 10.0;
// Volatility multiplier
pub const MISMATCH_BASE: f64 = 0.65;
pub const MISMATCH_SPAN: f64 = 0.75;
pub const MISMATCH_RATING_CAP: f64 = 350.0;
pub const RANK_FACTOR_MAX: f64 = 0.35;
pub const RANK_GAP_UNRANKED: f64 = 12.0;
pub const RANK_GAP_SCALE: f64 = 15.0;
pub const UPSET_WEIGHT: f64 = 1.6;
pub const VOLATILITY_MIN: f64 = 0.55;
pub const VOLATILITY_MAX: f64 = 2.2;
// Rankings
pub const RANKED_SLOTS: usize = 15;
pub const TOP_TIER_RANK: u32 = 8;
pub const HISTORY_CAPACITY: usize = 60;
// Matchmaking
pub const REMATCH_COOLDOWN_DAYS: i64 = 210;
pub const REMATCH_REJECTED: f64 = -9999.0;
pub const PAIR_SCORE_BASE: f64 = 1000.0;
pub const RANK_PROXIMITY_BASE: f64 = 120.0;
pub const RANK_PROXIMITY_STEP: f64 = 20.0;
pub const ELITE_RANK: u32 = 5;
pub const ELITE_PAIR_BONUS: f64 = 40.0;
// Card building
pub const RANK_GAP_WINDOW: u32 = 6;
pub const RATING_GAP_WINDOW: f64 = 120.0;
pub const REPLACEMENT_GAP_RANKED: f64 = 180.0;
pub const REPLACEMENT_GAP_UNRANKED: f64 = 120.0;
pub const TOP_TIER_BOUT_LIMIT: usize = 4;
pub const SPECIAL_BOOKING_CHANCE: f64 = 0.06;
pub const SPECIAL_BOOKING_STREAK: i32 = 4;
pub const TITLE_CHALLENGER_POOL: usize = 5;
pub const TITLE_CHALLENGER_PREFERRED: usize = 3;
pub const MARQUEE_POOL: usize = 8;
pub const CO_MAIN_TITLE_CHANCE: f64 = 0.22;
pub const MIN_CARD_SIZE: usize = 16;
pub const MAX_CARD_SIZE: usize = 20;
