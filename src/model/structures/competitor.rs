use chrono::NaiveDate;

use crate::model::{
    constants::{DEFAULT_RATING, TOP_TIER_RANK},
    structures::{history::HistoryLog, rank_type::RankType}
};

pub type CompetitorId = i32;

/// Rank history value: `Some(0)` for the champion, `Some(slot)` for ranked
/// competitors and `None` for unranked ones.
pub type RankMark = Option<u32>;

#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub id: CompetitorId,
    pub division: String,
    pub name: String,
    pub country: String,
    pub age: u32,
    pub rank_slot: Option<u32>,
    pub rank_type: RankType,
    pub is_champion: bool,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub rating: f64,
    /// Signed run of consecutive wins (positive) or losses (negative)
    pub streak: i32,
    pub last_fight_date: Option<NaiveDate>,
    pub next_available_date: Option<NaiveDate>,
    pub rating_history: HistoryLog<f64>,
    pub rank_history: HistoryLog<RankMark>,
    pub is_active: bool
}

impl Competitor {
    pub fn new(id: CompetitorId, division: &str, name: &str, country: &str, age: u32) -> Self {
        Competitor {
            id,
            division: division.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            age,
            rank_slot: None,
            rank_type: RankType::Unranked,
            is_champion: false,
            wins: 0,
            draws: 0,
            losses: 0,
            rating: DEFAULT_RATING,
            streak: 0,
            last_fight_date: None,
            next_available_date: None,
            rating_history: HistoryLog::new(),
            rank_history: HistoryLog::new(),
            is_active: true
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.rank_slot.is_some()
    }

    /// Rank value fed into the rating update: 0 for the champion,
    /// the slot for ranked competitors, nothing otherwise.
    pub fn rank_value(&self) -> Option<u32> {
        if self.is_champion {
            Some(0)
        } else {
            self.rank_slot
        }
    }

    pub fn rank_mark(&self) -> RankMark {
        self.rank_value()
    }

    /// Champion or ranked inside the top eight
    pub fn is_top_tier(&self) -> bool {
        self.is_champion || self.rank_slot.is_some_and(|slot| slot <= TOP_TIER_RANK)
    }

    /// Whether the competitor can be booked for an event on `when`.
    ///
    /// Without an explicit next-available date, a fight within the last
    /// `rest_days` still blocks booking.
    pub fn is_available(&self, when: NaiveDate, rest_days: i64) -> bool {
        if !self.is_active {
            return false;
        }

        match self.next_available_date {
            Some(next) => when >= next,
            None => match self.last_fight_date {
                Some(last) => (when - last).num_days() >= rest_days,
                None => true
            }
        }
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
        self.streak = if self.streak >= 0 { self.streak + 1 } else { 1 };
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
        self.streak = if self.streak <= 0 { self.streak - 1 } else { -1 };
    }

    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.draws)
    }
}
