use chrono::NaiveDate;

use crate::model::structures::{event::EventId, fight::FightId};

#[derive(Debug, Clone, PartialEq)]
pub struct SaveMetadata {
    pub current_date: NaiveDate,
    pub next_event_id: EventId,
    pub next_fight_id: FightId,
    pub last_title_fight_date: Option<NaiveDate>,
    pub random_seed: u64,
    /// Last calendar date already handed to the event planner
    pub planned_through: Option<NaiveDate>
}

impl SaveMetadata {
    pub fn new(current_date: NaiveDate, random_seed: u64) -> Self {
        SaveMetadata {
            current_date,
            next_event_id: 1,
            next_fight_id: 1,
            last_title_fight_date: None,
            random_seed,
            planned_through: None
        }
    }
}
