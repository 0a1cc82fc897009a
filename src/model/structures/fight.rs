
use crate::model::structures::{
    card_slot::CardSlot, competitor::CompetitorId, event::EventId, fight_status::FightStatus
};

pub type FightId = i32;

#[derive(Debug, Clone, PartialEq)]
pub struct FightOutcome {
    pub winner_id: CompetitorId,
    pub method: String,
    pub round: u8,
    /// Elapsed time in the final round, `MM:SS`
    pub time: String
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fight {
    pub id: FightId,
    pub event_id: EventId,
    pub division: String,
    pub a_id: CompetitorId,
    pub b_id: CompetitorId,
    pub is_top15: bool,
    pub is_main_event: bool,
    pub is_title_fight: bool,
    pub card_slot: Option<CardSlot>,
    pub status: FightStatus,
    pub outcome: Option<FightOutcome>
}

impl Fight {
    /// A scheduled, unslotted bout between two competitors of `division`.
    pub fn scheduled(id: FightId, event_id: EventId, division: &str, a_id: CompetitorId, b_id: CompetitorId) -> Self {
        Fight {
            id,
            event_id,
            division: division.to_string(),
            a_id,
            b_id,
            is_top15: false,
            is_main_event: false,
            is_title_fight: false,
            card_slot: None,
            status: FightStatus::Scheduled,
            outcome: None
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == FightStatus::Scheduled
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == FightStatus::Cancelled
    }

    pub fn is_marquee(&self) -> bool {
        self.card_slot.is_some_and(|slot| slot.is_marquee())
    }

    pub fn is_self_paired(&self) -> bool {
        self.a_id == self.b_id
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.a_id == id || self.b_id == id
    }
}
