use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardSlot {
    MainEvent,
    CoMain,
    MainCard,
    Prelims
}

impl CardSlot {
    /// Marquee slots are booked at main announcement, before the rest of the card.
    pub fn is_marquee(&self) -> bool {
        matches!(self, CardSlot::MainEvent | CardSlot::CoMain)
    }
}
