use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    #[default]
    FightNight,
    Numbered,
    Country
}

impl EventKind {
    /// Chance that a marquee bout becomes a title fight on this kind of event
    pub fn title_chance(&self) -> f64 {
        match self {
            EventKind::FightNight => 0.18,
            EventKind::Numbered => 0.38,
            EventKind::Country => 0.25
        }
    }

    /// Chance that a backfill booking draws from the ranked pool
    pub fn ranked_backfill_chance(&self) -> f64 {
        match self {
            EventKind::Numbered => 0.65,
            EventKind::Country => 0.55,
            EventKind::FightNight => 0.45
        }
    }

    /// Number of marquee slots reserved ahead of the full card
    pub fn marquee_slots(&self) -> usize {
        match self {
            EventKind::Numbered => 2,
            _ => 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventKind;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(EventKind::from_str("FIGHT_NIGHT"), Ok(EventKind::FightNight));
        assert_eq!(EventKind::from_str("NUMBERED"), Ok(EventKind::Numbered));
        assert_eq!(EventKind::from_str("COUNTRY"), Ok(EventKind::Country));
        assert!(EventKind::from_str("PPV").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for kind in EventKind::iter() {
            assert_eq!(EventKind::from_str(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn test_only_numbered_has_co_main() {
        assert_eq!(EventKind::Numbered.marquee_slots(), 2);
        assert_eq!(EventKind::FightNight.marquee_slots(), 1);
        assert_eq!(EventKind::Country.marquee_slots(), 1);
    }
}
