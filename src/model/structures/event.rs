use chrono::NaiveDate;
use strum_macros::{Display, EnumString};

use crate::model::structures::{event_kind::EventKind, fight::FightId};

pub type EventId = i32;

/// Lifecycle of an event, derived from its announce/generate stamps.
/// Withdrawals and cancellations are side effects, not stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStage {
    Planned,
    MainAnnounced,
    FullGenerated,
    Completed
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub date: NaiveDate,
    pub generated_on: Option<NaiveDate>,
    pub announced_main_on: Option<NaiveDate>,
    pub announced_full_on: Option<NaiveDate>,
    pub completed: bool,
    pub kind: EventKind,
    pub location: String,
    pub theme_country: String,
    pub notes: Vec<String>,
    pub main_fight_id: Option<FightId>
}

impl Event {
    pub fn new(id: EventId, date: NaiveDate, kind: EventKind, location: String, theme_country: String) -> Self {
        Event {
            id,
            date,
            generated_on: None,
            announced_main_on: None,
            announced_full_on: None,
            completed: false,
            kind,
            location,
            theme_country,
            notes: Vec::new(),
            main_fight_id: None
        }
    }

    pub fn stage(&self) -> EventStage {
        if self.completed {
            EventStage::Completed
        } else if self.generated_on.is_some() {
            EventStage::FullGenerated
        } else if self.announced_main_on.is_some() {
            EventStage::MainAnnounced
        } else {
            EventStage::Planned
        }
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    pub fn has_theme(&self) -> bool {
        !self.theme_country.trim().is_empty()
    }

    /// Public-facing name, e.g. `XFC 305: London` or `XFC Fight Night: Tokyo (Brazil special)`
    pub fn display_name(&self, brand: &str) -> String {
        let location = self.location.trim();

        let base = match self.kind {
            EventKind::Numbered => format!("{} {}", brand, 300 + self.id),
            EventKind::FightNight | EventKind::Country => format!("{} Fight Night", brand)
        };

        let mut name = if location.is_empty() {
            base
        } else {
            format!("{}: {}", base, location)
        };

        if self.kind == EventKind::Country && self.has_theme() {
            name = format!("{} ({} special)", name, self.theme_country.trim());
        }

        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind) -> Event {
        Event::new(
            5,
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            kind,
            "London".to_string(),
            "Brazil".to_string()
        )
    }

    #[test]
    fn test_stage_progression() {
        let mut ev = event(EventKind::FightNight);
        assert_eq!(ev.stage(), EventStage::Planned);

        ev.announced_main_on = Some(ev.date);
        assert_eq!(ev.stage(), EventStage::MainAnnounced);

        ev.generated_on = Some(ev.date);
        assert_eq!(ev.stage(), EventStage::FullGenerated);

        ev.completed = true;
        assert_eq!(ev.stage(), EventStage::Completed);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(event(EventKind::Numbered).display_name("XFC"), "XFC 305: London");
        assert_eq!(event(EventKind::FightNight).display_name("XFC"), "XFC Fight Night: London");
        assert_eq!(
            event(EventKind::Country).display_name("XFC"),
            "XFC Fight Night: London (Brazil special)"
        );

        let mut blank = event(EventKind::Country);
        blank.theme_country = "  ".to_string();
        assert!(!blank.has_theme());
        assert_eq!(blank.display_name("XFC"), "XFC Fight Night: London");
    }
}
