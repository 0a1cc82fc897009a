//! Plain-text views of a league for the `show` command.

use itertools::Itertools;

use crate::{
    error::LeagueError,
    model::structures::{card_slot::CardSlot, competitor::Competitor, league_state::LeagueState}
};

fn competitor_line(label: &str, c: &Competitor) -> String {
    format!(
        "{:>4}  {:<24} {:<12} {:>9}  {:>7.1}  {:+}",
        label,
        c.name,
        c.country,
        c.record(),
        c.rating,
        c.streak
    )
}

/// Champion, then the ranked slots in order.
pub fn division_table(state: &LeagueState, division: &str) -> Result<Vec<String>, LeagueError> {
    let roster = state.roster(division)?;
    let mut lines = vec![format!("== {} ({} competitors) ==", division, roster.len())];

    match state.champion(division) {
        Some(champion) => lines.push(competitor_line("C", champion)),
        None => lines.push("   C  (vacant)".to_string())
    }

    lines.extend(
        state
            .ranked(division)?
            .into_iter()
            .sorted_by_key(|c| c.rank_slot)
            .map(|c| competitor_line(&c.rank_slot.map(|s| s.to_string()).unwrap_or_default(), c))
    );

    Ok(lines)
}

/// The next `limit` uncompleted events with their booked fights.
pub fn upcoming_events(state: &LeagueState, brand: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();

    let upcoming = state
        .events
        .iter()
        .filter(|e| !e.completed && e.date >= state.meta.current_date)
        .sorted_by_key(|e| e.date)
        .take(limit);

    for event in upcoming {
        lines.push(format!("{}  {}  [{}]", event.date, event.display_name(brand), event.stage()));

        let fights = state
            .event_fights(event.id)
            .filter(|f| f.is_scheduled())
            .sorted_by_key(|f| f.card_slot.map_or(usize::MAX, slot_order));

        for fight in fights {
            let slot = fight.card_slot.map(|s| s.to_string()).unwrap_or_else(|| "TBD".to_string());
            let title = if fight.is_title_fight { " (title)" } else { "" };

            lines.push(format!(
                "    {:<10} {:<18} {} vs {}{}",
                slot,
                fight.division,
                state.competitor_name(&fight.division, fight.a_id),
                state.competitor_name(&fight.division, fight.b_id),
                title
            ));
        }
    }

    lines
}

fn slot_order(slot: CardSlot) -> usize {
    match slot {
        CardSlot::MainEvent => 0,
        CardSlot::CoMain => 1,
        CardSlot::MainCard => 2,
        CardSlot::Prelims => 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::game_service::GameService, utils::test_utils::generate_league_state};

    #[test]
    fn test_division_table_lists_champion_and_ranks() {
        let state = generate_league_state(&["Lightweight"], 20, 42);
        let lines = division_table(&state, "Lightweight").unwrap();

        // Header, champion, fifteen ranked
        assert_eq!(lines.len(), 17);
        assert!(lines[1].trim_start().starts_with('C'));
        assert!(lines[2].trim_start().starts_with('1'));
        assert!(division_table(&state, "Strawweight").is_err());
    }

    #[test]
    fn test_upcoming_events_after_initialize() {
        let mut state = generate_league_state(&["Lightweight", "Welterweight"], 30, 42);
        let mut service = GameService::new(&state.meta);
        service.initialize(&mut state).unwrap();

        let lines = upcoming_events(&state, "XFC", 2);
        let headers = lines.iter().filter(|l| !l.starts_with(' ')).count();

        assert_eq!(headers, 2);
        assert!(lines[0].contains("XFC"));
    }
}
