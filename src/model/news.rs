//! Event note wording. Every function returns a single line appended to
//! [`Event::notes`](crate::model::structures::event::Event).

pub fn main_event_msg(division: &str, a: &str, b: &str, is_title: bool) -> String {
    if is_title {
        format!("Main event ({}): {} vs {} for the title", division, a, b)
    } else {
        format!("Main event ({}): {} vs {}", division, a, b)
    }
}

pub fn co_main_msg(division: &str, a: &str, b: &str, is_title: bool) -> String {
    if is_title {
        format!("Co-main event ({}): {} vs {} for the title", division, a, b)
    } else {
        format!("Co-main event ({}): {} vs {}", division, a, b)
    }
}

pub fn full_card_msg(fight_count: usize) -> String {
    format!("Full card announced: {} fights", fight_count)
}

pub fn withdrawal_msg(name: &str) -> String {
    format!("Withdrawal: {} is out of the fight (injury/illness)", name)
}

pub fn replacement_msg(out_name: &str, in_name: &str) -> String {
    format!("Replacement: {} steps in for {}", in_name, out_name)
}

pub fn cancelled_msg(a: &str, b: &str) -> String {
    format!("Cancelled: {} vs {} (no replacement found)", a, b)
}

pub fn self_pairing_msg(name: &str) -> String {
    format!("Cancelled: {} was booked against themselves", name)
}

/// Reports downtime in whole weeks, never less than one.
pub fn injury_msg(name: &str, extra_days: i64) -> String {
    let weeks = (extra_days / 7).max(1);
    format!("Injury: {} is out for at least {} week(s)", name, weeks)
}

pub fn result_msg(winner: &str, loser: &str, method: &str, round: u8, time: &str) -> String {
    format!("Result: {} def. {} by {} (R{} {})", winner, loser, method, round, time)
}

pub fn title_change_msg(division: &str, new_champion: &str) -> String {
    format!("New {} champion: {}!", division, new_champion)
}

pub fn title_defence_msg(division: &str, champion: &str) -> String {
    format!("{} defends the {} title", champion, division)
}
