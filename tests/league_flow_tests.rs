mod common;

use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use itertools::Itertools;
use common::{init_test_env, initialized_league, run_weeks};
use fight_league::{
    error::LeagueError,
    model::{
        constants::RANKED_SLOTS,
        game_service::GameService,
        structures::{fight::Fight, league_state::LeagueState}
    },
    utils::test_utils::generate_league_state
};

const DIVISIONS: [&str; 3] = ["Lightweight", "Welterweight", "Middleweight"];

fn total_rating(state: &LeagueState) -> f64 {
    state.divisions.values().flatten().map(|c| c.rating).sum()
}

#[test]
fn test_same_seed_same_league() {
    init_test_env();

    let mut a = initialized_league(&DIVISIONS, 30, 2024);
    let mut b = initialized_league(&DIVISIONS, 30, 2024);
    run_weeks(&mut a, 10);
    run_weeks(&mut b, 10);

    assert_eq!(a, b);
}

#[test]
fn test_different_seed_diverges() {
    init_test_env();

    let mut a = initialized_league(&DIVISIONS, 30, 1);
    let mut b = initialized_league(&DIVISIONS, 30, 2);
    run_weeks(&mut a, 6);
    run_weeks(&mut b, 6);

    assert_ne!(a.fights, b.fights);
}

#[test]
fn test_initialize_is_idempotent() {
    init_test_env();

    let mut state = initialized_league(&DIVISIONS, 30, 77);
    let before = state.clone();
    let mut service = GameService::new(&state.meta);
    service.initialize(&mut state).unwrap();

    assert_eq!(state, before);
}

#[test]
fn test_season_keeps_league_consistent() {
    init_test_env();

    let mut state = initialized_league(&DIVISIONS, 30, 9);
    let start = state.meta.current_date;
    let start_total = total_rating(&state);

    run_weeks(&mut state, 20);

    assert!(state.meta.current_date > start);
    assert_abs_diff_eq!(total_rating(&state), start_total, epsilon = 1e-6);
    assert!(state.events.iter().any(|e| e.completed));

    // Dates and ids never collide
    let dates: HashSet<_> = state.events.iter().map(|e| e.date).collect();
    assert_eq!(dates.len(), state.events.len());
    let fight_ids: HashSet<_> = state.fights.iter().map(|f| f.id).collect();
    assert_eq!(fight_ids.len(), state.fights.len());
    assert!(state.fights.iter().all(|f| f.id < state.meta.next_fight_id));
    assert!(state.events.iter().all(|e| e.id < state.meta.next_event_id));

    for division in DIVISIONS {
        let roster = state.roster(division).unwrap();
        assert!(roster.iter().filter(|c| c.is_champion).count() <= 1);

        let slots: Vec<u32> = roster.iter().filter_map(|c| c.rank_slot).sorted().collect();
        assert_eq!(slots, (1..=slots.len() as u32).collect::<Vec<_>>());
        assert!(slots.len() <= RANKED_SLOTS);

        for c in roster {
            assert!(c.rating_history.len() <= 60);
            assert!(!c.rank_history.is_empty());
        }

        for (_, last) in state.pairs(division).iter() {
            assert!(*last <= state.meta.current_date);
        }
    }

    for event in state.events.iter().filter(|e| e.completed) {
        assert!(event.date <= state.meta.current_date);
        assert!(state.event_fights(event.id).all(|f| !f.is_scheduled()));
        assert!(state
            .event_fights(event.id)
            .filter(|f| !f.is_cancelled())
            .all(|f| f.outcome.is_some()));
    }

    // Nobody is booked twice across upcoming cards
    let mut booked = HashSet::new();
    for fight in state.fights.iter().filter(|f| f.is_scheduled()) {
        assert!(booked.insert((fight.division.clone(), fight.a_id)));
        assert!(booked.insert((fight.division.clone(), fight.b_id)));
    }
}

#[test]
fn test_failed_tick_leaves_state_untouched() {
    init_test_env();

    let mut state = initialized_league(&["Lightweight", "Welterweight"], 30, 5);
    let mut service = GameService::new(&state.meta);

    // Walk forward until the next tick lands on an event day
    let mut event_id = None;
    for _ in 0..12 {
        let mut probe = state.clone();
        let next = service.advance_to_next_week(&mut probe);
        if let Some(idx) = state.event_index_on(next) {
            event_id = Some(state.events[idx].id);
            break;
        }
        service.advance_week(&mut state).unwrap();
    }
    let event_id = event_id.expect("an event within twelve weeks");

    let fight_id = state.meta.next_fight_id;
    state.meta.next_fight_id += 1;
    state.fights.push(Fight::scheduled(fight_id, event_id, "Lightweight", 1, 9_999));
    let before = state.clone();

    let result = service.advance_week(&mut state);

    assert!(matches!(result, Err(LeagueError::MissingCompetitor { id: 9_999, .. })));
    assert_eq!(state, before);
}

#[test]
fn test_advance_without_initialize_plans_first() {
    init_test_env();

    let mut state = generate_league_state(&["Lightweight"], 24, 3);
    let mut service = GameService::new(&state.meta);
    let start = state.meta.current_date;

    service.advance_week(&mut state).unwrap();

    assert!(state.meta.current_date > start);
    assert!(!state.events.is_empty());
    assert!(state.meta.planned_through.is_some());
}
