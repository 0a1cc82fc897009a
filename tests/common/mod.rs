#![allow(dead_code)]

use std::sync::Once;

use fight_league::{
    model::{game_service::GameService, structures::league_state::LeagueState},
    utils::test_utils::generate_league_state
};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A generated league that has already planned its calendar
pub fn initialized_league(divisions: &[&str], roster_size: usize, seed: u64) -> LeagueState {
    let mut state = generate_league_state(divisions, roster_size, seed);
    let mut service = GameService::new(&state.meta);
    service.initialize(&mut state).expect("initialize generated league");

    state
}

/// Runs `weeks` ticks, panicking on the first failure.
pub fn run_weeks(state: &mut LeagueState, weeks: usize) {
    let mut service = GameService::new(&state.meta);
    for _ in 0..weeks {
        service.advance_week(state).expect("weekly tick");
    }
}
