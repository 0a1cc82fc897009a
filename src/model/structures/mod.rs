pub mod card_slot;
pub mod competitor;
pub mod event;
pub mod event_kind;
pub mod fight;
pub mod fight_status;
pub mod history;
pub mod league_state;
pub mod pair_history;
pub mod rank_type;
pub mod save_metadata;
