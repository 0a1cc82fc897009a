pub mod calendar;
pub mod constants;
pub mod game_service;
pub mod matchmaking;
pub mod news;
pub mod ranking;
pub mod rating_utils;
pub mod simulation;
pub mod structures;
