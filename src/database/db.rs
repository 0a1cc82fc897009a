use std::{
    fs,
    path::{Path, PathBuf}
};

use tracing::{debug, info};

use super::db_structs::LeagueSnapshot;
use crate::{error::LeagueError, model::structures::league_state::LeagueState};

/// Load/save boundary around a weekly tick. Nothing inside a tick touches
/// the store.
pub trait LeagueStore {
    fn load(&self) -> Result<LeagueState, LeagueError>;

    /// Persists the whole league. Saving the same state twice yields the
    /// same document.
    fn save(&self, state: &LeagueState) -> Result<(), LeagueError>;
}

/// One pretty-printed JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LeagueStore for JsonFileStore {
    fn load(&self) -> Result<LeagueState, LeagueError> {
        debug!(path = %self.path.display(), "Loading league");
        let raw = fs::read_to_string(&self.path)?;
        let snapshot: LeagueSnapshot = serde_json::from_str(&raw)?;
        let state = snapshot.into_state();

        info!(
            divisions = state.divisions.len(),
            competitors = state.competitor_count(),
            events = state.events.len(),
            fights = state.fights.len(),
            date = %state.meta.current_date,
            "League loaded"
        );

        Ok(state)
    }

    fn save(&self, state: &LeagueState) -> Result<(), LeagueError> {
        let snapshot = LeagueSnapshot::from(state);
        let body = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Readers never see a half-written document
        let temp = self.temp_path();
        fs::write(&temp, body)?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), date = %state.meta.current_date, "League saved");
        Ok(())
    }
}
