use thiserror::Error;

use crate::model::structures::competitor::CompetitorId;

#[derive(Debug, Error)]
pub enum LeagueError {
    /// A fight, pair or booking references a competitor that is not on the
    /// division roster. Aborts the current tick.
    #[error("Missing competitor {id} in division '{division}'")]
    MissingCompetitor { division: String, id: CompetitorId },

    #[error("Unknown division '{0}'")]
    UnknownDivision(String),

    #[error("League has no divisions")]
    EmptyLeague,

    #[error("A league save already exists at '{0}'")]
    SaveExists(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Failed to access league store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode league snapshot: {0}")]
    Serialization(#[from] serde_json::Error)
}
