//! Error taxonomy.

use thiserror::Error;

/// A recoverable "can't do that" condition: moving into a wall, attacking
/// empty air, using an item with no valid target.
///
/// Caught at the turn loop — shown to the player as a log message, swallowed
/// silently for AI actors. Never propagates out of the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Impossible(pub String);

impl Impossible {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Fatal dungeon generation failure, propagated to the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no rooms accepted after {attempts} placement attempts")]
    NoRooms { attempts: usize },
}

/// Top-level session error.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("save encoding failed: {0}")]
    Save(#[from] bincode::Error),
}
