use thiserror::Error;
use uuid::Uuid;

use crate::models::PlayerId;

/// Reasons a proposed placement set is rejected. Rejection never mutates state.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("placement references a rack slot that holds no tile")]
    RackIndexInvalid,
    #[error("placement lies outside the board")]
    OutOfBounds,
    #[error("placement targets a square that already holds a tile")]
    OverlappingTile,
    #[error("tiles must share a single row or column")]
    NotStraightLine,
    #[error("tiles must form a gapless line")]
    HasGaps,
    #[error("the opening move must cover the start square")]
    IllegalOpener,
    #[error("the move must touch a tile already on the board")]
    NotTouching,
    #[error("the move forms a word that is not in the dictionary")]
    InvalidWord,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("the game is over")]
    GameOver,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures outside the rules themselves. The engine never retries these.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] StoreError),
    #[error("commit task aborted: {0}")]
    CommitAborted(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("a game needs at least one player")]
    NoPlayers,
    #[error("player {0} appears more than once")]
    DuplicatePlayer(PlayerId),
    #[error("{requested} players requested, at most {max} allowed")]
    TooManyPlayers { requested: usize, max: usize },
}

/// Malformed `col:row:rackIndex` triple.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementParseError {
    #[error("expected col:row:rackIndex, got '{0}'")]
    Malformed(String),
    #[error("'{field}' is not a non-negative integer in '{input}'")]
    InvalidNumber { field: &'static str, input: String },
}

/// Every failure a caller of the engine can observe.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Parse(#[from] PlacementParseError),
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        GameError::Infrastructure(InfrastructureError::PersistenceFailure(err))
    }
}

impl GameError {
    /// The rules-level rejection, if this is one.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            GameError::Validation(err) => Some(*err),
            _ => None,
        }
    }

    pub fn turn(&self) -> Option<TurnError> {
        match self {
            GameError::Turn(err) => Some(*err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Placement;

    fn parse_move(raw: &[&str]) -> Result<Vec<Placement>, GameError> {
        Ok(Placement::parse_all(raw)?)
    }

    #[test]
    fn test_parse_error_converts_to_game_error() {
        let err = parse_move(&["7:7:0", "7:7"]).unwrap_err();
        assert!(matches!(err, GameError::Parse(PlacementParseError::Malformed(_))));
        assert_eq!(err.to_string(), "expected col:row:rackIndex, got '7:7'");
        assert_eq!(parse_move(&["7:7:0"]).unwrap(), vec![Placement::new(7, 7, 0)]);
    }

    #[test]
    fn test_store_error_is_infrastructure() {
        let id = Uuid::new_v4();
        let err = GameError::from(StoreError::NotFound(id));
        assert!(matches!(
            err,
            GameError::Infrastructure(InfrastructureError::PersistenceFailure(StoreError::NotFound(found))) if found == id
        ));
        assert!(err.validation().is_none());
        assert!(err.turn().is_none());
    }
}
