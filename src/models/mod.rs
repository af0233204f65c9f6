pub mod game;

pub use game::{
    // Board squares
    Cell, Placement, Position, Premium,
    // Game state
    GameState, GameStatus, Player, PlayerId, TurnRecord, WordScore,
    // Read-only views
    GameSummary, PlayerView, ScoreInfo,
};
