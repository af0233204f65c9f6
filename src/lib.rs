//! Turn-based word placement on a premium-square board.
//!
//! [`GameEngine`] is the entry point: it validates placements against the
//! board, rack and dictionary, scores accepted moves, rotates turns and
//! persists every change atomically through a [`PersistenceStore`].

pub mod config;
pub mod db;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod game;
pub mod models;
pub mod notify;
pub mod store;
pub mod utils;

pub use dictionary::{Dictionary, WordValidator};
pub use engine::GameEngine;
pub use error::{GameError, InfrastructureError, SetupError, StoreError, TurnError, ValidationError};
pub use game::{Board, Rack, ScoreResult, TileBag};
pub use models::{GameState, GameStatus, Placement, PlayerId, PlayerView, Position};
pub use notify::{BroadcastSink, GameEvent, NotificationSink, NullSink};
pub use store::{MemoryStore, PersistenceStore};
