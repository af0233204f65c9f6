// Rules engine: board, tiles, validation, scoring and turn flow

pub mod bag;
pub mod board;
pub mod scorer;
pub mod setup;
pub mod turn;
pub mod validator;

pub use bag::{Rack, TileBag, RACK_CAPACITY};
pub use board::{Board, TileMutation, STANDARD_BOARD_SIZE};
pub use scorer::{ScoreResult, Scorer};
pub use turn::TurnCoordinator;
pub use validator::{MoveDescriptor, MoveValidator, WordRun};
