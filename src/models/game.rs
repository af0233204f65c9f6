use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{PlacementParseError, TurnError},
    game::{Board, Rack, TileBag},
    utils::letters::get_letter_value,
};

pub type PlayerId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Premium {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "DL")]
    DoubleLetter,
    #[serde(rename = "TL")]
    TripleLetter,
    #[serde(rename = "DW")]
    DoubleWord,
    #[serde(rename = "TW")]
    TripleWord,
    #[serde(rename = "start")]
    Start,
}

impl Premium {
    pub fn letter_multiplier(self) -> u32 {
        match self {
            Premium::DoubleLetter => 2,
            Premium::TripleLetter => 3,
            _ => 1,
        }
    }

    pub fn word_multiplier(self) -> u32 {
        match self {
            Premium::DoubleWord => 2,
            Premium::TripleWord => 3,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cell {
    pub tile: Option<char>,
    pub placed_by: Option<PlayerId>,
    pub premium: Premium,
}

impl Cell {
    pub fn is_filled(&self) -> bool {
        self.tile.is_some()
    }

    /// Face value of the tile on this square, if any
    pub fn points(&self) -> Option<u32> {
        self.tile.map(get_letter_value)
    }
}

/// One tile of a proposed move: put the tile at `rack_index` on `(col, row)`.
///
/// On the wire this is the triple `"col:row:rackIndex"`, all 0-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub col: usize,
    pub row: usize,
    pub rack_index: usize,
}

impl Placement {
    pub fn new(col: usize, row: usize, rack_index: usize) -> Self {
        Self { col, row, rack_index }
    }

    pub fn position(&self) -> Position {
        Position::new(self.col, self.row)
    }

    /// Parse a list of wire triples, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(items: &[S]) -> Result<Vec<Placement>, PlacementParseError> {
        items.iter().map(|item| item.as_ref().parse()).collect()
    }
}

impl FromStr for Placement {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let [col, row, rack_index] = parts.as_slice() else {
            return Err(PlacementParseError::Malformed(s.to_string()));
        };

        let number = |field: &'static str, raw: &str| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| PlacementParseError::InvalidNumber {
                    field,
                    input: s.to_string(),
                })
        };

        Ok(Placement {
            col: number("col", col)?,
            row: number("row", row)?,
            rack_index: number("rackIndex", rack_index)?,
        })
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.col, self.row, self.rack_index)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Setup,
    InProgress,
    Finished,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Setup => "setup",
            GameStatus::InProgress => "inprogress",
            GameStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub rack: Rack,
    pub score: u32,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            rack: Rack::default(),
            score: 0,
        }
    }
}

/// Points earned by one word of a move
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordScore {
    pub word: String,
    pub score: u32,
}

/// What happened on a turn, newest last in `GameState::history`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnRecord {
    Move {
        player_id: PlayerId,
        positions: Vec<Position>,
        words: Vec<WordScore>,
        score: u32,
        played_at: DateTime<Utc>,
    },
    Pass {
        player_id: PlayerId,
        played_at: DateTime<Utc>,
    },
}

/// Complete state of one game, persisted as a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub game_id: Uuid,
    pub board: Board,
    pub bag: TileBag,
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub status: GameStatus,
    pub history: Vec<TurnRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameState {
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Reject callers that may not act right now. A finished game rejects everyone.
    pub fn ensure_turn(&self, player_id: PlayerId) -> Result<(), TurnError> {
        if self.status != GameStatus::InProgress {
            return Err(TurnError::GameOver);
        }
        match self.current_player() {
            Some(current) if current.id == player_id => Ok(()),
            _ => Err(TurnError::NotYourTurn),
        }
    }

    /// Tiles in the bag, on every rack and on the board
    pub fn tile_count(&self) -> usize {
        self.bag.len()
            + self.players.iter().map(|p| p.rack.len()).sum::<usize>()
            + self.board.placed_tile_count()
    }

    /// Highest scorers once the game is over; empty while it is still running.
    pub fn winners(&self) -> Vec<PlayerId> {
        if !self.is_finished() {
            return Vec::new();
        }
        let Some(best) = self.players.iter().map(|p| p.score).max() else {
            return Vec::new();
        };
        self.players
            .iter()
            .filter(|p| p.score == best)
            .map(|p| p.id)
            .collect()
    }

    /// Snapshot for one seat at the table, hiding everyone else's rack.
    pub fn view_for(&self, player_id: PlayerId) -> Option<PlayerView> {
        let me = self.player(player_id)?;
        Some(PlayerView {
            game_id: self.game_id,
            board: self.board.clone(),
            rack: me.rack.clone(),
            scores: self
                .players
                .iter()
                .map(|p| ScoreInfo {
                    player_id: p.id,
                    score: p.score,
                    rack_size: p.rack.len(),
                })
                .collect(),
            tiles_in_bag: self.bag.len(),
            current_player: self.current_player().map(|p| p.id),
            move_active: self.ensure_turn(player_id).is_ok(),
            status: self.status,
        })
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            game_id: self.game_id,
            status: self.status,
            players: self.players.iter().map(|p| p.id).collect(),
            current_player: self.current_player().map(|p| p.id),
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreInfo {
    pub player_id: PlayerId,
    pub score: u32,
    pub rack_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerView {
    pub game_id: Uuid,
    pub board: Board,
    pub rack: Rack,
    pub scores: Vec<ScoreInfo>,
    pub tiles_in_bag: usize,
    pub current_player: Option<PlayerId>,
    /// True when this player may submit a move or pass right now
    pub move_active: bool,
    pub status: GameStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSummary {
    pub game_id: Uuid,
    pub status: GameStatus,
    pub players: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placement() {
        let placement: Placement = "7:8:2".parse().unwrap();
        assert_eq!(placement, Placement::new(7, 8, 2));
        assert_eq!(placement.to_string(), "7:8:2");
        assert_eq!(placement.position(), Position::new(7, 8));
    }

    #[test]
    fn test_parse_placement_rejects_bad_input() {
        assert_eq!(
            "7:8".parse::<Placement>(),
            Err(PlacementParseError::Malformed("7:8".to_string()))
        );
        assert!(matches!(
            "-1:0:0".parse::<Placement>(),
            Err(PlacementParseError::InvalidNumber { field: "col", .. })
        ));
        assert!(matches!(
            "0:0:x".parse::<Placement>(),
            Err(PlacementParseError::InvalidNumber { field: "rackIndex", .. })
        ));
    }

    #[test]
    fn test_parse_all_placements() {
        let placements = Placement::parse_all(&["7:7:0", "8:7:1"]).unwrap();
        assert_eq!(placements, vec![Placement::new(7, 7, 0), Placement::new(8, 7, 1)]);
        assert!(Placement::parse_all(&["7:7:0", "oops"]).is_err());
    }

    #[test]
    fn test_premium_multipliers() {
        assert_eq!(Premium::DoubleLetter.letter_multiplier(), 2);
        assert_eq!(Premium::TripleLetter.letter_multiplier(), 3);
        assert_eq!(Premium::DoubleWord.word_multiplier(), 2);
        assert_eq!(Premium::TripleWord.word_multiplier(), 3);
        assert_eq!(Premium::Start.letter_multiplier(), 1);
        assert_eq!(Premium::Start.word_multiplier(), 1);
    }

    #[test]
    fn test_cell_points() {
        let cell = Cell {
            tile: Some('Q'),
            placed_by: Some(1),
            premium: Premium::None,
        };
        assert_eq!(cell.points(), Some(10));
        assert_eq!(Cell::default().points(), None);
    }
}
