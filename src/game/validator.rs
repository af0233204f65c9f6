use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    dictionary::WordValidator,
    error::ValidationError,
    game::{Board, Rack, TileMutation},
    models::{Placement, PlayerId, Position},
};

/// A maximal line of tiles formed (at least in part) by a move
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordRun {
    pub spelling: String,
    pub positions: Vec<Position>,
}

/// Everything needed to commit an accepted move, computed without touching
/// the board, rack or bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveDescriptor {
    pub player_id: PlayerId,
    pub mutations: Vec<TileMutation>,
    /// Rack slots emptied by the move
    pub consumed: Vec<usize>,
    pub words: Vec<WordRun>,
}

impl MoveDescriptor {
    /// Whether `pos` receives a tile in this move
    pub fn is_new(&self, pos: Position) -> bool {
        self.mutations.iter().any(|m| m.position == pos)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.mutations.iter().map(|m| m.position).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn before(self, pos: Position) -> Option<Position> {
        match self {
            Axis::Horizontal => pos.col.checked_sub(1).map(|col| Position::new(col, pos.row)),
            Axis::Vertical => pos.row.checked_sub(1).map(|row| Position::new(pos.col, row)),
        }
    }

    fn after(self, pos: Position) -> Position {
        match self {
            Axis::Horizontal => Position::new(pos.col + 1, pos.row),
            Axis::Vertical => Position::new(pos.col, pos.row + 1),
        }
    }
}

/// The board as it would look with the move applied, without applying it.
struct Overlay<'a> {
    board: &'a Board,
    placed: HashMap<Position, char>,
}

impl Overlay<'_> {
    fn tile_at(&self, pos: Position) -> Option<char> {
        self.placed.get(&pos).copied().or_else(|| self.board.tile_at(pos))
    }

    /// The maximal filled line through `pos` along `axis`
    fn run_through(&self, pos: Position, axis: Axis) -> WordRun {
        let mut first = pos;
        while let Some(prev) = axis.before(first) {
            if self.tile_at(prev).is_none() {
                break;
            }
            first = prev;
        }

        let mut positions = Vec::new();
        let mut spelling = String::new();
        let mut cursor = first;
        while let Some(tile) = self.tile_at(cursor) {
            positions.push(cursor);
            spelling.push(tile);
            cursor = axis.after(cursor);
        }

        WordRun { spelling, positions }
    }
}

pub struct MoveValidator;

impl MoveValidator {
    /// Check a proposed move against an immutable snapshot.
    ///
    /// Checks run in a fixed order and the first failure wins: rack slots,
    /// bounds, overlap, straight line, gaps, connectivity, then dictionary.
    pub fn validate(
        board: &Board,
        rack: &Rack,
        player_id: PlayerId,
        placements: &[Placement],
        words: &dyn WordValidator,
    ) -> Result<MoveDescriptor, ValidationError> {
        let consumed = Self::check_rack(rack, placements)?;
        Self::check_bounds(board, placements)?;
        Self::check_overlap(board, placements)?;
        let axis = Self::check_straight(placements)?;

        let overlay = Overlay {
            board,
            placed: placements
                .iter()
                .zip(&consumed)
                .map(|(p, &(_, tile))| (p.position(), tile))
                .collect(),
        };

        Self::check_gapless(&overlay, placements, axis)?;
        Self::check_connected(&overlay)?;

        let runs = Self::formed_words(&overlay, placements);
        Self::check_words(&runs, words)?;

        Ok(MoveDescriptor {
            player_id,
            mutations: placements
                .iter()
                .zip(&consumed)
                .map(|(p, &(_, tile))| TileMutation {
                    position: p.position(),
                    tile,
                    placed_by: player_id,
                })
                .collect(),
            consumed: consumed.into_iter().map(|(idx, _)| idx).collect(),
            words: runs,
        })
    }

    /// Every placement names a distinct, occupied rack slot.
    fn check_rack(rack: &Rack, placements: &[Placement]) -> Result<Vec<(usize, char)>, ValidationError> {
        let mut used = HashSet::new();
        placements
            .iter()
            .map(|p| match rack.get(p.rack_index) {
                Some(tile) if used.insert(p.rack_index) => Ok((p.rack_index, tile)),
                _ => Err(ValidationError::RackIndexInvalid),
            })
            .collect()
    }

    fn check_bounds(board: &Board, placements: &[Placement]) -> Result<(), ValidationError> {
        if placements.iter().all(|p| board.in_bounds(p.col, p.row)) {
            Ok(())
        } else {
            Err(ValidationError::OutOfBounds)
        }
    }

    /// No square may already hold a tile, or be targeted twice in one move.
    fn check_overlap(board: &Board, placements: &[Placement]) -> Result<(), ValidationError> {
        let mut targeted = HashSet::new();
        for p in placements {
            let pos = p.position();
            if board.is_filled(pos) || !targeted.insert(pos) {
                return Err(ValidationError::OverlappingTile);
            }
        }
        Ok(())
    }

    fn check_straight(placements: &[Placement]) -> Result<Axis, ValidationError> {
        let Some(first) = placements.first() else {
            return Ok(Axis::Horizontal);
        };
        if placements.iter().all(|p| p.row == first.row) {
            Ok(Axis::Horizontal)
        } else if placements.iter().all(|p| p.col == first.col) {
            Ok(Axis::Vertical)
        } else {
            Err(ValidationError::NotStraightLine)
        }
    }

    /// Between the outermost new tiles every square is either already filled
    /// or part of the move.
    fn check_gapless(overlay: &Overlay<'_>, placements: &[Placement], axis: Axis) -> Result<(), ValidationError> {
        let Some(first) = placements.first() else {
            return Ok(());
        };

        let along = |p: &Placement| match axis {
            Axis::Horizontal => p.col,
            Axis::Vertical => p.row,
        };
        let min = placements.iter().map(along).min().unwrap_or(0);
        let max = placements.iter().map(along).max().unwrap_or(0);

        let has_gap = (min..=max).any(|i| {
            let pos = match axis {
                Axis::Horizontal => Position::new(i, first.row),
                Axis::Vertical => Position::new(first.col, i),
            };
            overlay.tile_at(pos).is_none()
        });

        if has_gap {
            Err(ValidationError::HasGaps)
        } else {
            Ok(())
        }
    }

    /// The opener must cover the start square; later moves must touch an
    /// existing tile.
    fn check_connected(overlay: &Overlay<'_>) -> Result<(), ValidationError> {
        let board = overlay.board;

        if !board.start_filled() {
            return if overlay.placed.contains_key(&board.start()) {
                Ok(())
            } else {
                Err(ValidationError::IllegalOpener)
            };
        }

        let touching = overlay
            .placed
            .keys()
            .any(|&pos| board.neighbours(pos).any(|n| board.is_filled(n)));

        if touching {
            Ok(())
        } else {
            Err(ValidationError::NotTouching)
        }
    }

    /// Every distinct run of two or more tiles through a new tile. A lone
    /// tile with no neighbours (only possible on the start square) counts as
    /// a one-letter word.
    fn formed_words(overlay: &Overlay<'_>, placements: &[Placement]) -> Vec<WordRun> {
        let mut seen = HashSet::new();
        let mut runs = Vec::new();

        for p in placements {
            for axis in [Axis::Horizontal, Axis::Vertical] {
                let run = overlay.run_through(p.position(), axis);
                if run.positions.len() >= 2 && seen.insert((axis, run.positions[0])) {
                    runs.push(run);
                }
            }
        }

        if runs.is_empty() {
            if let [only] = placements {
                runs.push(overlay.run_through(only.position(), Axis::Horizontal));
            }
        }

        runs
    }

    fn check_words(runs: &[WordRun], words: &dyn WordValidator) -> Result<(), ValidationError> {
        match runs.iter().find(|run| !words.contains(&run.spelling)) {
            Some(run) => {
                tracing::debug!("Rejected word '{}' at {:?}", run.spelling, run.positions);
                Err(ValidationError::InvalidWord)
            }
            None => Ok(()),
        }
    }
}
