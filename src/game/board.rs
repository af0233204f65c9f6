use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Cell, PlayerId, Position, Premium};

/// Side length of the standard board
pub const STANDARD_BOARD_SIZE: usize = 15;

// Premium squares of the top-left quadrant (centre lines included) as
// (col, row). The standard layout mirrors these into the other quadrants.
const TRIPLE_WORD: &[(usize, usize)] = &[(0, 0), (7, 0), (0, 7)];
const DOUBLE_WORD: &[(usize, usize)] = &[(1, 1), (2, 2), (3, 3), (4, 4)];
const TRIPLE_LETTER: &[(usize, usize)] = &[(5, 1), (1, 5), (5, 5)];
const DOUBLE_LETTER: &[(usize, usize)] = &[
    (3, 0),
    (0, 3),
    (6, 2),
    (2, 6),
    (6, 6),
    (7, 3),
    (3, 7),
];

/// A tile about to be written onto an empty square.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileMutation {
    pub position: Position,
    pub tile: char,
    pub placed_by: PlayerId,
}

/// Square grid whose premium layout is fixed at construction.
///
/// Cells are stored row-major (`cells[row][col]`). Once a square holds a tile
/// it is never cleared or overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    size: usize,
    start: Position,
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// The 15x15 board with the conventional premium squares. The centre is
    /// the start square and carries no multiplier.
    pub fn standard() -> Self {
        let last = STANDARD_BOARD_SIZE - 1;
        let mut premiums = Vec::new();

        for (coords, premium) in [
            (TRIPLE_WORD, Premium::TripleWord),
            (DOUBLE_WORD, Premium::DoubleWord),
            (TRIPLE_LETTER, Premium::TripleLetter),
            (DOUBLE_LETTER, Premium::DoubleLetter),
        ] {
            for &(col, row) in coords {
                for (c, r) in [
                    (col, row),
                    (last - col, row),
                    (col, last - row),
                    (last - col, last - row),
                ] {
                    premiums.push((Position::new(c, r), premium));
                }
            }
        }

        let centre = STANDARD_BOARD_SIZE / 2;
        Self::build(STANDARD_BOARD_SIZE, Position::new(centre, centre), &premiums)
    }

    /// An NxN board with no premiums except the start square in the centre.
    /// Returns `None` for a zero-sized board.
    pub fn plain(size: usize) -> Option<Self> {
        let centre = size / 2;
        Self::with_layout(size, Position::new(centre, centre), &[])
    }

    /// An NxN board with an explicit start square and premium set.
    ///
    /// Premiums outside the board, or on the start square, are ignored.
    /// Returns `None` if the board is empty or the start lies outside it.
    pub fn with_layout(size: usize, start: Position, premiums: &[(Position, Premium)]) -> Option<Self> {
        if size == 0 || start.col >= size || start.row >= size {
            return None;
        }
        Some(Self::build(size, start, premiums))
    }

    fn build(size: usize, start: Position, premiums: &[(Position, Premium)]) -> Self {
        let mut cells = vec![vec![Cell::default(); size]; size];

        for &(pos, premium) in premiums {
            if pos.col < size && pos.row < size && premium != Premium::Start {
                cells[pos.row][pos.col].premium = premium;
            }
        }
        cells[start.row][start.col].premium = Premium::Start;

        Self { size, start, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn in_bounds(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size
    }

    /// The square at `(col, row)`, or `None` when it is off the board.
    pub fn cell_at(&self, col: usize, row: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cell_at(pos.col, pos.row)
    }

    pub fn tile_at(&self, pos: Position) -> Option<char> {
        self.cell(pos).and_then(|cell| cell.tile)
    }

    pub fn is_filled(&self, pos: Position) -> bool {
        self.tile_at(pos).is_some()
    }

    pub fn start_filled(&self) -> bool {
        self.is_filled(self.start)
    }

    pub fn placed_tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_filled()).count()
    }

    /// In-bounds orthogonal neighbours of `pos`
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        let Position { col, row } = pos;
        [
            col.checked_sub(1).map(|c| Position::new(c, row)),
            Some(Position::new(col + 1, row)),
            row.checked_sub(1).map(|r| Position::new(col, r)),
            Some(Position::new(col, row + 1)),
        ]
        .into_iter()
        .flatten()
        .filter(move |p| self.in_bounds(p.col, p.row))
    }

    /// Write validated tiles onto the board. Only the engine's commit step
    /// calls this, with mutations that target empty in-bounds squares.
    pub(crate) fn apply_placements(&mut self, mutations: &[TileMutation]) {
        for mutation in mutations {
            let Position { col, row } = mutation.position;
            let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) else {
                continue;
            };
            debug_assert!(cell.tile.is_none(), "square {} already filled", mutation.position);
            if cell.tile.is_none() {
                cell.tile = Some(mutation.tile);
                cell.placed_by = Some(mutation.placed_by);
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| match (cell.tile, cell.premium) {
                    (Some(tile), _) => tile,
                    (None, Premium::None) => '.',
                    (None, Premium::DoubleLetter) => '\'',
                    (None, Premium::TripleLetter) => '"',
                    (None, Premium::DoubleWord) => '-',
                    (None, Premium::TripleWord) => '=',
                    (None, Premium::Start) => '*',
                })
                .flat_map(|ch| [ch, ' '])
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(board: &Board, premium: Premium) -> usize {
        (0..board.size())
            .flat_map(|row| (0..board.size()).map(move |col| (col, row)))
            .filter(|&(col, row)| board.cell_at(col, row).unwrap().premium == premium)
            .count()
    }

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.size(), 15);
        assert_eq!(board.start(), Position::new(7, 7));
        assert_eq!(count(&board, Premium::Start), 1);
        assert_eq!(count(&board, Premium::TripleWord), 8);
        assert_eq!(count(&board, Premium::DoubleWord), 16);
        assert_eq!(count(&board, Premium::TripleLetter), 12);
        assert_eq!(count(&board, Premium::DoubleLetter), 24);
    }

    #[test]
    fn test_standard_layout_is_symmetric() {
        let board = Board::standard();
        for row in 0..15 {
            for col in 0..15 {
                let premium = board.cell_at(col, row).unwrap().premium;
                assert_eq!(board.cell_at(row, col).unwrap().premium, premium);
                assert_eq!(board.cell_at(14 - col, row).unwrap().premium, premium);
            }
        }
        assert_eq!(board.cell_at(11, 7).unwrap().premium, Premium::DoubleLetter);
        assert_eq!(board.cell_at(0, 0).unwrap().premium, Premium::TripleWord);
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let board = Board::standard();
        assert!(board.cell_at(14, 14).is_some());
        assert!(board.cell_at(15, 0).is_none());
        assert!(board.cell_at(0, 15).is_none());
    }

    #[test]
    fn test_custom_layout() {
        let board = Board::with_layout(
            2,
            Position::new(1, 1),
            &[
                (Position::new(0, 0), Premium::DoubleWord),
                (Position::new(5, 5), Premium::TripleWord),
                (Position::new(0, 1), Premium::Start),
            ],
        )
        .unwrap();
        assert_eq!(board.cell_at(0, 0).unwrap().premium, Premium::DoubleWord);
        assert_eq!(board.cell_at(0, 1).unwrap().premium, Premium::None);
        assert_eq!(board.cell_at(1, 1).unwrap().premium, Premium::Start);
        assert!(Board::with_layout(2, Position::new(2, 0), &[]).is_none());
        assert!(Board::plain(0).is_none());
    }

    #[test]
    fn test_apply_placements() {
        let mut board = Board::plain(3).unwrap();
        board.apply_placements(&[
            TileMutation { position: Position::new(1, 1), tile: 'A', placed_by: 7 },
            TileMutation { position: Position::new(2, 1), tile: 'T', placed_by: 7 },
        ]);
        assert!(board.start_filled());
        assert_eq!(board.placed_tile_count(), 2);
        let cell = board.cell_at(2, 1).unwrap();
        assert_eq!(cell.tile, Some('T'));
        assert_eq!(cell.placed_by, Some(7));
    }

    #[test]
    fn test_neighbours_stay_on_board() {
        let board = Board::plain(3).unwrap();
        let corner: Vec<_> = board.neighbours(Position::new(0, 0)).collect();
        assert_eq!(corner, vec![Position::new(1, 0), Position::new(0, 1)]);
        assert_eq!(board.neighbours(Position::new(1, 1)).count(), 4);
    }

    #[test]
    fn test_display() {
        let mut board = Board::plain(3).unwrap();
        assert_eq!(board.to_string(), ". . .\n. * .\n. . .\n");
        board.apply_placements(&[TileMutation {
            position: Position::new(1, 1),
            tile: 'A',
            placed_by: 1,
        }]);
        assert_eq!(board.to_string(), ". . .\n. A .\n. . .\n");
    }
}
