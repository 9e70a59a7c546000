//! The 3x3 grid owned by a session.

use alloc::string::String;
use core::fmt;

use crate::common::{Cell, Sign};
use crate::config::{BOARD_DIM, NUM_CELLS};

/// How empty cells are rendered in a board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardStyle {
    /// Empty cells are a single space.
    #[default]
    Blank,
    /// Empty cells show their own 1-based index as a hint.
    Numbered,
}

/// Map a 1-based move index to `(row, col)`. Returns `None` outside 1..=9.
pub fn index_to_coord(index: u8) -> Option<(usize, usize)> {
    if index == 0 || index as usize > NUM_CELLS {
        return None;
    }
    let i = (index - 1) as usize;
    Some((i / BOARD_DIM, i % BOARD_DIM))
}

/// Inverse of [`index_to_coord`].
pub fn coord_to_index(row: usize, col: usize) -> u8 {
    (row * BOARD_DIM + col + 1) as u8
}

/// Tic-Tac-Toe board. Cells change only through the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: [[Cell; BOARD_DIM]; BOARD_DIM],
}

impl Board {
    /// Create an empty board.
    pub const fn new() -> Self {
        Board {
            cells: [[Cell::Empty; BOARD_DIM]; BOARD_DIM],
        }
    }

    /// Build a board from an explicit grid, e.g. a decoded snapshot.
    pub const fn from_cells(cells: [[Cell; BOARD_DIM]; BOARD_DIM]) -> Self {
        Board { cells }
    }

    /// Cell at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Cell at a 1-based move index.
    pub fn cell(&self, index: u8) -> Option<Cell> {
        let (row, col) = index_to_coord(index)?;
        self.get(row, col)
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Immutable view of all rows.
    pub fn rows(&self) -> &[[Cell; BOARD_DIM]; BOARD_DIM] {
        &self.cells
    }

    /// Iterate over `(index, cell)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, &cell)| (coord_to_index(r, c), cell))
        })
    }

    /// Number of cells marked with `sign`.
    pub fn count(&self, sign: Sign) -> usize {
        let target = Cell::from(sign);
        self.iter().filter(|&(_, cell)| cell == target).count()
    }

    /// Returns `true` when no cell is marked.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, cell)| cell.is_empty())
    }

    /// Returns `true` when every cell is marked.
    pub fn is_full(&self) -> bool {
        self.iter().all(|(_, cell)| !cell.is_empty())
    }

    /// Render one row as the three cells joined by `" | "`.
    pub fn render_row(&self, row: usize, style: BoardStyle) -> String {
        let mut out = String::new();
        for col in 0..BOARD_DIM {
            if col > 0 {
                out.push_str(" | ");
            }
            match (self.cells[row][col], style) {
                (Cell::X, _) => out.push('X'),
                (Cell::O, _) => out.push('O'),
                (Cell::Empty, BoardStyle::Blank) => out.push(' '),
                (Cell::Empty, BoardStyle::Numbered) => {
                    let hint = coord_to_index(row, col);
                    out.push(char::from(b'0' + hint));
                }
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_DIM {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.render_row(row, BoardStyle::Blank))?;
        }
        Ok(())
    }
}
