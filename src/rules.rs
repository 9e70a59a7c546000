//! Legality, move application and win/draw detection.
//!
//! Everything here is a pure function of the board and is recomputed from
//! scratch on every call.

use alloc::vec::Vec;

use crate::board::{index_to_coord, Board};
use crate::common::{Cell, GameOutcome, Sign};
use crate::config::BOARD_DIM;

/// The eight winning lines as `(row, col)` triples.
const LINES: [[(usize, usize); BOARD_DIM]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Parse move text into a cell index. Only integers in 1..=9 are accepted.
pub fn parse_move(text: &str) -> Option<u8> {
    let index: u8 = text.trim().parse().ok()?;
    index_to_coord(index).map(|_| index)
}

/// Apply a move given as raw text.
///
/// Non-numeric text, out-of-range indices and occupied cells are all
/// rejected the same way: the board is left untouched and `false` returned.
pub fn apply_move(board: &mut Board, text: &str, sign: Sign) -> bool {
    match parse_move(text) {
        Some(index) => apply_index(board, index, sign),
        None => false,
    }
}

/// Apply a move given as a 1-based index.
pub fn apply_index(board: &mut Board, index: u8, sign: Sign) -> bool {
    let Some((row, col)) = index_to_coord(index) else {
        return false;
    };
    if board.get(row, col) != Some(Cell::Empty) {
        return false;
    }
    board.set(row, col, Cell::from(sign));
    true
}

/// `true` if any row, column or diagonal is entirely `sign`.
pub fn check_victory(board: &Board, sign: Sign) -> bool {
    let target = Cell::from(sign);
    LINES.iter().any(|line| {
        line.iter()
            .all(|&(r, c)| board.get(r, c) == Some(target))
    })
}

/// `true` iff every cell is marked. Only meaningful once the mover has been
/// checked for victory: a full board with a line is a win.
pub fn is_draw(board: &Board) -> bool {
    board.is_full()
}

/// Indices of empty cells in ascending order.
pub fn available_moves(board: &Board) -> Vec<u8> {
    board
        .iter()
        .filter(|&(_, cell)| cell.is_empty())
        .map(|(index, _)| index)
        .collect()
}

/// Outcome right after `mover` played: victory for the mover first, then draw.
pub fn outcome_after(board: &Board, mover: Sign) -> GameOutcome {
    if check_victory(board, mover) {
        GameOutcome::Win(mover)
    } else if is_draw(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

/// Outcome of an arbitrary board, checking both signs.
pub fn evaluate(board: &Board) -> GameOutcome {
    for sign in [Sign::X, Sign::O] {
        if check_victory(board, sign) {
            return GameOutcome::Win(sign);
        }
    }
    if is_draw(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

