//! Line protocol spoken between the server and a client.
//!
//! Every message is one line of UTF-8 text terminated by `\n`. There is no
//! escaping or length prefix, so a message never contains a newline itself.
//! A board snapshot is three consecutive row lines.

use alloc::string::{String, ToString};

use crate::board::{Board, BoardStyle};
use crate::common::{Cell, GameOutcome, ProtocolError, Sign};
use crate::config::BOARD_DIM;

/// Prompt asking the remote player for a move.
pub const PROMPT: &str = "Your move (1-9):";
/// The remote move was rejected; a new prompt follows.
pub const INVALID_MOVE: &str = "Invalid move!";
/// The remote move was applied; a board snapshot follows.
pub const MOVE_ACCEPTED: &str = "MOVE_ACCEPTED";
/// The automated side is replying; a board snapshot follows.
pub const SERVER_TURN: &str = "Server's turn";
/// Neither side has won or drawn yet.
pub const CONTINUE: &str = "CONTINUE";
pub const YOU_WIN: &str = "You win!";
pub const SERVER_WINS: &str = "Server wins!";
pub const DRAW: &str = "Draw!";

/// Cell separator inside a board row.
pub const CELL_SEPARATOR: &str = " | ";

/// Messages the server sends, as classified by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// One row of a board snapshot.
    BoardRow(String),
    Prompt,
    InvalidMove,
    MoveAccepted,
    ServerTurn,
    Continue,
    YouWin,
    ServerWins,
    Draw,
}

impl ServerMessage {
    /// Classify a received line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim_end();
        let msg = match line.trim_start() {
            PROMPT => ServerMessage::Prompt,
            INVALID_MOVE => ServerMessage::InvalidMove,
            MOVE_ACCEPTED => ServerMessage::MoveAccepted,
            SERVER_TURN => ServerMessage::ServerTurn,
            CONTINUE => ServerMessage::Continue,
            YOU_WIN => ServerMessage::YouWin,
            SERVER_WINS => ServerMessage::ServerWins,
            DRAW => ServerMessage::Draw,
            _ if line.matches('|').count() == BOARD_DIM - 1 => {
                ServerMessage::BoardRow(line.to_string())
            }
            _ => return Err(ProtocolError::UnexpectedMessage(line.to_string())),
        };
        Ok(msg)
    }

    /// Wire text for control messages. Board rows carry their own text.
    pub fn as_line(&self) -> &str {
        match self {
            ServerMessage::BoardRow(row) => row,
            ServerMessage::Prompt => PROMPT,
            ServerMessage::InvalidMove => INVALID_MOVE,
            ServerMessage::MoveAccepted => MOVE_ACCEPTED,
            ServerMessage::ServerTurn => SERVER_TURN,
            ServerMessage::Continue => CONTINUE,
            ServerMessage::YouWin => YOU_WIN,
            ServerMessage::ServerWins => SERVER_WINS,
            ServerMessage::Draw => DRAW,
        }
    }

    /// `true` for the three final verdicts.
    pub fn is_verdict(&self) -> bool {
        matches!(
            self,
            ServerMessage::YouWin | ServerMessage::ServerWins | ServerMessage::Draw
        )
    }
}

/// Verdict line announcing a terminal outcome, from the remote player's view.
pub fn verdict_line(outcome: GameOutcome) -> Option<&'static str> {
    match outcome {
        GameOutcome::InProgress => None,
        GameOutcome::Win(sign) if sign == Sign::REMOTE => Some(YOU_WIN),
        GameOutcome::Win(_) => Some(SERVER_WINS),
        GameOutcome::Draw => Some(DRAW),
    }
}

/// Encode a board as its three row lines.
pub fn encode_board(board: &Board, style: BoardStyle) -> [String; BOARD_DIM] {
    core::array::from_fn(|row| board.render_row(row, style))
}

/// Decode a single row line. Blank cells and digit hints are both empty.
pub fn decode_row(line: &str) -> Result<[Cell; BOARD_DIM], ProtocolError> {
    let mut cells = [Cell::Empty; BOARD_DIM];
    let mut parts = line.split('|');
    for cell in cells.iter_mut() {
        let part = parts
            .next()
            .ok_or_else(|| ProtocolError::MalformedRow(line.to_string()))?
            .trim();
        *cell = match part {
            "X" => Cell::X,
            "O" => Cell::O,
            "" => Cell::Empty,
            hint if hint.len() == 1 && hint.as_bytes()[0].is_ascii_digit() => Cell::Empty,
            other => return Err(ProtocolError::UnknownCell(other.to_string())),
        };
    }
    if parts.next().is_some() {
        return Err(ProtocolError::MalformedRow(line.to_string()));
    }
    Ok(cells)
}

/// Rebuild a board from its three row lines.
pub fn decode_board<S: AsRef<str>>(rows: &[S]) -> Result<Board, ProtocolError> {
    if rows.len() != BOARD_DIM {
        return Err(ProtocolError::UnexpectedMessage(alloc::format!(
            "expected {} board rows, got {}",
            BOARD_DIM,
            rows.len()
        )));
    }
    let mut cells = [[Cell::Empty; BOARD_DIM]; BOARD_DIM];
    for (dst, row) in cells.iter_mut().zip(rows) {
        *dst = decode_row(row.as_ref())?;
    }
    Ok(Board::from_cells(cells))
}
