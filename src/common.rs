//! Common types for Tic-Tac-Toe: signs, cells, outcomes and error kinds.

use alloc::string::String;
use core::fmt;

#[cfg(feature = "std")]
use std::time::Duration;

/// Mark associated with a player for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    X,
    O,
}

impl Sign {
    /// The human player connected over the network always plays `O`.
    pub const REMOTE: Sign = Sign::O;
    /// The automated side hosted by the server always plays `X`.
    pub const LOCAL: Sign = Sign::X;

    /// The other player's sign.
    pub fn opponent(self) -> Sign {
        match self {
            Sign::X => Sign::O,
            Sign::O => Sign::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sign::X => 'X',
            Sign::O => 'O',
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Sign occupying the cell, if any.
    pub fn sign(self) -> Option<Sign> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Sign::X),
            Cell::O => Some(Sign::O),
        }
    }
}

impl From<Sign> for Cell {
    fn from(sign: Sign) -> Self {
        match sign {
            Sign::X => Cell::X,
            Sign::O => Cell::O,
        }
    }
}

/// Result of evaluating a board. Always derived from the board, never stored
/// alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOutcome {
    InProgress,
    Win(Sign),
    Draw,
}

impl GameOutcome {
    /// `true` for `Win` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

/// Errors raised while decoding protocol lines on the receiving side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A board row did not contain exactly three `|`-separated cells.
    MalformedRow(String),
    /// A cell was neither blank, a digit hint, `X` nor `O`.
    UnknownCell(String),
    /// A line arrived that is not valid at this point of the conversation.
    UnexpectedMessage(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedRow(row) => write!(f, "Malformed board row: {:?}", row),
            ProtocolError::UnknownCell(cell) => write!(f, "Unknown board cell: {:?}", cell),
            ProtocolError::UnexpectedMessage(line) => write!(f, "Unexpected message: {:?}", line),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

/// Failures of the line transport. Every variant ends the session.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum TransportError {
    /// The peer closed the connection (zero-byte read, broken pipe or reset).
    PeerClosed,
    /// No complete line arrived within the deadline.
    Timeout(Duration),
    /// The peer sent more than the allowed number of bytes without a newline.
    LineTooLong(usize),
    /// The local side already closed this transport.
    Closed,
    /// Any other I/O failure.
    Io(std::io::Error),
}

#[cfg(feature = "std")]
impl TransportError {
    /// Map an I/O error, folding the peer-gone kinds into `PeerClosed`.
    pub fn from_io(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted => TransportError::PeerClosed,
            ErrorKind::TimedOut => TransportError::Timeout(Duration::ZERO),
            _ => TransportError::Io(err),
        }
    }

    /// `true` when the failure means the peer is gone or silent.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, TransportError::PeerClosed | TransportError::Timeout(_))
    }
}

#[cfg(feature = "std")]
impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::PeerClosed => write!(f, "Connection closed by peer"),
            TransportError::Timeout(after) => write!(f, "Receive timeout after {:?}", after),
            TransportError::LineTooLong(max) => write!(f, "Line exceeds {} bytes", max),
            TransportError::Closed => write!(f, "Transport is shut down"),
            TransportError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::from_io(err)
    }
}

/// Fatal session errors. Invalid move text is not among them: it is handled
/// inside the turn loop by re-prompting.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum SessionError {
    /// The connection failed or the remote player timed out.
    Transport(TransportError),
    /// The strategy returned an illegal move, or the session was driven past
    /// a terminal outcome.
    Invariant(String),
    /// The strategy itself failed (e.g. local input closed).
    Strategy(anyhow::Error),
}

#[cfg(feature = "std")]
impl SessionError {
    /// `true` when the session ended because the peer went away.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, SessionError::Transport(e) if e.is_disconnect())
    }
}

#[cfg(feature = "std")]
impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Transport(e) => write!(f, "Transport error: {}", e),
            SessionError::Invariant(msg) => write!(f, "Internal invariant violated: {}", msg),
            SessionError::Strategy(e) => write!(f, "Strategy failed: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Transport(e) => Some(e),
            SessionError::Strategy(e) => Some(&**e),
            SessionError::Invariant(_) => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        SessionError::Transport(err)
    }
}

/// Errors seen by a client talking to a server.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum ClientError {
    /// The server went away or stopped answering.
    Transport(TransportError),
    /// The server sent something the protocol does not allow here.
    Protocol(ProtocolError),
    /// Reading the local player's input or writing to the terminal failed.
    Io(std::io::Error),
}

#[cfg(feature = "std")]
impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "Transport error: {}", e),
            ClientError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::Protocol(e) => Some(e),
            ClientError::Io(e) => Some(e),
        }
    }
}

#[cfg(feature = "std")]
impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Transport(err)
    }
}

#[cfg(feature = "std")]
impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        ClientError::Protocol(err)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err)
    }
}
