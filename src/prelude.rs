//! Commonly used types and utilities for ease of import.

pub use crate::{
    apply_move, available_moves, check_victory, is_draw, Board, Cell, GameOutcome,
    HeuristicStrategy, Sign, Strategy,
};

#[cfg(feature = "std")]
pub use crate::{GameClient, Listener, Session, SessionReport, SessionState};

#[cfg(feature = "std")]
pub use crate::transport::{in_memory::InMemoryTransport, tcp::TcpLineTransport, LineTransport};
