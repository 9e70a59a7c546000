#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod board;
pub mod common;
pub mod config;
pub mod player;
pub mod protocol;
pub mod rules;
#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod listener;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;
pub mod prelude;

pub use board::{coord_to_index, index_to_coord, Board, BoardStyle};
pub use common::*;
pub use config::*;
pub use player::{best_move, HeuristicStrategy, RandomStrategy, Strategy};
pub use protocol::ServerMessage;
pub use rules::{
    apply_index, apply_move, available_moves, check_victory, evaluate, is_draw, outcome_after,
    parse_move,
};
#[cfg(feature = "std")]
pub use client::{ClientEvent, GameClient, Scoreboard, Verdict};
#[cfg(feature = "std")]
pub use listener::{Listener, ServerStats, StrategyFactory};
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from, LOG_ENV};
#[cfg(feature = "std")]
pub use player::ManualStrategy;
#[cfg(feature = "std")]
pub use session::{Session, SessionEvent, SessionReport, SessionState};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpLineTransport, LineTransport};
