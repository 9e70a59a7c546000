//! Strategy trait and implementations
//!
//! The automated side of a session picks its moves through [`Strategy`]:
//! - HeuristicStrategy: one-ply rule cascade (win, block, centre, corner)
//! - RandomStrategy: uniform choice among free cells
//! - ManualStrategy: a person at the server's terminal types the move

use rand::rngs::SmallRng;

use crate::board::Board;

/// Decision function for the automated side.
///
/// Called only when it is this side's turn and the game is not over. The
/// returned index must be one of `rules::available_moves(board)`; the session
/// treats anything else as an internal fault.
pub trait Strategy: Send {
    /// Choose the next move for the current board.
    fn choose_move(&mut self, rng: &mut SmallRng, board: &Board) -> anyhow::Result<u8>;

    /// Short label used in logs.
    fn name(&self) -> &'static str {
        "strategy"
    }
}

impl<S: Strategy + ?Sized> Strategy for alloc::boxed::Box<S> {
    fn choose_move(&mut self, rng: &mut SmallRng, board: &Board) -> anyhow::Result<u8> {
        (**self).choose_move(rng, board)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

pub mod ai;
pub use ai::{best_move, HeuristicStrategy, RandomStrategy};

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub use cli::ManualStrategy;
