// Rule-priority move selection. Looks exactly one ply ahead, no search.

use rand::seq::IndexedRandom;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::{
    board::Board,
    common::Sign,
    config::{CENTER, CORNERS, RANDOM_MOVE_PROBABILITY},
    rules::{apply_index, available_moves, check_victory},
};

use super::Strategy;

/// First free cell that completes a line for `sign`.
fn winning_move(board: &Board, sign: Sign, moves: &[u8]) -> Option<u8> {
    moves.iter().copied().find(|&index| {
        let mut trial = *board;
        apply_index(&mut trial, index, sign) && check_victory(&trial, sign)
    })
}

/// Pick a move for `sign` using the priority cascade.
///
/// With probability `random_move_probability` a uniformly random free cell is
/// played. Otherwise: an immediate win, a block of the opponent's immediate
/// win, the centre, the first free corner of 1, 3, 7, 9, and finally any free
/// cell. Returns `None` only on a full board.
pub fn best_move<R: Rng + ?Sized>(
    board: &Board,
    sign: Sign,
    random_move_probability: f64,
    rng: &mut R,
) -> Option<u8> {
    let moves = available_moves(board);
    if moves.is_empty() {
        return None;
    }
    if random_move_probability > 0.0 && rng.random_bool(random_move_probability) {
        return moves.choose(rng).copied();
    }
    if let Some(index) = winning_move(board, sign, &moves) {
        return Some(index);
    }
    if let Some(index) = winning_move(board, sign.opponent(), &moves) {
        return Some(index);
    }
    if moves.contains(&CENTER) {
        return Some(CENTER);
    }
    if let Some(&corner) = CORNERS.iter().find(|c| moves.contains(c)) {
        return Some(corner);
    }
    moves.choose(rng).copied()
}

/// Heuristic opponent with a small chance of playing randomly.
pub struct HeuristicStrategy {
    sign: Sign,
    random_move_probability: f64,
}

impl HeuristicStrategy {
    /// Strategy for the automated side with the default throttle.
    pub fn new() -> Self {
        Self::with_random_move_probability(RANDOM_MOVE_PROBABILITY)
    }

    /// Strategy with a custom throttle, clamped to `[0, 1]`. Zero makes it
    /// fully deterministic.
    pub fn with_random_move_probability(probability: f64) -> Self {
        Self {
            sign: Sign::LOCAL,
            random_move_probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Play as `sign` instead of the default automated sign.
    pub fn playing(mut self, sign: Sign) -> Self {
        self.sign = sign;
        self
    }
}

impl Default for HeuristicStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for HeuristicStrategy {
    fn choose_move(&mut self, rng: &mut SmallRng, board: &Board) -> anyhow::Result<u8> {
        best_move(board, self.sign, self.random_move_probability, rng)
            .ok_or_else(|| anyhow::anyhow!("no available moves"))
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Plays a uniformly random free cell.
#[derive(Default)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for RandomStrategy {
    fn choose_move(&mut self, rng: &mut SmallRng, board: &Board) -> anyhow::Result<u8> {
        available_moves(board)
            .choose(rng)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no available moves"))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
