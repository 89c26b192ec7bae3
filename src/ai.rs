//! Bitmate - Computer players
//!
//! A [`ChessAI`] picks a move for the side to move of the board it is handed.
//! Players may track the game through `notify_move` and `retake`, which
//! `Game` calls after playing or taking back a move; both default to doing
//! nothing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::board::Board;
use crate::error::ChessResult;
use crate::move_generator::MoveGenerator;
use crate::moves::Move;
use crate::search::SearchEngine;

pub trait ChessAI {
    /// Choose a move for the side to move. The board is returned unchanged.
    fn play_turn(&mut self, board: &mut Board) -> Option<Move>;

    /// Moves examined by the last `play_turn`
    fn evaluated_moves(&self) -> u64;

    /// A move was played on the game board
    fn notify_move(&mut self, _mv: Move) {}

    /// The last move was taken back through `Game::retake_with`
    fn retake(&mut self) {}

    fn name(&self) -> &'static str;
}

impl ChessAI for SearchEngine {
    fn play_turn(&mut self, board: &mut Board) -> Option<Move> {
        self.search(board).best_move
    }

    fn evaluated_moves(&self) -> u64 {
        self.stats().evaluated_moves
    }

    fn name(&self) -> &'static str {
        "alpha-beta"
    }
}

/// Plays a uniformly random legal move
pub struct RandomAI {
    generator: MoveGenerator,
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: u64) -> ChessResult<Self> {
        Ok(RandomAI {
            generator: MoveGenerator::new()?,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl ChessAI for RandomAI {
    fn play_turn(&mut self, board: &mut Board) -> Option<Move> {
        let moves = self.generator.generate_legal_moves(board);
        let choice = moves.choose(&mut self.rng).copied();
        debug!(legal = moves.len(), choice = ?choice.map(|m| m.to_uci()), "random move picked");
        choice
    }

    fn evaluated_moves(&self) -> u64 {
        1
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
