//! Bitmate - Game facade
//!
//! [`Game`] is what a front end talks to: it owns the position and the list
//! of played moves, answers "what can this piece do", plays moves, takes them
//! back and asks a computer player for a move.

use tracing::debug;

use crate::ai::ChessAI;
use crate::board::{Board, BoardSnapshot};
use crate::error::{ChessError, ChessResult};
use crate::move_applier::ApplyResult;
use crate::move_generator::{GameStatus, MoveGenerator};
use crate::moves::Move;
use crate::types::{Piece, Square};

/// A played move and the position it was played from
#[derive(Clone, Copy, Debug)]
struct PlayedMove {
    mv: Move,
    before: BoardSnapshot,
}

pub struct Game {
    generator: MoveGenerator,
    board: Board,
    history: Vec<PlayedMove>,
}

impl Game {
    /// A game from the starting position
    pub fn new() -> ChessResult<Self> {
        Ok(Game {
            generator: MoveGenerator::new()?,
            board: Board::new(),
            history: Vec::new(),
        })
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let mut game = Game::new()?;
        game.load(fen)?;
        Ok(game)
    }

    /// Replace the position. On error the current game is kept as is.
    pub fn load(&mut self, fen: &str) -> ChessResult<()> {
        let board = Board::from_fen(fen)?;
        self.board = board;
        self.history.clear();
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn generator(&self) -> &MoveGenerator {
        &self.generator
    }

    /// The piece on `sq` if it belongs to the side to move
    pub fn pick_up(&self, sq: Square) -> Option<Piece> {
        self.board
            .piece_at(sq)
            .filter(|piece| piece.color() == self.board.side)
    }

    /// Legal moves of the piece on `sq`
    pub fn moves_from(&self, sq: Square) -> Vec<Move> {
        self.generator.legal_moves_from(&self.board, sq)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.generator.generate_legal_moves(&self.board)
    }

    /// Play a move generated for the current position.
    ///
    /// Moves the generator would not produce here are refused with
    /// `MoveNotAvailable`; a generated move that exposes the king is
    /// reported through the returned `ApplyResult`.
    pub fn play(&mut self, mv: Move) -> ChessResult<ApplyResult> {
        let generated = self
            .generator
            .generate_moves(&self.board, self.board.side)
            .contains(&mv);
        if !generated {
            return Err(self.not_available(mv.to_uci()));
        }

        let before = self.board.snapshot();
        let result = self.generator.make_move(&mut self.board, mv);
        if result.is_applied() {
            debug!(mv = %mv, fen = %self.board.to_fen(), "move played");
            self.history.push(PlayedMove { mv, before });
        }
        Ok(result)
    }

    /// Play a move given in coordinate notation such as `e2e4` or `e7e8q`
    pub fn play_uci(&mut self, uci: &str) -> ChessResult<Move> {
        let mv = self
            .legal_moves()
            .into_iter()
            .find(|mv| mv.to_uci() == uci)
            .ok_or_else(|| self.not_available(uci.to_string()))?;

        match self.play(mv)? {
            ApplyResult::Applied => Ok(mv),
            _ => Err(self.not_available(uci.to_string())),
        }
    }

    /// Undo the last played move, returning it
    pub fn retake(&mut self) -> Option<Move> {
        let last = self.history.pop()?;
        self.board.restore(&last.before);
        debug!(mv = %last.mv, "move taken back");
        Some(last.mv)
    }

    /// Undo the last played move and tell `ai` about it
    pub fn retake_with(&mut self, ai: &mut dyn ChessAI) -> Option<Move> {
        let mv = self.retake()?;
        ai.retake();
        Some(mv)
    }

    /// Ask `ai` for a move and play it. `None` when the side to move has no legal move.
    pub fn request_ai_move(&mut self, ai: &mut dyn ChessAI) -> ChessResult<Option<Move>> {
        let Some(mv) = ai.play_turn(&mut self.board) else {
            return Ok(None);
        };

        match self.play(mv)? {
            ApplyResult::Applied => {
                ai.notify_move(mv);
                Ok(Some(mv))
            }
            _ => Err(self.not_available(mv.to_uci())),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.generator.game_status(&self.board)
    }

    /// Played moves, oldest first
    pub fn history(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|played| played.mv)
    }

    fn not_available(&self, mv: String) -> ChessError {
        ChessError::MoveNotAvailable {
            mv,
            fen: self.board.to_fen(),
        }
    }
}
