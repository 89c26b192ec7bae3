//! Bitmate - Search Engine Module
//!
//! This module implements the move search using:
//! - Minimax with fail-soft alpha-beta pruning
//! - Capture-only quiescence search with stand-pat cutoffs
//! - MVV-LVA ordering at interior nodes
//!
//! Scores are always from white's point of view: white maximizes and black
//! minimizes. The board is searched in place; every applied move is undone by
//! restoring the snapshot taken just before it.

use std::cmp::Reverse;
use std::time::Instant;

use tracing::{info, trace, warn};

use crate::board::Board;
use crate::error::ChessResult;
use crate::evaluation::{evaluate, mvv_lva};
use crate::move_generator::MoveGenerator;
use crate::moves::Move;
use crate::types::Color;

/// Bound wider than any score, including the checkmate score
pub const INFINITY: i32 = 1_000_000_000;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies searched before the horizon
    pub depth: u32,
    /// Extend the horizon with capture-only search
    pub quiescence: bool,
    /// Sort interior moves by MVV-LVA
    pub order_moves: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 4,
            quiescence: true,
            order_moves: true,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_quiescence(mut self, quiescence: bool) -> Self {
        self.quiescence = quiescence;
        self
    }

    pub fn with_move_ordering(mut self, order_moves: bool) -> Self {
        self.order_moves = order_moves;
        self
    }
}

/// Diagnostic counters for one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Interior and horizon nodes visited
    pub nodes: u64,
    /// Pseudo-legal moves generated across all nodes
    pub evaluated_moves: u64,
    /// Nodes visited by the capture-only extension
    pub quiescence_nodes: u64,
}

/// Result of a root search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Score of the best move, from white's perspective
    pub score: i32,
    pub stats: SearchStats,
}

// ============================================================================
// SEARCH ENGINE
// ============================================================================

pub struct SearchEngine {
    generator: MoveGenerator,
    config: SearchConfig,
    stats: SearchStats,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> ChessResult<Self> {
        Ok(SearchEngine::with_generator(MoveGenerator::new()?, config))
    }

    pub fn with_generator(generator: MoveGenerator, config: SearchConfig) -> Self {
        SearchEngine {
            generator,
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Counters of the most recent search
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn generator(&self) -> &MoveGenerator {
        &self.generator
    }

    /// Pick the best move for the side to move.
    ///
    /// Root moves are tried in generation order, each with a full window.
    /// A later move replaces the incumbent only with a strictly better score.
    /// The board is left exactly as it was passed in.
    pub fn search(&mut self, board: &mut Board) -> SearchOutcome {
        self.stats = SearchStats::default();
        let start = Instant::now();
        let depth = self.config.depth.max(1);
        let maximizing = board.side == Color::White;

        let moves = self.generator.generate_moves(board, board.side);
        self.stats.evaluated_moves += moves.len() as u64;

        let mut best_move = None;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };

        for mv in moves {
            let snapshot = board.snapshot();
            if !self.generator.make_move(board, mv).is_applied() {
                continue;
            }
            let score = self.search_aux(board, depth - 1, -INFINITY, INFINITY, !maximizing);
            board.restore(&snapshot);

            trace!(mv = %mv, score, "root move scored");

            let improves = if maximizing { score > best_score } else { score < best_score };
            if improves {
                best_score = score;
                best_move = Some(mv);
            }
        }

        if best_move.is_none() {
            warn!(fen = %board.to_fen(), "search requested with no legal move");
            best_score = evaluate(&self.generator, board);
        }

        let best = best_move.map_or_else(|| "none".to_string(), |mv| mv.to_uci());
        info!(
            best_move = %best,
            score = best_score,
            depth,
            nodes = self.stats.nodes,
            quiescence_nodes = self.stats.quiescence_nodes,
            evaluated_moves = self.stats.evaluated_moves,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );

        SearchOutcome {
            best_move,
            score: best_score,
            stats: self.stats,
        }
    }

    /// Fail-soft alpha-beta below the root
    pub fn search_aux(&mut self, board: &mut Board, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.stats.nodes += 1;

        if depth == 0 {
            return if self.config.quiescence {
                self.quiescence(board, alpha, beta, maximizing)
            } else {
                evaluate(&self.generator, board)
            };
        }

        let moves = self.ordered_moves(board, false);
        self.stats.evaluated_moves += moves.len() as u64;

        let mut value = if maximizing { -INFINITY } else { INFINITY };
        let mut any_legal = false;

        for mv in moves {
            let snapshot = board.snapshot();
            if !self.generator.make_move(board, mv).is_applied() {
                continue;
            }
            any_legal = true;
            let score = self.search_aux(board, depth - 1, alpha, beta, !maximizing);
            board.restore(&snapshot);

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
                if value >= beta {
                    break;
                }
            } else {
                value = value.min(score);
                beta = beta.min(value);
                if value <= alpha {
                    break;
                }
            }
        }

        // Checkmate or stalemate
        if !any_legal {
            return evaluate(&self.generator, board);
        }

        value
    }

    /// Capture-only search; the static score stands in when no capture improves on it
    pub fn quiescence(&mut self, board: &mut Board, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.stats.quiescence_nodes += 1;

        let mut value = evaluate(&self.generator, board);
        if maximizing {
            alpha = alpha.max(value);
            if value >= beta {
                return value;
            }
        } else {
            beta = beta.min(value);
            if value <= alpha {
                return value;
            }
        }

        let captures = self.ordered_moves(board, true);
        self.stats.evaluated_moves += captures.len() as u64;

        for mv in captures {
            let snapshot = board.snapshot();
            if !self.generator.make_capture(board, mv).is_applied() {
                continue;
            }
            let score = self.quiescence(board, alpha, beta, !maximizing);
            board.restore(&snapshot);

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
                if value >= beta {
                    break;
                }
            } else {
                value = value.min(score);
                beta = beta.min(value);
                if value <= alpha {
                    break;
                }
            }
        }

        value
    }

    /// Unpruned minimax over the same tree `search` explores.
    ///
    /// With quiescence enabled the horizon is extended by every legal capture,
    /// each node scoring the better of its static score and its captures.
    pub fn minimax(&mut self, board: &mut Board, depth: u32) -> i32 {
        self.stats.nodes += 1;
        let maximizing = board.side == Color::White;

        if depth == 0 {
            return if self.config.quiescence {
                self.capture_minimax(board)
            } else {
                evaluate(&self.generator, board)
            };
        }

        let moves = self.generator.generate_moves(board, board.side);
        self.stats.evaluated_moves += moves.len() as u64;

        let mut best: Option<i32> = None;
        for mv in moves {
            let snapshot = board.snapshot();
            if !self.generator.make_move(board, mv).is_applied() {
                continue;
            }
            let score = self.minimax(board, depth - 1);
            board.restore(&snapshot);

            best = Some(match best {
                Some(b) if maximizing => b.max(score),
                Some(b) => b.min(score),
                None => score,
            });
        }

        best.unwrap_or_else(|| evaluate(&self.generator, board))
    }

    fn capture_minimax(&mut self, board: &mut Board) -> i32 {
        self.stats.quiescence_nodes += 1;
        let maximizing = board.side == Color::White;
        let mut value = evaluate(&self.generator, board);

        for mv in self.generator.generate_captures(board, board.side) {
            let snapshot = board.snapshot();
            if !self.generator.make_capture(board, mv).is_applied() {
                continue;
            }
            let score = self.capture_minimax(board);
            board.restore(&snapshot);

            value = if maximizing { value.max(score) } else { value.min(score) };
        }

        value
    }

    /// Pseudo-legal moves (or captures) for the side to move, MVV-LVA first when enabled
    fn ordered_moves(&self, board: &Board, captures_only: bool) -> Vec<Move> {
        let mut moves = if captures_only {
            self.generator.generate_captures(board, board.side)
        } else {
            self.generator.generate_moves(board, board.side)
        };

        if self.config.order_moves {
            moves.sort_by_cached_key(|&mv| Reverse(mvv_lva(board, mv)));
        }

        moves
    }
}
