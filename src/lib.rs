//! Bitmate - Bitboard Chess Engine
//!
//! A chess engine core written in Rust with support for:
//! - Full FIDE move rules (castling, en passant, promotion)
//! - Bitboard representation with magic-bitboard slider attacks
//! - Minimax search with alpha-beta pruning and quiescence search
//! - Material and piece-square evaluation
//! - Perft for move generator verification

pub mod types;
pub mod error;
pub mod bitboard;
pub mod magic;
pub mod attack_tables;
pub mod board;
pub mod moves;
pub mod move_generator;
pub mod move_applier;
pub mod evaluation;
pub mod search;
pub mod ai;
pub mod game;
pub mod perft;

pub use board::Board;
pub use error::{ChessError, ChessResult};
pub use move_applier::ApplyResult;
pub use move_generator::{GameStatus, MoveGenerator};
pub use moves::Move;
pub use search::{SearchConfig, SearchEngine};
