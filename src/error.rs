//! Error types for the engine
//!
//! Only failures that the caller cannot recover from locally are errors.
//! An illegal move is a normal outcome of `make_move` and never appears here.

use thiserror::Error;

use crate::magic::Slider;
use crate::types::Square;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// The position string does not describe a complete 8x8 board
    #[error("malformed position `{fen}`: {reason}")]
    MalformedPosition { fen: String, reason: String },

    /// An algebraic square name could not be parsed
    #[error("invalid square `{0}`")]
    InvalidSquare(String),

    /// A packed integer that no call to `Move::encode` could have produced
    #[error("invalid move encoding {0:#08x}")]
    InvalidMoveEncoding(u32),

    /// The requested move is not a legal move in the current position
    #[error("move `{mv}` is not legal in `{fen}`")]
    MoveNotAvailable { mv: String, fen: String },

    /// The randomized magic search ran out of candidates
    #[error("no {slider} magic found for {square} after {attempts} candidates")]
    MagicSearchExhausted {
        slider: Slider,
        square: Square,
        attempts: u64,
    },

    /// A supplied magic number maps two occupancies with different attacks to one slot
    #[error("{slider} magic for {square} is not collision-free")]
    MagicCollision { slider: Slider, square: Square },
}

impl ChessError {
    pub(crate) fn malformed(fen: &str, reason: impl Into<String>) -> Self {
        ChessError::MalformedPosition {
            fen: fen.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for engine operations
pub type ChessResult<T> = Result<T, ChessError>;
