//! Bitmate - Position Evaluation Module
//!
//! Static evaluation of chess positions from white's point of view:
//! - Terminal detection (checkmate / stalemate)
//! - Material balance
//! - Piece positioning (piece-square tables)
//!
//! Also provides the MVV-LVA capture score used for move ordering.

use crate::bitboard::squares;
use crate::board::Board;
use crate::move_generator::{GameStatus, MoveGenerator};
use crate::moves::Move;
use crate::types::*;

/// Score of a checkmated position, signed against the side to move
pub const MATE_SCORE: i32 = 999_999_999;

// ============================================================================
// PIECE VALUES
// ============================================================================

pub const PIECE_VALUES: [i32; 6] = [
    100,    // PAWN
    300,    // KNIGHT
    350,    // BISHOP
    500,    // ROOK
    900,    // QUEEN
    20000,  // KING
];

// ============================================================================
// PIECE-SQUARE TABLES
// ============================================================================
//
// Authored from white's side with rank 8 on the first row, matching the
// square numbering. Black reads them through `Square::mirror`.

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
    90,  90,  90,  90,  90,  90,  90,  90,   // Rank 8
    30,  30,  30,  40,  40,  30,  30,  30,
    20,  20,  20,  30,  30,  30,  20,  20,
    10,  10,  10,  20,  20,  10,  10,  10,
     5,   5,  10,  20,  20,   5,   5,   5,
     0,   0,   0,   5,   5,   0,   0,   0,
     0,   0,   0, -10, -10,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,   // Rank 1
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,  10,  10,   0,   0,  -5,
    -5,   5,  20,  20,  20,  20,   5,  -5,
    -5,  10,  20,  30,  30,  20,  10,  -5,
    -5,  10,  20,  30,  30,  20,  10,  -5,
    -5,   5,  20,  10,  10,  20,   5,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5, -10,   0,   0,   0,   0, -10,  -5,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,  10,  10,   0,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,  10,   0,   0,   0,   0,  10,   0,
     0,  30,   0,   0,   0,   0,  30,   0,
     0,   0, -10,   0,   0, -10,   0,   0,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
    50,  50,  50,  50,  50,  50,  50,  50,
    50,  50,  50,  50,  50,  50,  50,  50,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   0,   0,
     0,   0,   0,  20,  20,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   5,   5,   5,   5,   0,   0,
     0,   5,   5,  10,  10,   5,   5,   0,
     0,   5,  10,  20,  20,  10,   5,   0,
     0,   5,  10,  20,  20,  10,   5,   0,
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   5,   5,  -5,  -5,   0,   5,   0,
     0,   0,   5,   0, -15,   0,  10,   0,
];

/// Pieces that contribute to the static score; both kings are always present
const SCORED_KINDS: [PieceKind; 5] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Get piece-square table value for a piece
fn pst_value(kind: PieceKind, sq: Square, color: Color) -> i32 {
    let pst = match kind {
        PieceKind::Pawn => &PAWN_PST,
        PieceKind::Knight => &KNIGHT_PST,
        PieceKind::Bishop => &BISHOP_PST,
        PieceKind::Rook => &ROOK_PST,
        PieceKind::Queen => &QUEEN_PST,
        PieceKind::King => return 0,
    };

    let sq = match color {
        Color::White => sq,
        Color::Black => sq.mirror(),
    };

    pst[sq.index()]
}

/// Material and placement of one side
fn side_score(board: &Board, color: Color) -> i32 {
    let mut score = 0;

    for kind in SCORED_KINDS {
        for sq in squares(board.pieces(Piece::new(kind, color))) {
            score += PIECE_VALUES[kind.index()] + pst_value(kind, sq, color);
        }
    }

    score
}

// ============================================================================
// MAIN EVALUATION FUNCTION
// ============================================================================

/// Material plus piece-square score, ignoring whether the game is over
pub fn static_score(board: &Board) -> i32 {
    side_score(board, Color::White) - side_score(board, Color::Black)
}

/// Evaluate the position from white's perspective.
///
/// A checkmated side to move scores `MATE_SCORE` against itself and a
/// stalemate scores 0.
pub fn evaluate(generator: &MoveGenerator, board: &Board) -> i32 {
    match generator.game_status(board) {
        GameStatus::Checkmate => match board.side {
            Color::White => -MATE_SCORE,
            Color::Black => MATE_SCORE,
        },
        GameStatus::Stalemate => 0,
        GameStatus::Ongoing => static_score(board),
    }
}

/// Most-valuable-victim / least-valuable-attacker score of a capture.
///
/// Victim value dominates; among equal victims the cheaper attacker wins.
/// Quiet moves score 0. En passant always takes a pawn.
pub fn mvv_lva(board: &Board, mv: Move) -> i32 {
    if !mv.is_capture() {
        return 0;
    }

    let victim = if mv.is_en_passant() {
        PieceKind::Pawn
    } else {
        match board.piece_at(mv.target()) {
            Some(piece) => piece.kind(),
            None => return 0,
        }
    };
    let attacker = mv.piece().kind();

    100 * (victim.index() as i32 + 1) + 5 - attacker.index() as i32
}
