//! Bitmate - Move application
//!
//! Moves are applied directly to the board planes. A move that leaves the
//! mover's king attacked is undone by restoring the snapshot taken on entry,
//! so a rejected move never changes the board.

use crate::board::Board;
use crate::move_generator::MoveGenerator;
use crate::moves::Move;
use crate::types::*;

/// Rights that survive a move touching each square.
///
/// Moving from or capturing on a king or rook home square clears the
/// matching rights; every other square keeps all four.
#[rustfmt::skip]
const CASTLING_RIGHTS: [u8; 64] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];

/// Rook squares for a castling king landing on `king_to`
fn castling_rook(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

/// Result of trying to apply a move
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    /// The board now holds the position after the move
    Applied,
    /// The move left the mover's king in check; the board is unchanged
    RejectedSelfCheck,
    /// A capture-only application was asked to play a non-capture; the board is unchanged
    RejectedNotCapture,
}

impl ApplyResult {
    #[inline]
    pub fn is_applied(self) -> bool {
        self == ApplyResult::Applied
    }
}

impl MoveGenerator {
    /// Apply a pseudo-legal move for the side to move.
    ///
    /// The move is expected to come from `generate_moves` for this board.
    pub fn make_move(&self, board: &mut Board, mv: Move) -> ApplyResult {
        let snapshot = board.snapshot();
        let side = board.side;
        let source = mv.source();
        let target = mv.target();
        let piece = mv.piece();

        // Move the piece
        board.bitboards[piece.index()] &= !source.bb();
        board.bitboards[piece.index()] |= target.bb();

        // Remove whatever enemy piece stood on the target
        if mv.is_capture() {
            for enemy in Piece::ALL.into_iter().filter(|p| p.color() != side) {
                board.bitboards[enemy.index()] &= !target.bb();
            }
        }

        if let Some(promoted) = mv.promotion() {
            board.bitboards[piece.index()] &= !target.bb();
            board.bitboards[promoted.index()] |= target.bb();
        }

        if mv.is_en_passant() {
            // The captured pawn sits behind the target square
            let captured = match side {
                Color::White => target.index() + 8,
                Color::Black => target.index() - 8,
            };
            let enemy_pawn = Piece::new(PieceKind::Pawn, side.opponent());
            board.bitboards[enemy_pawn.index()] &= !(1u64 << captured);
        }

        board.en_passant = None;
        if mv.is_double_push() {
            board.en_passant = Square::from_index((source.index() + target.index()) / 2);
        }

        // Castling flags only ever pass validation on the four king moves
        if let Some((rook_from, rook_to)) = castling_rook(target).filter(|_| mv.is_castling()) {
            let rook = Piece::new(PieceKind::Rook, side);
            board.bitboards[rook.index()] &= !rook_from.bb();
            board.bitboards[rook.index()] |= rook_to.bb();
        }

        board.castling &= CASTLING_RIGHTS[source.index()] & CASTLING_RIGHTS[target.index()];

        board.update_occupancies();
        board.side = side.opponent();

        let king_attacked = match board.king_square(side) {
            Some(king_sq) => self.is_square_attacked(board, king_sq, side.opponent()),
            None => false,
        };
        if king_attacked {
            board.restore(&snapshot);
            return ApplyResult::RejectedSelfCheck;
        }

        ApplyResult::Applied
    }

    /// Apply `mv` only if it is a capture
    pub fn make_capture(&self, board: &mut Board, mv: Move) -> ApplyResult {
        if !mv.is_capture() {
            return ApplyResult::RejectedNotCapture;
        }
        self.make_move(board, mv)
    }
}
