//! Bitmate - Move Generator Module
//!
//! This module generates pseudo-legal moves from the attack tables, including
//! all special moves (castling, en passant, pawn promotion), and answers
//! "is this square attacked" queries. King safety is checked later, when a
//! move is applied.

use crate::attack_tables::{self, AttackTables};
use crate::bitboard::{squares, RANK_2, RANK_7};
use crate::board::Board;
use crate::error::ChessResult;
use crate::moves::{Move, MoveFlags};
use crate::types::*;

/// Outcome of the position for the side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
}

/// Squares and rights involved in one castling move
struct CastlingPath {
    right: u8,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    /// Squares that must be empty
    between: u64,
    /// Squares the king stands on, crosses or lands on
    king_path: [Square; 3],
}

const CASTLING_PATHS: [[CastlingPath; 2]; 2] = [
    [
        CastlingPath {
            right: CASTLE_WK,
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            between: Square::F1.bb() | Square::G1.bb(),
            king_path: [Square::E1, Square::F1, Square::G1],
        },
        CastlingPath {
            right: CASTLE_WQ,
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            between: Square::D1.bb() | Square::C1.bb() | Square::B1.bb(),
            king_path: [Square::E1, Square::D1, Square::C1],
        },
    ],
    [
        CastlingPath {
            right: CASTLE_BK,
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            between: Square::F8.bb() | Square::G8.bb(),
            king_path: [Square::E8, Square::F8, Square::G8],
        },
        CastlingPath {
            right: CASTLE_BQ,
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            between: Square::D8.bb() | Square::C8.bb() | Square::B8.bb(),
            king_path: [Square::E8, Square::D8, Square::C8],
        },
    ],
];

/// Move generator over the shared attack tables
#[derive(Clone, Copy)]
pub struct MoveGenerator {
    tables: &'static AttackTables,
}

impl MoveGenerator {
    /// Create a move generator over the process-wide tables
    pub fn new() -> ChessResult<Self> {
        Ok(MoveGenerator {
            tables: attack_tables::shared()?,
        })
    }

    /// Create a move generator over caller-owned tables
    pub fn with_tables(tables: &'static AttackTables) -> Self {
        MoveGenerator { tables }
    }

    #[inline]
    pub fn tables(&self) -> &'static AttackTables {
        self.tables
    }

    /// Generate all pseudo-legal moves for `side`.
    ///
    /// Emission order: pawns, castling, knights, bishops, rooks, queens, king.
    pub fn generate_moves(&self, board: &Board, side: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);

        self.generate_pawn_moves(board, side, &mut moves);
        self.generate_castling_moves(board, side, &mut moves);
        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            self.generate_piece_moves(board, side, kind, &mut moves);
        }

        moves
    }

    /// Generate only the pseudo-legal moves that carry the capture flag
    pub fn generate_captures(&self, board: &Board, side: Color) -> Vec<Move> {
        let mut moves = self.generate_moves(board, side);
        moves.retain(|mv| mv.is_capture());
        moves
    }

    /// Generate all legal moves for the side to move
    pub fn generate_legal_moves(&self, board: &Board) -> Vec<Move> {
        self.generate_moves(board, board.side)
            .into_iter()
            .filter(|&mv| self.is_legal(board, mv))
            .collect()
    }

    /// Legal moves of the piece on `sq`, empty if it does not belong to the side to move
    pub fn legal_moves_from(&self, board: &Board, sq: Square) -> Vec<Move> {
        self.generate_legal_moves(board)
            .into_iter()
            .filter(|mv| mv.source() == sq)
            .collect()
    }

    /// Check if a pseudo-legal move leaves the mover's king safe
    pub fn is_legal(&self, board: &Board, mv: Move) -> bool {
        let mut scratch = *board;
        self.make_move(&mut scratch, mv).is_applied()
    }

    /// Check whether the side to move has at least one legal move
    pub fn has_legal_move(&self, board: &Board) -> bool {
        self.generate_moves(board, board.side)
            .into_iter()
            .any(|mv| self.is_legal(board, mv))
    }

    /// Check if a square is attacked by any piece of `by`.
    ///
    /// Each attack pattern is cast from the target square and intersected
    /// with the attacker's pieces of the matching kind.
    pub fn is_square_attacked(&self, board: &Board, sq: Square, by: Color) -> bool {
        let t = self.tables;
        let piece = |kind| board.pieces(Piece::new(kind, by));
        let occupied = board.all_occupancy();

        // A pawn of `by` attacks `sq` if a pawn of the other color on `sq` would attack it back
        if t.pawn_attacks(by.opponent(), sq) & piece(PieceKind::Pawn) != 0 {
            return true;
        }
        if t.knight_attacks(sq) & piece(PieceKind::Knight) != 0 {
            return true;
        }
        if t.bishop_attacks(sq, occupied) & (piece(PieceKind::Bishop) | piece(PieceKind::Queen)) != 0 {
            return true;
        }
        if t.rook_attacks(sq, occupied) & (piece(PieceKind::Rook) | piece(PieceKind::Queen)) != 0 {
            return true;
        }
        t.king_attacks(sq) & piece(PieceKind::King) != 0
    }

    /// Check if the side to move's king is in check
    pub fn is_in_check(&self, board: &Board) -> bool {
        match board.king_square(board.side) {
            Some(king_sq) => self.is_square_attacked(board, king_sq, board.side.opponent()),
            None => false,
        }
    }

    /// Classify the position for the side to move
    pub fn game_status(&self, board: &Board) -> GameStatus {
        if self.has_legal_move(board) {
            GameStatus::Ongoing
        } else if self.is_in_check(board) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    /// Generate pawn pushes, captures, promotions and en passant
    fn generate_pawn_moves(&self, board: &Board, side: Color, moves: &mut Vec<Move>) {
        let pawn = Piece::new(PieceKind::Pawn, side);
        let enemies = board.occupancy(side.opponent());
        let occupied = board.all_occupancy();

        // White moves towards lower square indices
        let (push, start_rank, promotion_rank): (i32, u64, u64) = match side {
            Color::White => (-8, RANK_2, RANK_7),
            Color::Black => (8, RANK_7, RANK_2),
        };

        for source in squares(board.pieces(pawn)) {
            let promotes = source.bb() & promotion_rank != 0;

            // Quiet pushes
            if let Some(target) = Square::from_index((source.index() as i32 + push) as usize) {
                if occupied & target.bb() == 0 {
                    if promotes {
                        push_promotions(moves, source, target, pawn, MoveFlags::QUIET);
                    } else {
                        moves.push(Move::encode(source, target, pawn, None, MoveFlags::QUIET));

                        if source.bb() & start_rank != 0 {
                            let double = Square::from_index((target.index() as i32 + push) as usize);
                            if let Some(double) = double.filter(|d| occupied & d.bb() == 0) {
                                moves.push(Move::encode(source, double, pawn, None, MoveFlags::DOUBLE_PUSH));
                            }
                        }
                    }
                }
            }

            // Captures
            let attacks = self.tables.pawn_attacks(side, source);
            for target in squares(attacks & enemies) {
                if promotes {
                    push_promotions(moves, source, target, pawn, MoveFlags::CAPTURE);
                } else {
                    moves.push(Move::encode(source, target, pawn, None, MoveFlags::CAPTURE));
                }
            }

            // En passant
            if let Some(ep) = board.en_passant {
                if attacks & ep.bb() != 0 {
                    moves.push(Move::encode(source, ep, pawn, None, MoveFlags::EN_PASSANT));
                }
            }
        }
    }

    /// Generate castling moves allowed by rights, empty squares and attacks
    fn generate_castling_moves(&self, board: &Board, side: Color, moves: &mut Vec<Move>) {
        let king = Piece::new(PieceKind::King, side);
        let rook = Piece::new(PieceKind::Rook, side);

        for path in &CASTLING_PATHS[side.index()] {
            if board.castling & path.right == 0
                || board.all_occupancy() & path.between != 0
                || board.pieces(king) & path.king_from.bb() == 0
                || board.pieces(rook) & path.rook_from.bb() == 0
            {
                continue;
            }

            let attacked = path
                .king_path
                .iter()
                .any(|&sq| self.is_square_attacked(board, sq, side.opponent()));
            if !attacked {
                moves.push(Move::encode(path.king_from, path.king_to, king, None, MoveFlags::CASTLING));
            }
        }
    }

    /// Generate table-driven moves for knights, sliders and the king
    fn generate_piece_moves(&self, board: &Board, side: Color, kind: PieceKind, moves: &mut Vec<Move>) {
        let piece = Piece::new(kind, side);
        let own = board.occupancy(side);
        let enemies = board.occupancy(side.opponent());
        let occupied = board.all_occupancy();

        for source in squares(board.pieces(piece)) {
            let attacks = match kind {
                PieceKind::Knight => self.tables.knight_attacks(source),
                PieceKind::Bishop => self.tables.bishop_attacks(source, occupied),
                PieceKind::Rook => self.tables.rook_attacks(source, occupied),
                PieceKind::Queen => self.tables.queen_attacks(source, occupied),
                PieceKind::King => self.tables.king_attacks(source),
                PieceKind::Pawn => 0,
            };

            for target in squares(attacks & !own) {
                let flags = MoveFlags::capture_if(enemies & target.bb() != 0);
                moves.push(Move::encode(source, target, piece, None, flags));
            }
        }
    }
}

/// Push one move per promotion piece
fn push_promotions(moves: &mut Vec<Move>, source: Square, target: Square, pawn: Piece, flags: MoveFlags) {
    for kind in PieceKind::PROMOTIONS {
        let promoted = Piece::new(kind, pawn.color());
        moves.push(Move::encode(source, target, pawn, Some(promoted), flags));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_FEN;

    fn generator() -> MoveGenerator {
        MoveGenerator::new().unwrap()
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let board = Board::from_fen(STARTING_FEN).unwrap();
        let moves = generator().generate_moves(&board, Color::White);
        assert_eq!(moves.len(), 20);
        assert_eq!(moves.iter().filter(|m| m.is_double_push()).count(), 8);
        // Pawns are emitted first
        assert!(moves[..16].iter().all(|m| m.piece() == Piece::WhitePawn));
    }

    #[test]
    fn promotions_emit_four_moves_each() {
        let board = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = generator().generate_moves(&board, Color::White);
        let promotions: Vec<&Move> = moves.iter().filter(|m| m.promotion().is_some()).collect();
        // a7-a8 push and a7xb8 capture
        assert_eq!(promotions.len(), 8);
        assert_eq!(promotions.iter().filter(|m| m.is_capture()).count(), 4);
        assert_eq!(promotions[0].promotion(), Some(Piece::WhiteQueen));
    }

    #[test]
    fn en_passant_is_generated_from_target_square() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = generator().generate_moves(&board, Color::White);
        let ep: Vec<&Move> = moves.iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].source(), Square::E5);
        assert_eq!(ep[0].target(), Square::D6);
        assert!(ep[0].is_capture());
    }

    #[test]
    fn castling_requires_empty_and_safe_path() {
        let g = generator();
        let free = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castles = g.generate_moves(&free, Color::White).into_iter().filter(|m| m.is_castling()).count();
        assert_eq!(castles, 2);

        // Black rook on f8 covers f1: no king-side castling, queen-side remains
        let covered = Board::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
        let targets: Vec<Square> = g
            .generate_moves(&covered, Color::White)
            .into_iter()
            .filter(|m| m.is_castling())
            .map(|m| m.target())
            .collect();
        assert_eq!(targets, vec![Square::C1]);

        // Blocked b1 prevents queen-side castling even though b1 is not on the king's path
        let blocked = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        let targets: Vec<Square> = g
            .generate_moves(&blocked, Color::White)
            .into_iter()
            .filter(|m| m.is_castling())
            .map(|m| m.target())
            .collect();
        assert_eq!(targets, vec![Square::G1]);
    }

    #[test]
    fn attacked_squares_are_detected_for_every_piece_kind() {
        let g = generator();
        let board = Board::from_fen("4k3/8/8/3p4/8/5n2/8/R3K2b w - - 0 1").unwrap();
        assert!(g.is_square_attacked(&board, Square::C4, Color::Black)); // pawn d5
        assert!(g.is_square_attacked(&board, Square::E1, Color::Black)); // knight f3
        assert!(g.is_square_attacked(&board, Square::G2, Color::Black)); // bishop h1
        assert!(g.is_square_attacked(&board, Square::A8, Color::White)); // rook a1
        assert!(g.is_square_attacked(&board, Square::D2, Color::White)); // king e1
        assert!(!g.is_square_attacked(&board, Square::H5, Color::Black));
        assert!(g.is_in_check(&board));
    }

    #[test]
    fn legal_moves_from_filters_by_source() {
        let g = generator();
        let board = Board::new();
        let knight = g.legal_moves_from(&board, Square::G1);
        assert_eq!(knight.len(), 2);
        assert!(g.legal_moves_from(&board, Square::E7).is_empty());
        assert!(g.legal_moves_from(&board, Square::E4).is_empty());
    }

    #[test]
    fn game_status_detects_mate_and_stalemate() {
        let g = generator();
        let mate = Board::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        assert_eq!(g.game_status(&mate), GameStatus::Checkmate);
        let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(g.game_status(&stalemate), GameStatus::Stalemate);
        assert_eq!(g.game_status(&Board::new()), GameStatus::Ongoing);
    }
}
