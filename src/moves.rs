//! Bitmate - Move encoding
//!
//! A move is packed into one `u32`:
//!
//! ```text
//! bits  0..6   source square
//! bits  6..12  target square
//! bits 12..16  moving piece
//! bits 16..20  promotion piece (0 = none)
//! bit  20      capture
//! bit  21      double pawn push
//! bit  22      en passant
//! bit  23      castling
//! ```
//!
//! Index 0 is the white pawn, which can never be a promotion piece, so it
//! doubles as "no promotion".

use std::fmt;

use crate::error::{ChessError, ChessResult};
use crate::types::{Piece, PieceKind, Square};

const SQUARE_MASK: u32 = 0x3f;
const TARGET_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const PROMOTION_SHIFT: u32 = 16;
const NIBBLE_MASK: u32 = 0xf;

const CAPTURE_FLAG: u32 = 1 << 20;
const DOUBLE_PUSH_FLAG: u32 = 1 << 21;
const EN_PASSANT_FLAG: u32 = 1 << 22;
const CASTLING_FLAG: u32 = 1 << 23;

const USED_BITS: u32 = 0x00ff_ffff;

/// The only king moves that may carry the castling flag
const CASTLING_MOVES: [(Piece, Square, Square); 4] = [
    (Piece::WhiteKing, Square::E1, Square::G1),
    (Piece::WhiteKing, Square::E1, Square::C1),
    (Piece::BlackKing, Square::E8, Square::G8),
    (Piece::BlackKing, Square::E8, Square::C8),
];

/// The four boolean move properties
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveFlags {
    pub capture: bool,
    pub double_push: bool,
    pub en_passant: bool,
    pub castling: bool,
}

impl MoveFlags {
    pub const QUIET: MoveFlags = MoveFlags {
        capture: false,
        double_push: false,
        en_passant: false,
        castling: false,
    };
    pub const CAPTURE: MoveFlags = MoveFlags { capture: true, ..MoveFlags::QUIET };
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags { double_push: true, ..MoveFlags::QUIET };
    pub const EN_PASSANT: MoveFlags = MoveFlags {
        capture: true,
        en_passant: true,
        ..MoveFlags::QUIET
    };
    pub const CASTLING: MoveFlags = MoveFlags { castling: true, ..MoveFlags::QUIET };

    /// Quiet move or capture depending on `capture`
    #[inline]
    pub const fn capture_if(capture: bool) -> MoveFlags {
        MoveFlags { capture, ..MoveFlags::QUIET }
    }
}

/// Every field of a move, unpacked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedMove {
    pub source: Square,
    pub target: Square,
    pub piece: Piece,
    pub promotion: Option<Piece>,
    pub flags: MoveFlags,
}

/// A packed move. Only `encode` and the validating `TryFrom<u32>` create one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Pack the move fields into a single integer
    #[inline]
    pub fn encode(
        source: Square,
        target: Square,
        piece: Piece,
        promotion: Option<Piece>,
        flags: MoveFlags,
    ) -> Move {
        let mut raw = source.index() as u32
            | (target.index() as u32) << TARGET_SHIFT
            | (piece.index() as u32) << PIECE_SHIFT
            | (promotion.map_or(0, |p| p.index() as u32)) << PROMOTION_SHIFT;

        if flags.capture { raw |= CAPTURE_FLAG; }
        if flags.double_push { raw |= DOUBLE_PUSH_FLAG; }
        if flags.en_passant { raw |= EN_PASSANT_FLAG; }
        if flags.castling { raw |= CASTLING_FLAG; }

        debug_assert!(is_well_formed(raw), "inconsistent move fields: {raw:#x}");
        Move(raw)
    }

    /// Unpack every field
    pub fn decode(self) -> DecodedMove {
        DecodedMove {
            source: self.source(),
            target: self.target(),
            piece: self.piece(),
            promotion: self.promotion(),
            flags: self.flags(),
        }
    }

    /// Validate and wrap a packed integer
    pub fn from_raw(raw: u32) -> ChessResult<Move> {
        if is_well_formed(raw) {
            Ok(Move(raw))
        } else {
            Err(ChessError::InvalidMoveEncoding(raw))
        }
    }

    /// The packed integer
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn source(self) -> Square {
        Square::ALL[(self.0 & SQUARE_MASK) as usize]
    }

    #[inline]
    pub fn target(self) -> Square {
        Square::ALL[((self.0 >> TARGET_SHIFT) & SQUARE_MASK) as usize]
    }

    #[inline]
    pub fn piece(self) -> Piece {
        Piece::ALL[((self.0 >> PIECE_SHIFT) & NIBBLE_MASK) as usize]
    }

    #[inline]
    pub fn promotion(self) -> Option<Piece> {
        match ((self.0 >> PROMOTION_SHIFT) & NIBBLE_MASK) as usize {
            0 => None,
            index => Piece::from_index(index),
        }
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & CAPTURE_FLAG != 0
    }

    #[inline]
    pub fn is_double_push(self) -> bool {
        self.0 & DOUBLE_PUSH_FLAG != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & EN_PASSANT_FLAG != 0
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.0 & CASTLING_FLAG != 0
    }

    pub fn flags(self) -> MoveFlags {
        MoveFlags {
            capture: self.is_capture(),
            double_push: self.is_double_push(),
            en_passant: self.is_en_passant(),
            castling: self.is_castling(),
        }
    }

    /// Convert move to coordinate notation (e.g., "e2e4", "e7e8q")
    pub fn to_uci(self) -> String {
        let mut uci = format!("{}{}", self.source(), self.target());
        if let Some(promotion) = self.promotion() {
            uci.push(promotion.to_fen_char().to_ascii_lowercase());
        }
        uci
    }
}

/// Field consistency shared by `encode` and `from_raw`
fn is_well_formed(raw: u32) -> bool {
    if raw & !USED_BITS != 0 {
        return false;
    }

    let source = (raw & SQUARE_MASK) as usize;
    let target = ((raw >> TARGET_SHIFT) & SQUARE_MASK) as usize;
    if source == target {
        return false;
    }

    let Some(piece) = Piece::from_index(((raw >> PIECE_SHIFT) & NIBBLE_MASK) as usize) else {
        return false;
    };
    let is_pawn = piece.kind() == PieceKind::Pawn;
    let capture = raw & CAPTURE_FLAG != 0;

    let promotion = ((raw >> PROMOTION_SHIFT) & NIBBLE_MASK) as usize;
    if promotion != 0 {
        let valid = Piece::from_index(promotion).is_some_and(|promoted| {
            is_pawn && promoted.color() == piece.color() && PieceKind::PROMOTIONS.contains(&promoted.kind())
        });
        if !valid {
            return false;
        }
    }

    if raw & EN_PASSANT_FLAG != 0 && !(is_pawn && capture) {
        return false;
    }
    if raw & DOUBLE_PUSH_FLAG != 0 && !(is_pawn && !capture) {
        return false;
    }
    if raw & CASTLING_FLAG != 0 {
        let castles = !capture
            && CASTLING_MOVES
                .iter()
                .any(|&(king, from, to)| king == piece && from.index() == source && to.index() == target);
        if !castles {
            return false;
        }
    }

    true
}

impl TryFrom<u32> for Move {
    type Error = ChessError;

    fn try_from(raw: u32) -> ChessResult<Move> {
        Move::from_raw(raw)
    }
}

impl From<Move> for u32 {
    fn from(mv: Move) -> u32 {
        mv.0
    }
}

impl From<DecodedMove> for Move {
    fn from(fields: DecodedMove) -> Move {
        Move::encode(fields.source, fields.target, fields.piece, fields.promotion, fields.flags)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_packs_fields_at_fixed_offsets() {
        let mv = Move::encode(Square::E2, Square::E4, Piece::WhitePawn, None, MoveFlags::DOUBLE_PUSH);
        assert_eq!(mv.raw(), 52 | (36 << 6) | (1 << 21));
        assert_eq!(mv.to_uci(), "e2e4");
    }

    #[test]
    fn decode_recovers_every_field() {
        let mv = Move::encode(
            Square::B7,
            Square::A8,
            Piece::WhitePawn,
            Some(Piece::WhiteKnight),
            MoveFlags::CAPTURE,
        );
        let fields = mv.decode();
        assert_eq!(fields.source, Square::B7);
        assert_eq!(fields.target, Square::A8);
        assert_eq!(fields.piece, Piece::WhitePawn);
        assert_eq!(fields.promotion, Some(Piece::WhiteKnight));
        assert_eq!(fields.flags, MoveFlags::CAPTURE);
        assert_eq!(Move::from(fields), mv);
        assert_eq!(Move::try_from(mv.raw()), Ok(mv));
        assert_eq!(mv.to_string(), "b7a8n");
    }

    #[test]
    fn moves_differing_in_one_flag_are_distinct() {
        let quiet = Move::encode(Square::E1, Square::G1, Piece::WhiteKing, None, MoveFlags::QUIET);
        let castle = Move::encode(Square::E1, Square::G1, Piece::WhiteKing, None, MoveFlags::CASTLING);
        assert_ne!(quiet, castle);
        assert!(castle.is_castling());
        assert!(!quiet.is_castling());
    }

    #[test]
    fn foreign_integers_are_rejected() {
        let pawn_push = Move::encode(Square::E2, Square::E3, Piece::WhitePawn, None, MoveFlags::QUIET).raw();
        let king_step = Move::encode(Square::E1, Square::E2, Piece::WhiteKing, None, MoveFlags::QUIET).raw();
        let castle_e1g1 = Move::encode(Square::E1, Square::G1, Piece::WhiteKing, None, MoveFlags::CASTLING).raw();
        let rejected = [
            1 << 24,                                 // bits above the encoding
            52 | (52 << 6),                          // source == target
            pawn_push | (12 << 12),                  // piece index 12
            pawn_push | (Piece::BlackQueen.index() as u32) << 16, // wrong-color promotion
            pawn_push | (Piece::WhiteKing.index() as u32) << 16,  // king promotion
            pawn_push | EN_PASSANT_FLAG,             // en passant without capture
            pawn_push | CASTLING_FLAG,               // castling pawn
            king_step | CASTLING_FLAG,               // castling king on a one-square step
            (castle_e1g1 & !(0xf << 12)) | (Piece::BlackKing.index() as u32) << 12, // black king from e1
            castle_e1g1 | CAPTURE_FLAG,              // castling capture
        ];
        for raw in rejected {
            assert_eq!(Move::from_raw(raw), Err(ChessError::InvalidMoveEncoding(raw)));
        }
    }

    #[test]
    fn every_castle_is_accepted() {
        for (king, from, to) in CASTLING_MOVES {
            let mv = Move::encode(from, to, king, None, MoveFlags::CASTLING);
            assert_eq!(Move::from_raw(mv.raw()), Ok(mv));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "inconsistent move fields")]
    fn encode_refuses_en_passant_without_capture() {
        let flags = MoveFlags { en_passant: true, ..MoveFlags::QUIET };
        let _ = Move::encode(Square::E5, Square::D6, Piece::WhitePawn, None, flags);
    }
}
