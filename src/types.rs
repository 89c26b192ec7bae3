//! Bitmate - Type definitions and constants
//!
//! This module provides the vocabulary shared by every other module:
//! colors, piece kinds, the twelve colored pieces and the 64 board squares.
//!
//! Squares are numbered rank-major from the top-left of the printed board,
//! so `a8 = 0`, `h8 = 7` and `h1 = 63`.

use std::fmt;
use std::str::FromStr;

use crate::error::ChessError;

/// Side to move / owner of a piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Piece kind without color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may promote to, in emission order
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Index of a colored piece in the twelve piece planes.
///
/// White pieces occupy `0..6` and black pieces `6..12`, each block ordered
/// pawn, knight, bishop, rook, queen, king.
#[inline]
pub const fn piece_index(kind: PieceKind, color: Color) -> usize {
    kind.index() + 6 * color.index()
}

/// One of the twelve piece-kind/color combinations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
    WhitePawn = 0,
    WhiteKnight = 1,
    WhiteBishop = 2,
    WhiteRook = 3,
    WhiteQueen = 4,
    WhiteKing = 5,
    BlackPawn = 6,
    BlackKnight = 7,
    BlackBishop = 8,
    BlackRook = 9,
    BlackQueen = 10,
    BlackKing = 11,
}

impl Piece {
    pub const ALL: [Piece; 12] = [
        Piece::WhitePawn,
        Piece::WhiteKnight,
        Piece::WhiteBishop,
        Piece::WhiteRook,
        Piece::WhiteQueen,
        Piece::WhiteKing,
        Piece::BlackPawn,
        Piece::BlackKnight,
        Piece::BlackBishop,
        Piece::BlackRook,
        Piece::BlackQueen,
        Piece::BlackKing,
    ];

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece::ALL[piece_index(kind, color)]
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Piece> {
        if index < 12 {
            Some(Piece::ALL[index])
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        PieceKind::ALL[self.index() % 6]
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.index() < 6 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// FEN piece character to piece (upper case = white)
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(kind, color))
    }

    /// Piece to FEN character
    pub fn to_fen_char(self) -> char {
        let c = match self.kind() {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

/// Castling rights bitmasks
pub const CASTLE_WK: u8 = 1; // White kingside
pub const CASTLE_WQ: u8 = 2; // White queenside
pub const CASTLE_BK: u8 = 4; // Black kingside
pub const CASTLE_BQ: u8 = 8; // Black queenside

/// File names for algebraic notation
pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";

/// A board square, `a8 = 0` through `h1 = 63`
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

impl Square {
    #[rustfmt::skip]
    pub const ALL: [Square; 64] = {
        use Square::*;
        [
            A8, B8, C8, D8, E8, F8, G8, H8,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A1, B1, C1, D1, E1, F1, G1, H1,
        ]
    };

    #[inline]
    pub const fn from_index(index: usize) -> Option<Square> {
        if index < 64 {
            Some(Square::ALL[index])
        } else {
            None
        }
    }

    /// Square from internal rank (0 = rank 8) and file (0 = a-file)
    #[inline]
    pub const fn from_coords(rank: usize, file: usize) -> Option<Square> {
        if rank < 8 && file < 8 {
            Some(Square::ALL[rank * 8 + file])
        } else {
            None
        }
    }

    /// Square from on-screen coordinates where screen rank 0 is the bottom row.
    #[inline]
    pub const fn from_screen(file: usize, screen_rank: usize) -> Option<Square> {
        if screen_rank < 8 {
            Square::from_coords(7 - screen_rank, file)
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn rank(self) -> usize {
        self.index() / 8
    }

    #[inline]
    pub const fn file(self) -> usize {
        self.index() % 8
    }

    /// Rank as drawn on screen, 0 = bottom row (white's back rank)
    #[inline]
    pub const fn screen_rank(self) -> usize {
        7 - self.rank()
    }

    /// Single-bit bitboard of this square
    #[inline]
    pub const fn bb(self) -> u64 {
        1u64 << self.index()
    }

    /// Same file, rank reflected across the board's horizontal midline
    #[inline]
    pub const fn mirror(self) -> Square {
        Square::ALL[self.index() ^ 56]
    }

    /// Algebraic name, e.g. "e4"
    pub fn name(self) -> String {
        format!("{}{}", FILE_NAMES[self.file()] as char, 8 - self.rank())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    /// Parse algebraic notation such as "e4"
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let bytes = name.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(name.to_string()));
        }

        let file = match bytes[0] {
            b'a'..=b'h' => (bytes[0] - b'a') as usize,
            _ => return Err(ChessError::InvalidSquare(name.to_string())),
        };
        let rank = match bytes[1] {
            b'1'..=b'8' => 7 - (bytes[1] - b'1') as usize,
            _ => return Err(ChessError::InvalidSquare(name.to_string())),
        };

        Square::from_coords(rank, file).ok_or_else(|| ChessError::InvalidSquare(name.to_string()))
    }
}
