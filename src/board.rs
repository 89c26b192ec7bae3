//! Bitmate - Board Representation Module
//!
//! The position is twelve piece bitboards plus three occupancy bitboards
//! derived from them, the side to move, castling rights and the en-passant
//! target. Everything is `Copy`, so a snapshot is a plain value copy.

use std::fmt;

use crate::bitboard::{lsb, RANK_1, RANK_2, RANK_7, RANK_8};
use crate::error::{ChessError, ChessResult};
use crate::types::*;

/// Starting position FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Index of the combined occupancy in `Board::occupancies`
pub const BOTH: usize = 2;

/// Chess position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    /// One plane per piece, indexed by `Piece::index()`
    pub bitboards: [u64; 12],
    /// White, black and combined occupancy
    pub occupancies: [u64; 3],
    /// Side to move
    pub side: Color,
    /// Bitmask for castling rights (1=K, 2=Q, 4=k, 8=q)
    pub castling: u8,
    /// Square a pawn may capture onto en passant on the next move
    pub en_passant: Option<Square>,
}

/// Independent copy of every board field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardSnapshot(Board);

impl Board {
    /// A board with no pieces, white to move and no rights
    pub fn empty() -> Self {
        Board {
            bitboards: [0; 12],
            occupancies: [0; 3],
            side: Color::White,
            castling: 0,
            en_passant: None,
        }
    }

    /// The standard starting position
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            (PieceKind::Rook, [Square::A1, Square::H1]),
            (PieceKind::Knight, [Square::B1, Square::G1]),
            (PieceKind::Bishop, [Square::C1, Square::F1]),
        ];

        for (kind, squares) in back_rank {
            for sq in squares {
                board.bitboards[piece_index(kind, Color::White)] |= sq.bb();
                board.bitboards[piece_index(kind, Color::Black)] |= sq.mirror().bb();
            }
        }
        board.bitboards[Piece::WhiteQueen.index()] = Square::D1.bb();
        board.bitboards[Piece::BlackQueen.index()] = Square::D8.bb();
        board.bitboards[Piece::WhiteKing.index()] = Square::E1.bb();
        board.bitboards[Piece::BlackKing.index()] = Square::E8.bb();
        board.bitboards[Piece::WhitePawn.index()] = RANK_2;
        board.bitboards[Piece::BlackPawn.index()] = RANK_7;
        board.castling = CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ;
        board.update_occupancies();

        debug_assert_eq!(board.occupancies[BOTH], RANK_1 | RANK_2 | RANK_7 | RANK_8);
        board
    }

    /// Parse the first four FEN fields into a fresh board.
    ///
    /// Placement and side to move are required. Missing castling or
    /// en-passant fields mean "none"; anything after the fourth field is ignored.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(ChessError::malformed(fen, "expected placement and side to move"));
        }

        let mut board = Board::empty();

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::malformed(
                fen,
                format!("expected 8 ranks, found {}", ranks.len()),
            ));
        }

        for (rank, row) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    let sq = Square::from_coords(rank, file).ok_or_else(|| {
                        ChessError::malformed(fen, format!("rank {} has more than 8 files", 8 - rank))
                    })?;
                    board.bitboards[piece.index()] |= sq.bb();
                    file += 1;
                } else {
                    return Err(ChessError::malformed(fen, format!("unrecognized character `{c}`")));
                }
            }
            if file != 8 {
                return Err(ChessError::malformed(
                    fen,
                    format!("rank {} describes {} files", 8 - rank, file),
                ));
            }
        }

        // Active color
        board.side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::malformed(fen, format!("unknown side to move `{other}`")))
            }
        };

        // Castling rights
        if let Some(&rights) = parts.get(2).filter(|&&r| r != "-") {
            for c in rights.chars() {
                board.castling |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => {
                        return Err(ChessError::malformed(fen, format!("unknown castling right `{c}`")))
                    }
                };
            }
        }

        // En passant square
        if let Some(&ep) = parts.get(3).filter(|&&e| e != "-") {
            let sq = ep
                .parse::<Square>()
                .map_err(|_| ChessError::malformed(fen, format!("bad en passant square `{ep}`")))?;
            board.en_passant = Some(sq);
        }

        board.update_occupancies();
        Ok(board)
    }

    /// Generate a FEN string from the current position
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in 0..8 {
            let mut empty_count = 0;
            for file in 0..8 {
                match Square::from_coords(rank, file).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling == 0 {
            fen.push('-');
        } else {
            if self.castling & CASTLE_WK != 0 { fen.push('K'); }
            if self.castling & CASTLE_WQ != 0 { fen.push('Q'); }
            if self.castling & CASTLE_BK != 0 { fen.push('k'); }
            if self.castling & CASTLE_BQ != 0 { fen.push('q'); }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.name()),
            None => fen.push('-'),
        }

        fen.push_str(" 0 1");
        fen
    }

    /// Copy every field for a later `restore`
    #[inline]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot(*self)
    }

    /// Overwrite every field from a snapshot
    #[inline]
    pub fn restore(&mut self, snapshot: &BoardSnapshot) {
        *self = snapshot.0;
    }

    /// Recompute the three occupancy planes from the piece planes
    pub fn update_occupancies(&mut self) {
        let white: u64 = self.bitboards[..6].iter().fold(0, |acc, bb| acc | bb);
        let black: u64 = self.bitboards[6..].iter().fold(0, |acc, bb| acc | bb);
        self.occupancies = [white, black, white | black];
    }

    #[inline]
    pub fn pieces(&self, piece: Piece) -> u64 {
        self.bitboards[piece.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancies[color.index()]
    }

    #[inline]
    pub fn all_occupancy(&self) -> u64 {
        self.occupancies[BOTH]
    }

    /// Piece standing on `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|piece| self.bitboards[piece.index()] & sq.bb() != 0)
    }

    /// Find the king's square for the specified color
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        lsb(self.pieces(Piece::new(PieceKind::King, color)))
    }

    /// Check the plane invariants: disjoint piece planes and consistent occupancies
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0u64;
        for bb in self.bitboards {
            if seen & bb != 0 {
                return false;
            }
            seen |= bb;
        }

        let mut expected = *self;
        expected.update_occupancies();
        expected.occupancies == self.occupancies
            && self.occupancies[0] & self.occupancies[1] == 0
    }

    /// Display the board as a string, rank 8 on top
    pub fn display(&self) -> String {
        let mut lines = Vec::new();
        lines.push("  +---+---+---+---+---+---+---+---+".to_string());

        for rank in 0..8 {
            let mut row = format!("{} |", 8 - rank);
            for file in 0..8 {
                match Square::from_coords(rank, file).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => row.push_str(&format!(" {} |", piece.to_fen_char())),
                    None => row.push_str("   |"),
                }
            }
            lines.push(row);
            lines.push("  +---+---+---+---+---+---+---+---+".to_string());
        }
        lines.push("    a   b   c   d   e   f   g   h".to_string());

        lines.join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_matches_fen() {
        let parsed = Board::from_fen(STARTING_FEN).unwrap();
        assert_eq!(parsed, Board::new());
        assert_eq!(parsed.to_fen(), STARTING_FEN);
        assert!(parsed.is_consistent());
    }

    #[test]
    fn fen_fields_are_parsed() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K2R w Kq d6 0 1").unwrap();
        assert_eq!(board.side, Color::White);
        assert_eq!(board.castling, CASTLE_WK | CASTLE_BQ);
        assert_eq!(board.en_passant, Some(Square::D6));
        assert_eq!(board.piece_at(Square::E5), Some(Piece::WhitePawn));
        assert_eq!(board.piece_at(Square::D5), Some(Piece::BlackPawn));
        assert_eq!(board.piece_at(Square::H1), Some(Piece::WhiteRook));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board.piece_at(Square::E4), None);
    }

    #[test]
    fn optional_fields_default_to_none() {
        let board = Board::from_fen("8/8/8/8/8/8/8/K6k b").unwrap();
        assert_eq!(board.side, Color::Black);
        assert_eq!(board.castling, 0);
        assert_eq!(board.en_passant, None);
    }

    #[test]
    fn malformed_placements_are_rejected() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8 w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "",
        ] {
            assert!(
                matches!(Board::from_fen(fen), Err(ChessError::MalformedPosition { .. })),
                "{fen}"
            );
        }
    }

    #[test]
    fn snapshot_restores_every_field() {
        let mut board = Board::new();
        let snapshot = board.snapshot();
        board.bitboards[Piece::WhitePawn.index()] = 0;
        board.side = Color::Black;
        board.castling = 0;
        board.en_passant = Some(Square::E3);
        board.update_occupancies();
        board.restore(&snapshot);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn display_puts_rank_eight_on_top() {
        let text = Board::new().display();
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with("8 | r |"));
    }
}
