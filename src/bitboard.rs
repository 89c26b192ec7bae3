//! Bitmate - Bitboard Module
//!
//! This module provides bitboard utilities and the attack primitives the
//! attack tables are built from. A bitboard is a 64-bit integer where bit `i`
//! stands for square `i` (`a8 = 0`, `h1 = 63`).

use crate::types::{Color, Square};

// ============================================================================
// CONSTANTS - Files and Ranks
// ============================================================================

pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_B: u64 = 0x0202020202020202;
pub const FILE_G: u64 = 0x4040404040404040;
pub const FILE_H: u64 = 0x8080808080808080;

pub const RANK_8: u64 = 0x00000000000000FF;
pub const RANK_7: u64 = 0x000000000000FF00;
pub const RANK_2: u64 = 0x00FF000000000000;
pub const RANK_1: u64 = 0xFF00000000000000;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;
pub const NOT_FILE_AB: u64 = !(FILE_A | FILE_B);
pub const NOT_FILE_GH: u64 = !(FILE_G | FILE_H);

const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// ============================================================================
// LEAPER ATTACKS
// ============================================================================

/// Squares attacked by a pawn of `color` standing on `sq`
pub const fn pawn_attack_mask(color: Color, sq: Square) -> u64 {
    let bb = sq.bb();
    let mut attacks = 0u64;

    match color {
        // White pawns move towards rank 8, i.e. towards lower indices
        Color::White => {
            if bb & NOT_FILE_A != 0 {
                attacks |= bb >> 9;
            }
            if bb & NOT_FILE_H != 0 {
                attacks |= bb >> 7;
            }
        }
        Color::Black => {
            if bb & NOT_FILE_A != 0 {
                attacks |= bb << 7;
            }
            if bb & NOT_FILE_H != 0 {
                attacks |= bb << 9;
            }
        }
    }

    attacks
}

/// Squares attacked by a knight on `sq`
pub const fn knight_attack_mask(sq: Square) -> u64 {
    let bb = sq.bb();
    let mut attacks = 0u64;

    // 2 up 1 left / 2 up 1 right
    attacks |= (bb >> 17) & NOT_FILE_H;
    attacks |= (bb >> 15) & NOT_FILE_A;
    // 1 up 2 left / 1 up 2 right
    attacks |= (bb >> 10) & NOT_FILE_GH;
    attacks |= (bb >> 6) & NOT_FILE_AB;
    // 2 down 1 right / 2 down 1 left
    attacks |= (bb << 17) & NOT_FILE_A;
    attacks |= (bb << 15) & NOT_FILE_H;
    // 1 down 2 right / 1 down 2 left
    attacks |= (bb << 10) & NOT_FILE_AB;
    attacks |= (bb << 6) & NOT_FILE_GH;

    attacks
}

/// Squares attacked by a king on `sq`
pub const fn king_attack_mask(sq: Square) -> u64 {
    let bb = sq.bb();
    let mut attacks = (bb << 8) | (bb >> 8);

    if bb & NOT_FILE_A != 0 {
        attacks |= (bb >> 1) | (bb >> 9) | (bb << 7);
    }
    if bb & NOT_FILE_H != 0 {
        attacks |= (bb << 1) | (bb >> 7) | (bb << 9);
    }

    attacks
}

// ============================================================================
// SLIDER RAYS
// ============================================================================

#[inline]
fn on_board(rank: i32, file: i32) -> bool {
    (0..8).contains(&rank) && (0..8).contains(&file)
}

/// Rays from `sq` that stop one square before the board edge
fn relevance_mask(sq: Square, directions: &[(i32, i32)]) -> u64 {
    let (rank, file) = (sq.rank() as i32, sq.file() as i32);
    let mut mask = 0u64;

    for &(dr, df) in directions {
        let (mut r, mut f) = (rank + dr, file + df);
        while on_board(r, f) && on_board(r + dr, f + df) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }

    mask
}

/// Rays from `sq` that stop at, and include, the first blocker
fn ray_attacks(sq: Square, block: u64, directions: &[(i32, i32)]) -> u64 {
    let (rank, file) = (sq.rank() as i32, sq.file() as i32);
    let mut attacks = 0u64;

    for &(dr, df) in directions {
        let (mut r, mut f) = (rank + dr, file + df);
        while on_board(r, f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if bit & block != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }

    attacks
}

/// Relevant blocker squares for a bishop on `sq`
pub fn bishop_relevance_mask(sq: Square) -> u64 {
    relevance_mask(sq, &BISHOP_DIRECTIONS)
}

/// Relevant blocker squares for a rook on `sq`
pub fn rook_relevance_mask(sq: Square) -> u64 {
    relevance_mask(sq, &ROOK_DIRECTIONS)
}

/// Bishop attacks computed by walking the rays
pub fn bishop_attacks_on_the_fly(sq: Square, block: u64) -> u64 {
    ray_attacks(sq, block, &BISHOP_DIRECTIONS)
}

/// Rook attacks computed by walking the rays
pub fn rook_attacks_on_the_fly(sq: Square, block: u64) -> u64 {
    ray_attacks(sq, block, &ROOK_DIRECTIONS)
}

/// The `index`-th subset of `mask`: bit `k` of `index` selects the `k`-th set bit of `mask`.
pub fn set_occupancy(index: usize, mut mask: u64) -> u64 {
    let mut occupancy = 0u64;
    let mut count = 0;

    while mask != 0 {
        let sq = pop_lsb(&mut mask);
        if index & (1 << count) != 0 {
            occupancy |= 1u64 << sq;
        }
        count += 1;
    }

    occupancy
}

// ============================================================================
// BITBOARD UTILITIES
// ============================================================================

/// Extract and clear the least significant bit, returning its index
#[inline]
pub fn pop_lsb(bb: &mut u64) -> usize {
    let idx = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    idx
}

/// Get the index of the least significant bit
#[inline]
pub fn lsb(bb: u64) -> Option<Square> {
    Square::from_index(bb.trailing_zeros() as usize)
}

/// Iterate over the squares set in a bitboard, lowest index first
#[inline]
pub fn squares(bb: u64) -> Squares {
    Squares(bb)
}

pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        Square::from_index(pop_lsb(&mut self.0))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

// ============================================================================
// DEBUG / DISPLAY
// ============================================================================

/// Render a bitboard as an 8x8 grid with rank 8 on top
pub fn render(bb: u64) -> String {
    let mut out = String::new();

    for rank in 0..8 {
        out.push_str(&format!("{}  ", 8 - rank));
        for file in 0..8 {
            let sq = rank * 8 + file;
            out.push_str(if bb & (1u64 << sq) != 0 { "1 " } else { ". " });
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");
    out.push_str(&format!("   Bitboard: 0x{:016X}", bb));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_attacks_do_not_wrap() {
        assert_eq!(knight_attack_mask(Square::D4).count_ones(), 8);
        assert_eq!(
            knight_attack_mask(Square::A8),
            Square::B6.bb() | Square::C7.bb()
        );
        assert_eq!(
            knight_attack_mask(Square::H1),
            Square::G3.bb() | Square::F2.bb()
        );
    }

    #[test]
    fn king_attacks_in_corner_and_center() {
        assert_eq!(king_attack_mask(Square::E4).count_ones(), 8);
        assert_eq!(
            king_attack_mask(Square::H8),
            Square::G8.bb() | Square::G7.bb() | Square::H7.bb()
        );
    }

    #[test]
    fn pawn_attacks_point_forward() {
        assert_eq!(
            pawn_attack_mask(Color::White, Square::E2),
            Square::D3.bb() | Square::F3.bb()
        );
        assert_eq!(
            pawn_attack_mask(Color::Black, Square::E7),
            Square::D6.bb() | Square::F6.bb()
        );
        assert_eq!(pawn_attack_mask(Color::White, Square::A2), Square::B3.bb());
        assert_eq!(pawn_attack_mask(Color::Black, Square::H7), Square::G6.bb());
    }

    #[test]
    fn relevance_masks_have_expected_sizes() {
        assert_eq!(rook_relevance_mask(Square::A8).count_ones(), 12);
        assert_eq!(rook_relevance_mask(Square::E4).count_ones(), 10);
        assert_eq!(bishop_relevance_mask(Square::A8).count_ones(), 6);
        assert_eq!(bishop_relevance_mask(Square::D4).count_ones(), 9);
    }

    #[test]
    fn rays_stop_at_first_blocker() {
        let block = Square::E6.bb() | Square::C4.bb();
        let attacks = rook_attacks_on_the_fly(Square::E4, block);
        assert_ne!(attacks & Square::E6.bb(), 0);
        assert_eq!(attacks & Square::E7.bb(), 0);
        assert_ne!(attacks & Square::C4.bb(), 0);
        assert_eq!(attacks & Square::B4.bb(), 0);
        assert_ne!(attacks & Square::E1.bb(), 0);
        assert_ne!(attacks & Square::H4.bb(), 0);
    }

    #[test]
    fn set_occupancy_enumerates_every_subset() {
        let mask = Square::B2.bb() | Square::C3.bb() | Square::G7.bb();
        let subsets: Vec<u64> = (0..8).map(|i| set_occupancy(i, mask)).collect();
        assert_eq!(subsets[0], 0);
        assert_eq!(subsets[7], mask);
        for (i, a) in subsets.iter().enumerate() {
            assert_eq!(a & !mask, 0);
            assert!(subsets[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn squares_iterates_low_to_high() {
        let bb = Square::H1.bb() | Square::A8.bb() | Square::E4.bb();
        let found: Vec<Square> = squares(bb).collect();
        assert_eq!(found, vec![Square::A8, Square::E4, Square::H1]);
    }
}
