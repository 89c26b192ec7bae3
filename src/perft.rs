//! Bitmate - Perft
//!
//! Counts the leaf positions reachable through legal moves. The counts for
//! well-known positions are published, which makes this the main check on
//! move generation and make/unmake.

use crate::board::Board;
use crate::move_generator::MoveGenerator;
use crate::moves::Move;

/// Leaf statistics of a perft run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

/// Number of legal move sequences of length `depth`
pub fn perft(generator: &MoveGenerator, board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0u64;
    for mv in generator.generate_moves(board, board.side) {
        let snapshot = board.snapshot();
        if !generator.make_move(board, mv).is_applied() {
            continue;
        }
        nodes += perft(generator, board, depth - 1);
        board.restore(&snapshot);
    }

    nodes
}

/// Perft split by root move, in generation order
pub fn perft_divide(generator: &MoveGenerator, board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    let mut divided = Vec::new();
    if depth == 0 {
        return divided;
    }

    for mv in generator.generate_moves(board, board.side) {
        let snapshot = board.snapshot();
        if !generator.make_move(board, mv).is_applied() {
            continue;
        }
        divided.push((mv, perft(generator, board, depth - 1)));
        board.restore(&snapshot);
    }

    divided
}

/// Perft that also classifies the last move of every sequence
pub fn perft_counts(generator: &MoveGenerator, board: &mut Board, depth: u32) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
    } else {
        count_leaves(generator, board, depth, &mut counts);
    }
    counts
}

fn count_leaves(generator: &MoveGenerator, board: &mut Board, depth: u32, counts: &mut PerftCounts) {
    for mv in generator.generate_moves(board, board.side) {
        let snapshot = board.snapshot();
        if !generator.make_move(board, mv).is_applied() {
            continue;
        }

        if depth == 1 {
            counts.nodes += 1;
            counts.captures += mv.is_capture() as u64;
            counts.en_passant += mv.is_en_passant() as u64;
            counts.castles += mv.is_castling() as u64;
            counts.promotions += mv.promotion().is_some() as u64;
            counts.checks += generator.is_in_check(board) as u64;
        } else {
            count_leaves(generator, board, depth - 1, counts);
        }

        board.restore(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_counts_the_root() {
        let g = MoveGenerator::new().unwrap();
        let mut board = Board::new();
        assert_eq!(perft(&g, &mut board, 0), 1);
        assert_eq!(perft_counts(&g, &mut board, 0).nodes, 1);
        assert!(perft_divide(&g, &mut board, 0).is_empty());
    }

    #[test]
    fn divide_sums_to_perft() {
        let g = MoveGenerator::new().unwrap();
        let mut board = Board::new();
        let divided = perft_divide(&g, &mut board, 2);
        assert_eq!(divided.len(), 20);
        assert!(divided.iter().all(|&(_, n)| n == 20));
        assert_eq!(divided.iter().map(|&(_, n)| n).sum::<u64>(), perft(&g, &mut board, 2));
    }

    #[test]
    fn kiwipete_leaf_statistics() {
        let g = MoveGenerator::new().unwrap();
        let mut board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        let counts = perft_counts(&g, &mut board, 2);
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 2039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
            }
        );
    }
}
