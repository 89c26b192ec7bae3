use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use bitmate::board::Board;
use bitmate::move_generator::MoveGenerator;
use bitmate::move_applier::ApplyResult;
use bitmate::moves::Move;
use bitmate::types::{Color, Piece, Square};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

#[test]
fn every_pseudo_legal_attempt_restores_exactly() {
    let generator = MoveGenerator::new().unwrap();

    for fen in POSITIONS {
        let mut board = Board::from_fen(fen).unwrap();
        let before = board;

        for mv in generator.generate_moves(&board, board.side) {
            let snapshot = board.snapshot();
            match generator.make_move(&mut board, mv) {
                ApplyResult::Applied => {
                    assert!(board.is_consistent(), "{fen} after {mv}");
                    board.restore(&snapshot);
                }
                // A rejected move must already have restored the board
                _ => assert_eq!(board, before, "{fen} rejected {mv}"),
            }
            assert_eq!(board, before, "{fen} after undoing {mv}");
        }
    }
}

#[test]
fn random_games_keep_occupancy_invariant() {
    let generator = MoveGenerator::new().unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    for _game in 0..20 {
        let mut board = Board::new();
        let mut history: Vec<(Board, Move)> = Vec::new();

        for _ply in 0..120 {
            let moves = generator.generate_legal_moves(&board);
            let Some(&mv) = moves.choose(&mut rng) else {
                break;
            };
            let before = board;
            assert_eq!(generator.make_move(&mut board, mv), ApplyResult::Applied);

            let all = board.all_occupancy();
            let (white, black) = (board.occupancy(Color::White), board.occupancy(Color::Black));
            assert_eq!(all, white | black);
            assert_eq!(white & black, 0);
            assert!(board.is_consistent());
            assert_eq!(board.side, before.side.opponent());
            history.push((before, mv));
        }

        // Replaying the snapshots backwards walks back to the start
        while let Some((before, _)) = history.pop() {
            board.restore(&before.snapshot());
        }
        assert_eq!(board, Board::new());
    }
}

#[test]
fn fen_round_trips() {
    for fen in POSITIONS {
        let board = Board::from_fen(fen).unwrap();
        let reparsed = Board::from_fen(&board.to_fen()).unwrap();
        assert_eq!(board, reparsed);
    }
}

#[test]
fn en_passant_window_lasts_one_move() {
    let generator = MoveGenerator::new().unwrap();
    let mut board = Board::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();

    let push = generator
        .generate_legal_moves(&board)
        .into_iter()
        .find(|mv| mv.to_uci() == "d7d5")
        .unwrap();
    assert!(generator.make_move(&mut board, push).is_applied());
    assert_eq!(board.en_passant, Some(Square::D6));

    let king_move = generator
        .generate_legal_moves(&board)
        .into_iter()
        .find(|mv| mv.piece() == Piece::WhiteKing)
        .unwrap();
    assert!(generator.make_move(&mut board, king_move).is_applied());
    assert_eq!(board.en_passant, None);
}

#[test]
fn generated_moves_survive_the_integer_form() {
    let generator = MoveGenerator::new().unwrap();
    let with_en_passant = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";

    for fen in POSITIONS.iter().chain([&with_en_passant]) {
        let board = Board::from_fen(fen).unwrap();
        for mv in generator.generate_moves(&board, board.side) {
            assert_eq!(Move::from_raw(mv.raw()), Ok(mv), "{fen} {mv}");
            assert_eq!(Move::from(mv.decode()), mv);
        }
    }
}
