use bitmate::ai::{ChessAI, RandomAI};
use bitmate::board::STARTING_FEN;
use bitmate::error::ChessError;
use bitmate::game::Game;
use bitmate::move_generator::GameStatus;
use bitmate::search::{SearchConfig, SearchEngine};
use bitmate::types::{Piece, Square};
use bitmate::board::Board;
use bitmate::moves::Move;
use bitmate::ApplyResult;

/// Keeps its own copy of the game's move list
struct Recorder {
    inner: RandomAI,
    seen: Vec<Move>,
}

impl ChessAI for Recorder {
    fn play_turn(&mut self, board: &mut Board) -> Option<Move> {
        self.inner.play_turn(board)
    }

    fn evaluated_moves(&self) -> u64 {
        self.inner.evaluated_moves()
    }

    fn notify_move(&mut self, mv: Move) {
        self.seen.push(mv);
    }

    fn retake(&mut self) {
        self.seen.pop();
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[test]
fn fools_mate_ends_the_game() {
    let mut game = Game::new().unwrap();
    for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        game.play_uci(uci).unwrap();
    }
    assert_eq!(game.status(), GameStatus::Checkmate);
    assert!(game.legal_moves().is_empty());

    game.retake();
    assert_eq!(game.status(), GameStatus::Ongoing);
}

#[test]
fn ui_flow_picks_up_and_drops_a_piece() {
    let mut game = Game::new().unwrap();

    // Screen rank 0 is the bottom row
    let square = Square::from_screen(6, 0).unwrap();
    assert_eq!(square, Square::G1);
    assert_eq!(game.pick_up(square), Some(Piece::WhiteKnight));

    let targets: Vec<Square> = game.moves_from(square).iter().map(|mv| mv.target()).collect();
    assert_eq!(targets.len(), 2);
    assert!(targets.contains(&Square::F3));
    assert!(targets.contains(&Square::H3));

    let mv = game.moves_from(square)[0];
    assert_eq!(game.play(mv).unwrap(), ApplyResult::Applied);
    assert_eq!(game.pick_up(Square::E2), None);
    assert_eq!(game.pick_up(Square::E7), Some(Piece::BlackPawn));
}

#[test]
fn pinned_piece_moves_are_reported_as_self_check() {
    let mut game = Game::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    assert!(game.moves_from(Square::E2).is_empty());

    let pinned = game
        .generator()
        .generate_moves(game.board(), game.board().side)
        .into_iter()
        .find(|mv| mv.source() == Square::E2)
        .unwrap();
    assert_eq!(game.play(pinned).unwrap(), ApplyResult::RejectedSelfCheck);
    assert_eq!(game.history().count(), 0);
}

#[test]
fn ai_players_alternate_until_the_game_ends() {
    let mut game = Game::new().unwrap();
    let mut white = SearchEngine::new(SearchConfig::default().with_depth(1).with_quiescence(false)).unwrap();
    let mut black = RandomAI::new(7).unwrap();

    for ply in 0..20 {
        let ai: &mut dyn ChessAI = if ply % 2 == 0 { &mut white } else { &mut black };
        if game.request_ai_move(ai).unwrap().is_none() {
            break;
        }
    }

    let played = game.history().count();
    assert!(played > 0);
    while game.retake().is_some() {}
    assert_eq!(game.board().to_fen(), STARTING_FEN);
}

#[test]
fn loading_a_bad_position_reports_the_reason() {
    let mut game = Game::new().unwrap();
    match game.load("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1") {
        Err(ChessError::MalformedPosition { fen, .. }) => assert!(fen.ends_with("0 1")),
        other => panic!("expected a malformed position, got {other:?}"),
    }
    assert_eq!(game.board().to_fen(), STARTING_FEN);
}

#[test]
fn players_hear_about_moves_and_takebacks() {
    let mut game = Game::new().unwrap();
    let mut player = Recorder { inner: RandomAI::new(11).unwrap(), seen: Vec::new() };

    for _ in 0..4 {
        game.request_ai_move(&mut player).unwrap();
    }
    assert_eq!(player.seen, game.history().collect::<Vec<_>>());

    game.retake_with(&mut player);
    game.retake_with(&mut player);
    assert_eq!(player.seen.len(), 2);
    assert_eq!(player.seen, game.history().collect::<Vec<_>>());

    while game.retake_with(&mut player).is_some() {}
    assert!(player.seen.is_empty());
    assert_eq!(game.retake_with(&mut player), None);
}
