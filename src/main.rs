//! Bitmate - command line driver
//!
//! Usage:
//!     bitmate search --fen "<fen>" --depth 5
//!     bitmate perft --depth 4 --divide
//!     bitmate magics --seed 42
//!     bitmate attacks --square d4 --piece queen
//!     bitmate show --fen "<fen>"
//!
//! Logging goes to stderr and follows `RUST_LOG` when set, `--log-level` otherwise.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use bitmate::ai::{ChessAI, RandomAI};
use bitmate::attack_tables::{self, AttackTables};
use bitmate::bitboard::render;
use bitmate::board::{Board, STARTING_FEN};
use bitmate::magic::{format_magics, MagicSearch, Slider, DEFAULT_MAGIC_SEED};
use bitmate::move_generator::MoveGenerator;
use bitmate::perft::{perft, perft_divide};
use bitmate::search::{SearchConfig, SearchEngine};
use bitmate::types::{Color, Square};

#[derive(Parser)]
#[command(name = "bitmate", version, about = "Bitboard chess engine")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search a position and print the best move
    Search {
        #[arg(long, default_value = STARTING_FEN)]
        fen: String,
        #[arg(long, default_value_t = 4)]
        depth: u32,
        /// Stop at the horizon instead of resolving captures
        #[arg(long)]
        no_quiescence: bool,
        /// Keep generation order at interior nodes
        #[arg(long)]
        no_ordering: bool,
        /// Play a random legal move instead of searching
        #[arg(long)]
        random: Option<u64>,
    },
    /// Count leaf positions to a fixed depth
    Perft {
        #[arg(long, default_value = STARTING_FEN)]
        fen: String,
        #[arg(long, default_value_t = 3)]
        depth: u32,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Search fresh magic numbers and print them as constants
    Magics {
        #[arg(long, default_value_t = DEFAULT_MAGIC_SEED)]
        seed: u64,
    },
    /// Print the attack set of a piece on a square
    Attacks {
        #[arg(long)]
        square: Square,
        #[arg(long, value_enum, default_value_t = AttackPiece::Queen)]
        piece: AttackPiece,
        /// Use this position's occupancy for sliders
        #[arg(long)]
        fen: Option<String>,
    },
    /// Print a position with its status and legal moves
    Show {
        #[arg(long, default_value = STARTING_FEN)]
        fen: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AttackPiece {
    WhitePawn,
    BlackPawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Search { fen, depth, no_quiescence, no_ordering, random } => {
            cmd_search(&fen, depth, !no_quiescence, !no_ordering, random)
        }
        Command::Perft { fen, depth, divide } => cmd_perft(&fen, depth, divide),
        Command::Magics { seed } => cmd_magics(seed),
        Command::Attacks { square, piece, fen } => cmd_attacks(square, piece, fen.as_deref()),
        Command::Show { fen } => cmd_show(&fen),
    }
}

fn cmd_search(fen: &str, depth: u32, quiescence: bool, order_moves: bool, random: Option<u64>) -> Result<()> {
    let mut board = Board::from_fen(fen)?;
    let config = SearchConfig::default()
        .with_depth(depth)
        .with_quiescence(quiescence)
        .with_move_ordering(order_moves);

    let mut ai: Box<dyn ChessAI> = match random {
        Some(seed) => Box::new(RandomAI::new(seed)?),
        None => Box::new(SearchEngine::new(config)?),
    };

    let start = Instant::now();
    let best = ai.play_turn(&mut board);
    let elapsed = start.elapsed();

    match best {
        Some(mv) => println!("bestmove {mv}"),
        None => println!("bestmove (none)"),
    }
    println!(
        "player {}  evaluated {}  time {} ms",
        ai.name(),
        ai.evaluated_moves(),
        elapsed.as_millis()
    );
    Ok(())
}

fn cmd_perft(fen: &str, depth: u32, divide: bool) -> Result<()> {
    let generator = MoveGenerator::new()?;
    let mut board = Board::from_fen(fen)?;
    let start = Instant::now();

    let nodes = if divide {
        let divided = perft_divide(&generator, &mut board, depth);
        for (mv, count) in &divided {
            println!("{mv}: {count}");
        }
        divided.iter().map(|(_, count)| count).sum()
    } else {
        perft(&generator, &mut board, depth)
    };

    let elapsed = start.elapsed();
    let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
    println!("\nNodes: {nodes}");
    println!("Time: {} ms  ({:.0} nps)", elapsed.as_millis(), nps);
    Ok(())
}

fn cmd_magics(seed: u64) -> Result<()> {
    let mut search = MagicSearch::new(seed);
    let tables = AttackTables::generate(&mut search)?;
    println!("{}", format_magics("ROOK_MAGICS", tables.slider(Slider::Rook).magics()));
    println!("{}", format_magics("BISHOP_MAGICS", tables.slider(Slider::Bishop).magics()));
    Ok(())
}

fn cmd_attacks(square: Square, piece: AttackPiece, fen: Option<&str>) -> Result<()> {
    let tables = attack_tables::shared()?;
    let occupancy = match fen {
        Some(fen) => Board::from_fen(fen)?.all_occupancy(),
        None => 0,
    };

    let attacks = match piece {
        AttackPiece::WhitePawn => tables.pawn_attacks(Color::White, square),
        AttackPiece::BlackPawn => tables.pawn_attacks(Color::Black, square),
        AttackPiece::Knight => tables.knight_attacks(square),
        AttackPiece::Bishop => tables.bishop_attacks(square, occupancy),
        AttackPiece::Rook => tables.rook_attacks(square, occupancy),
        AttackPiece::Queen => tables.queen_attacks(square, occupancy),
        AttackPiece::King => tables.king_attacks(square),
    };

    println!("{}", render(attacks));
    Ok(())
}

fn cmd_show(fen: &str) -> Result<()> {
    let generator = MoveGenerator::new()?;
    let board = Board::from_fen(fen)?;

    println!("{}", board.display());
    println!("\nFEN: {}", board.to_fen());
    println!("Side to move: {}", board.side);
    println!("Status: {:?}", generator.game_status(&board));
    if generator.is_in_check(&board) {
        println!("Check!");
    }

    let moves: Vec<String> = generator
        .generate_legal_moves(&board)
        .into_iter()
        .map(|mv| mv.to_uci())
        .collect();
    println!("Legal moves ({}): {}", moves.len(), moves.join(" "));
    Ok(())
}
