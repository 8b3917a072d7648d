//! Command-line front end for the chess rules engine.
//!
//! Loads a position from FEN, then lists moves, plays a line, counts perft
//! nodes or prints the board.

use anyhow::{bail, Context};
use chess_core::{FenFields, Square};
use chess_rules::{perft, perft_divide, Game};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-rules")]
#[command(about = "Legal move generation and game play from FEN")]
struct Cli {
    /// Position to start from
    #[arg(long, global = true, default_value = FenFields::STARTPOS)]
    fen: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List legal moves
    Moves {
        /// Only moves of the piece on this square
        #[arg(short, long)]
        square: Option<Square>,
    },
    /// Play moves in coordinate notation and print the result
    Play {
        /// Moves such as e2e4 or e7e8n
        moves: Vec<String>,
    },
    /// Count leaf nodes of the move tree
    Perft {
        /// Search depth in plies
        #[arg(short, long, default_value = "3")]
        depth: u32,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Print the board
    Board,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut game = Game::from_fen(&cli.fen).with_context(|| format!("invalid FEN: {}", cli.fen))?;
    tracing::info!(fen = %cli.fen, "loaded position");

    match cli.command {
        Commands::Moves { square } => {
            let moves = match square {
                Some(sq) => game.legal_moves_from(sq),
                None => game.legal_moves(),
            };
            let text: Vec<String> = moves.iter().map(|mov| mov.to_uci()).collect();
            println!("{}", text.join(" "));
        }
        Commands::Play { moves } => {
            for (ply, text) in moves.iter().enumerate() {
                if game.is_finished() {
                    bail!("game is over before move {}: {}", ply + 1, text);
                }
                game.play_uci(text)
                    .with_context(|| format!("move {} ({}) rejected", ply + 1, text))?;
            }
            print_state(&game);
        }
        Commands::Perft { depth, divide } => {
            if divide {
                let results = perft_divide(&mut game, depth);
                for (mov, nodes) in &results {
                    println!("{}: {}", mov.to_uci(), nodes);
                }
                let total: u64 = results.iter().map(|(_, nodes)| nodes).sum();
                println!("\nNodes searched: {}", total);
            } else {
                let start = std::time::Instant::now();
                let nodes = perft(&mut game, depth);
                tracing::info!(depth, nodes, elapsed = ?start.elapsed(), "perft finished");
                println!("{}", nodes);
            }
        }
        Commands::Board => print_state(&game),
    }

    Ok(())
}

fn print_state(game: &Game) {
    println!("{}", game.board());
    println!();
    println!("FEN: {}", game.to_fen());
    match game.outcome() {
        Some(outcome) => println!("Result: {}", outcome),
        None if game.king_is_checked() => println!("{} to move, in check", game.side_to_move()),
        None => println!("{} to move", game.side_to_move()),
    }
}
