//! Kropki-Rust: rules engine and bot for a territory-capture point game.
//!
//! ## Usage
//!
//! - `kropki-rust demo` - Play a scripted enclosure and print the board
//! - `kropki-rust selfplay --games 10` - Bot-vs-bot matches with a tally
//! - `--weights <path>` - Use a trained weight file instead of the
//!   embedded one

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use kropki_rust::bot::{BotOptions, choose_move_with_weights};
use kropki_rust::rules::play_turn;
use kropki_rust::state::{BotDifficulty, GameMode, GameOutcome, GameSettings, GameState, GameStatus};
use kropki_rust::weights::Weights;

/// Kropki-Rust: territory-capture rules engine and bot
#[derive(Parser)]
#[command(name = "kropki-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a trained weight file (JSON array of 5 floats)
    #[arg(long, global = true)]
    weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scripted capture sequence and print each board
    Demo,
    /// Run bot-vs-bot matches and print a result tally
    Selfplay {
        /// Number of games to play
        #[arg(long, default_value_t = 10)]
        games: u32,
        /// Board width
        #[arg(long, default_value_t = 10)]
        width: i32,
        /// Board height
        #[arg(long, default_value_t = 10)]
        height: i32,
        /// Seed for the random opening moves
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let weights = match &cli.weights {
        Some(path) => Weights::from_path(path)?,
        None => Weights::default(),
    };
    if !weights.matches_feature_count() {
        eprintln!(
            "warning: weight vector has length {}, expected {}; bot will fall back to its first candidate",
            weights.values().len(),
            kropki_rust::constants::FEATURE_COUNT
        );
    }

    match cli.command {
        Some(Commands::Selfplay { games, width, height, seed }) => {
            run_selfplay(&weights, games, width, height, seed)
        }
        Some(Commands::Demo) | None => run_demo(&weights),
    }
}

/// Player one walls in a player-two point at the center of a 5x5 board.
fn run_demo(weights: &Weights) -> Result<()> {
    println!("Kropki-Rust: territory-capture engine\n");

    println!("=== Scripted enclosure ===");
    let mut state = GameState::new(GameSettings::new(5, 5, GameMode::PlayerVsPlayer));
    let script = [(1, 2), (2, 2), (3, 2), (4, 0), (2, 1), (3, 0), (2, 3)];
    for (x, y) in script {
        let mover = state.current_player;
        state = play_turn(&state, x, y).expect("scripted move is legal");
        println!("player {mover} plays ({x}, {y}):");
        println!("{state}");
    }
    println!(
        "score {}:{} - player one captured the center point",
        state.score[0], state.score[1]
    );

    println!("\n=== Bot reply ===");
    let mv = choose_move_with_weights(
        &state,
        BotDifficulty::Neuro,
        BotOptions::default(),
        weights,
    );
    match mv {
        Some((x, y)) => println!("bot would answer at ({x}, {y})"),
        None => println!("bot has no legal move"),
    }
    Ok(())
}

fn run_selfplay(weights: &Weights, games: u32, width: i32, height: i32, seed: u64) -> Result<()> {
    let mut wins = [0u32, 0u32];
    let mut unfinished = 0u32;
    // Each cell takes at most one point ever, so this cap is generous.
    let move_cap = (width as usize * height as usize) * 2;

    for game in 0..games {
        let mut rng = fastrand::Rng::with_seed(seed.wrapping_add(game as u64));
        let mut state = GameState::new(GameSettings::new(width, height, GameMode::PlayerVsBot));

        // A few random opening points keep deterministic bots from
        // replaying one identical game; illegal picks are just skipped.
        for _ in 0..4 {
            let x = rng.i32(0..width);
            let y = rng.i32(0..height);
            if let Some(next) = play_turn(&state, x, y) {
                state = next;
            }
        }

        while state.status == GameStatus::Playing && state.move_history.len() < move_cap {
            let Some((x, y)) = choose_move_with_weights(
                &state,
                BotDifficulty::Neuro,
                BotOptions::default(),
                weights,
            ) else {
                break;
            };
            state = play_turn(&state, x, y).expect("bot move is legal");
        }

        match state.outcome {
            Some(GameOutcome::Winner(p)) => {
                wins[p.index()] += 1;
                println!(
                    "game {game}: winner player {p}, score {}:{}, {} moves",
                    state.score[0],
                    state.score[1],
                    state.move_history.len()
                );
            }
            Some(GameOutcome::Draw) => println!("game {game}: draw"),
            None => {
                unfinished += 1;
                println!(
                    "game {game}: stopped at move cap, score {}:{}",
                    state.score[0], state.score[1]
                );
            }
        }
    }

    println!(
        "\ntally: player one {} - player two {} ({} unfinished)",
        wins[0], wins[1], unfinished
    );
    Ok(())
}
