//! ttt-td CLI - Tic-tac-toe afterstate value learning
//!
//! This CLI provides a unified interface for:
//! - Training the learner against a random opponent
//! - Measuring the random-vs-random baseline
//! - Playing against (or watching) the trained learner

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ttt-td")]
#[command(version, about = "Afterstate TD(0) value learning for tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the learner and report per-epoch win/loss rates
    Train(ttt_td::cli::commands::train::TrainArgs),

    /// Random-vs-random null model
    Baseline(ttt_td::cli::commands::baseline::BaselineArgs),

    /// Train, then play against the learner interactively
    Play(ttt_td::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => ttt_td::cli::commands::train::execute(args),
        Commands::Baseline(args) => ttt_td::cli::commands::baseline::execute(args),
        Commands::Play(args) => ttt_td::cli::commands::play::execute(args),
    }
}
