//! Baseline command - Random-vs-random null model

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{format_win_loss, print_kv, print_result, print_section},
    pipeline::estimate_random_baseline,
};

#[derive(Parser, Debug)]
#[command(about = "Measure how two random players fare against each other")]
pub struct BaselineArgs {
    /// Number of games
    #[arg(long, short = 'g', default_value_t = 100_000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: BaselineArgs) -> Result<()> {
    print_section("Random Baseline");
    print_kv("Games", &args.games.to_string());
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let result = estimate_random_baseline(args.games, args.seed)?;

    print_section("Baseline Results (first mark)");
    print_result(&result);
    println!("\n{}", format_win_loss(result.win_rate, result.loss_rate));
    Ok(())
}
