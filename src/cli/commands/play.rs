//! Play command - Train the learner, then play against it or watch it play

use std::{
    io::{self, BufReader},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Result;
use clap::Parser;

use super::PlanArgs;
use crate::{
    Error,
    cli::{
        human::HumanActor,
        output::{format_win_loss, print_kv, print_section, print_stats_table},
    },
    pipeline::{ConsoleObserver, ProgressObserver, RandomActor, Trainer},
    tictactoe::GameResult,
};

const MENU: &str = "\nType 'me' to play, press Enter to watch the computer play a random opponent, or 'stop' to quit: ";

#[derive(Parser, Debug)]
#[command(about = "Train the learner, then play against it", allow_negative_numbers = true)]
pub struct PlayArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Exploration rate of the computer during interactive games
    #[arg(long, default_value_t = 0.0)]
    pub play_epsilon: f64,

    /// Learning rate during interactive games (0 keeps the table frozen)
    #[arg(long, default_value_t = 0.0)]
    pub play_alpha: f64,
}

#[derive(Default)]
struct Session {
    computer: usize,
    opponent: usize,
    draws: usize,
}

impl Session {
    fn record(&mut self, result: GameResult) {
        match result {
            GameResult::FirstWins => self.computer += 1,
            GameResult::SecondWins => self.opponent += 1,
            GameResult::Draw | GameResult::InProgress => self.draws += 1,
        }
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let run = args.plan.resolve()?;

    print_section("Training");
    print_kv("Epochs", &run.plan.epochs.to_string());
    print_kv("Games per epoch", &run.plan.games_per_epoch.to_string());
    print_kv("Alpha", &run.plan.alpha.label());

    let mut trainer =
        Trainer::new(run.training_config())?.with_observer(Box::new(ProgressObserver::new()));
    let reports = trainer.run_plan(&run.plan)?;
    if let Some(last) = reports.last() {
        print_kv(
            "Last epoch",
            &format_win_loss(last.result.win_rate, last.result.loss_rate),
        );
    }

    let console = Arc::new(Mutex::new(
        ConsoleObserver::stdout().with_labels("Computer", "Random"),
    ));
    trainer.clear_observers();
    trainer.add_observer(Box::new(Arc::clone(&console)));

    let mut human = HumanActor::new("You".to_string(), BufReader::new(io::stdin()), io::stdout());
    let mut random = match run.seed {
        Some(seed) => RandomActor::with_seed("Random".to_string(), seed.wrapping_add(3)),
        None => RandomActor::new("Random".to_string()),
    };
    let mut human_session = Session::default();
    let mut watch_session = Session::default();

    while let Some(command) = human.read_command(MENU)? {
        match command.to_ascii_lowercase().as_str() {
            "stop" => break,
            "me" => {
                console
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .set_opponent_label("You");
                let learner_first = trainer.next_learner_first();
                match trainer.play_against(
                    &mut human,
                    learner_first,
                    args.play_epsilon,
                    args.play_alpha,
                ) {
                    Ok(record) => human_session.record(record.result),
                    Err(Error::InputClosed) => break,
                    Err(err) => return Err(err.into()),
                }
            }
            "" => {
                console
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .set_opponent_label("Random");
                let learner_first = trainer.next_learner_first();
                let record = trainer.play_against(
                    &mut random,
                    learner_first,
                    args.play_epsilon,
                    args.play_alpha,
                )?;
                watch_session.record(record.result);
            }
            other => eprintln!("Unknown command '{other}'"),
        }
    }

    print_section("Session");
    let vs_you = format!(
        "computer {} / you {} / draws {}",
        human_session.computer, human_session.opponent, human_session.draws
    );
    let vs_random = format!(
        "computer {} / random {} / draws {}",
        watch_session.computer, watch_session.opponent, watch_session.draws
    );
    print_stats_table(&[("Against you", &vs_you), ("Against random", &vs_random)]);
    Ok(())
}
