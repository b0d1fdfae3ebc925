//! Train command - Train the learner against the random opponent

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use super::PlanArgs;
use crate::{
    cli::output::{format_percent, format_win_loss, print_kv, print_result, print_section},
    pipeline::{
        EpochReport, FirstMover, JsonlObserver, MetricsObserver, MetricsSummary, Observer,
        ProgressObserver, Trainer, TrainingResult,
    },
};

#[derive(Debug, Serialize)]
struct EpochLine {
    epoch: usize,
    alpha: f64,
    win_rate: f64,
    loss_rate: f64,
}

impl From<&EpochReport> for EpochLine {
    fn from(report: &EpochReport) -> Self {
        Self {
            epoch: report.epoch,
            alpha: report.alpha,
            win_rate: report.result.win_rate,
            loss_rate: report.result.loss_rate,
        }
    }
}

#[derive(Debug, Serialize)]
struct EvaluationStats {
    games: usize,
    epsilon: f64,
    win_rate: f64,
    loss_rate: f64,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    evaluation: Option<EvaluationStats>,
    epochs: Vec<EpochLine>,
    coverage: f64,
    metrics: MetricsSummary,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    alpha_schedule: String,
    epsilon: f64,
    first_mover: FirstMover,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Prints the `xx.xx% win, yy.yy% loss` line after every epoch
struct EpochLinePrinter;

impl Observer for EpochLinePrinter {
    fn on_epoch_end(&mut self, report: &EpochReport) -> crate::Result<()> {
        println!(
            "{}",
            format_win_loss(report.result.win_rate, report.result.loss_rate)
        );
        Ok(())
    }
}

/// Sum of the per-epoch results
fn combine(reports: &[EpochReport]) -> TrainingResult {
    let (wins, draws, losses) = reports.iter().fold((0, 0, 0), |(w, d, l), report| {
        (
            w + report.result.wins,
            d + report.result.draws,
            l + report.result.losses,
        )
    });
    TrainingResult::new(wins + draws + losses, wins, draws, losses)
}

#[derive(Parser, Debug)]
#[command(about = "Train the learner", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Games played after training with alpha = 0 to measure the policy
    #[arg(long)]
    pub eval_games: Option<usize>,

    /// Exploration rate during evaluation
    #[arg(long)]
    pub eval_epsilon: Option<f64>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show a progress bar instead of one line per epoch
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut run = args.plan.resolve()?;
    if let Some(games) = args.eval_games {
        run.eval_games = games;
    }
    if let Some(epsilon) = args.eval_epsilon {
        run.eval_epsilon = epsilon;
    }
    run.validate()?;

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    print_section("Training Configuration");
    print_kv("Epochs", &run.plan.epochs.to_string());
    print_kv("Games per epoch", &run.plan.games_per_epoch.to_string());
    print_kv("Epsilon", &run.plan.epsilon.to_string());
    print_kv("Alpha", &run.plan.alpha.label());
    print_kv("First mover", &format!("{:?}", run.first_mover));
    if let Some(seed) = run.seed {
        print_kv("Seed", &seed.to_string());
    }

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut trainer = Trainer::new(run.training_config())?
        .with_observer(Box::new(Arc::clone(&metrics)));
    if let Some(path) = &args.observations {
        trainer.add_observer(Box::new(JsonlObserver::new(path)?));
    }
    if args.progress {
        trainer.add_observer(Box::new(ProgressObserver::new()));
    } else {
        trainer.add_observer(Box::new(EpochLinePrinter));
    }

    print_section("Training");
    let reports = trainer.run_plan(&run.plan)?;
    let training = combine(&reports);
    let metrics_summary = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();
    let coverage = trainer.table().coverage();

    print_section("Training Results");
    print_result(&training);
    print_kv(
        "Avg game length",
        &format!("{:.2}", metrics_summary.avg_game_length),
    );
    print_kv("TD updates", &metrics_summary.updates.to_string());
    print_kv("Table coverage", &format_percent(coverage));

    let evaluation = if run.eval_games > 0 {
        print_section("Evaluation");
        let (win_rate, loss_rate) = trainer.evaluate(run.eval_epsilon, 0.0, run.eval_games)?;
        print_kv("Games", &run.eval_games.to_string());
        print_kv("Result", &format_win_loss(win_rate, loss_rate));
        Some(EvaluationStats {
            games: run.eval_games,
            epsilon: run.eval_epsilon,
            win_rate,
            loss_rate,
        })
    } else {
        None
    };

    if let Some(path) = &args.observations {
        println!("\nObservations written to {}", path.display());
    }

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!(
                "\nNormalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training,
            evaluation,
            epochs: reports.iter().map(EpochLine::from).collect(),
            coverage,
            metrics: metrics_summary,
            metadata: SummaryMetadata {
                alpha_schedule: run.plan.alpha.label(),
                epsilon: run.plan.epsilon,
                first_mover: run.first_mover,
                seed: run.seed,
            },
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
