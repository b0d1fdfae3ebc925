//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::{
    schedule::EpochReport,
    training::{GameRecord, MoveRecord, Side},
};
use crate::{
    Result,
    policy::Choice,
    ports::Observer,
    tictactoe::GameResult,
};

/// Observation of a single move during a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Ply within the game
    pub step: usize,
    pub side: Side,
    pub position: usize,
    /// Board after the move, encoded as 9 cell characters
    pub board: String,
    /// `explore` or `greedy`; absent for opponent moves
    pub choice: Option<String>,
    /// Estimated winning probability of the chosen afterstate (greedy moves)
    pub value: Option<f64>,
    /// Value written by a TD update triggered by this move
    pub updated_value: Option<f64>,
}

/// One line of the JSONL event log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Observation {
    Game {
        game_num: usize,
        learner_first: bool,
        result: GameResult,
        updates: usize,
        steps: Vec<StepObservation>,
    },
    Epoch {
        epoch: usize,
        alpha: f64,
        games: usize,
        win_rate: f64,
        draw_rate: f64,
        loss_rate: f64,
    },
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    completed: u64,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            completed: 0,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.completed = 0;
        self.wins = 0;
        self.draws = 0;
        self.losses = 0;
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, record: &GameRecord) -> Result<()> {
        match record.result {
            GameResult::FirstWins => self.wins += 1,
            GameResult::SecondWins => self.losses += 1,
            GameResult::Draw | GameResult::InProgress => self.draws += 1,
        }
        self.completed += 1;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.completed);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    wins: usize,
    draws: usize,
    losses: usize,
    total_games: usize,
    learner_first_games: usize,
    explorations: usize,
    updates: usize,
    move_counts: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            wins: 0,
            draws: 0,
            losses: 0,
            total_games: 0,
            learner_first_games: 0,
            explorations: 0,
            updates: 0,
            move_counts: Vec::new(),
        }
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            count as f64 / self.total_games as f64
        }
    }

    /// Get current win rate
    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    /// Get current draw rate
    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    /// Get current loss rate
    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Get average game length
    pub fn avg_game_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_games: self.total_games,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            win_rate: self.win_rate(),
            draw_rate: self.draw_rate(),
            loss_rate: self.loss_rate(),
            avg_game_length: self.avg_game_length(),
            learner_first_games: self.learner_first_games,
            explorations: self.explorations,
            updates: self.updates,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_game_length: f64,
    pub learner_first_games: usize,
    /// Exploratory learner moves
    pub explorations: usize,
    /// TD updates applied
    pub updates: usize,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_game_start(&mut self, _game_num: usize, learner_first: bool) -> Result<()> {
        self.move_counts.push(0);
        if learner_first {
            self.learner_first_games += 1;
        }
        Ok(())
    }

    fn on_move(&mut self, _game_num: usize, record: &MoveRecord) -> Result<()> {
        if let Some(last) = self.move_counts.last_mut() {
            *last += 1;
        }
        if record.choice == Some(Choice::Explore) {
            self.explorations += 1;
        }
        if record.updated_value.is_some() {
            self.updates += 1;
        }
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, record: &GameRecord) -> Result<()> {
        self.total_games += 1;
        match record.result {
            GameResult::FirstWins => self.wins += 1,
            GameResult::SecondWins => self.losses += 1,
            GameResult::Draw | GameResult::InProgress => self.draws += 1,
        }
        Ok(())
    }
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_game_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create observation log {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_game_steps: Vec::new(),
        })
    }

    fn write_line(&mut self, observation: &Observation) -> Result<()> {
        serde_json::to_writer(&mut self.writer, observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }
}

impl Observer for JsonlObserver {
    fn on_game_start(&mut self, _game_num: usize, _learner_first: bool) -> Result<()> {
        self.current_game_steps.clear();
        Ok(())
    }

    fn on_move(&mut self, _game_num: usize, record: &MoveRecord) -> Result<()> {
        let (choice, value) = match record.choice {
            Some(Choice::Explore) => (Some("explore".to_string()), None),
            Some(Choice::Greedy { value, .. }) => (Some("greedy".to_string()), Some(value)),
            None => (None, None),
        };
        self.current_game_steps.push(StepObservation {
            step: record.step,
            side: record.side,
            position: record.position,
            board: record.board.encode(),
            choice,
            value,
            updated_value: record.updated_value,
        });
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, record: &GameRecord) -> Result<()> {
        let observation = Observation::Game {
            game_num,
            learner_first: record.learner_first,
            result: record.result,
            updates: record.updates,
            steps: std::mem::take(&mut self.current_game_steps),
        };
        self.write_line(&observation)
    }

    fn on_epoch_end(&mut self, report: &EpochReport) -> Result<()> {
        let observation = Observation::Epoch {
            epoch: report.epoch,
            alpha: report.alpha,
            games: report.result.total_games,
            win_rate: report.result.win_rate,
            draw_rate: report.result.draw_rate,
            loss_rate: report.result.loss_rate,
        };
        self.write_line(&observation)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlObserver {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Console observer - narrates each game move by move
///
/// Prints how the learner picked each move, its estimated chance of winning,
/// the board after every move and the final verdict.
pub struct ConsoleObserver<W: Write + Send> {
    out: W,
    learner_label: String,
    opponent_label: String,
}

impl ConsoleObserver<std::io::Stdout> {
    /// Narrate to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            learner_label: "Computer".to_string(),
            opponent_label: "Opponent".to_string(),
        }
    }

    /// Names used in the verdict line
    pub fn with_labels(mut self, learner: &str, opponent: &str) -> Self {
        self.learner_label = learner.to_string();
        self.opponent_label = opponent.to_string();
        self
    }

    pub fn set_opponent_label(&mut self, opponent: &str) {
        self.opponent_label = opponent.to_string();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Observer for ConsoleObserver<W> {
    fn on_game_start(&mut self, _game_num: usize, learner_first: bool) -> Result<()> {
        let opener = if learner_first {
            &self.learner_label
        } else {
            &self.opponent_label
        };
        writeln!(self.out, "\n{opener} moves first.")?;
        Ok(())
    }

    fn on_move(&mut self, _game_num: usize, record: &MoveRecord) -> Result<()> {
        match record.choice {
            Some(Choice::Explore) => writeln!(self.out, "Being explorative...")?,
            Some(Choice::Greedy { value, ties }) => {
                writeln!(self.out, "Being greedy...")?;
                write!(self.out, "{:.2}% chance of winning with this move", value * 100.0)?;
                if ties > 1 {
                    write!(self.out, " (picked from {ties} equal moves)")?;
                }
                writeln!(self.out, "...")?;
            }
            None => {}
        }
        writeln!(self.out, "{}\n", record.board)?;
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, record: &GameRecord) -> Result<()> {
        match record.result {
            GameResult::FirstWins => writeln!(self.out, "{} won!", self.learner_label)?,
            GameResult::SecondWins => writeln!(self.out, "{} won!", self.opponent_label)?,
            GameResult::Draw | GameResult::InProgress => writeln!(self.out, "Draw!")?,
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Shared observer: the trainer owns one handle, the caller keeps another to
/// read results after training
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_start(total_games)
    }

    fn on_game_start(&mut self, game_num: usize, learner_first: bool) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_game_start(game_num, learner_first)
    }

    fn on_move(&mut self, game_num: usize, record: &MoveRecord) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_move(game_num, record)
    }

    fn on_game_end(&mut self, game_num: usize, record: &GameRecord) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_game_end(game_num, record)
    }

    fn on_epoch_end(&mut self, report: &EpochReport) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_epoch_end(report)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Board;

    fn greedy_move(step: usize, value: f64) -> MoveRecord {
        MoveRecord {
            step,
            side: Side::Learner,
            position: 4,
            board: Board::from_string("... .X. ...").unwrap(),
            choice: Some(Choice::Greedy { value, ties: 1 }),
            updated_value: Some(0.5),
        }
    }

    fn finished(result: GameResult) -> GameRecord {
        GameRecord {
            result,
            learner_first: true,
            moves: vec![4],
            final_board: Board::from_string("... .X. ...").unwrap(),
            updates: 1,
        }
    }

    #[test]
    fn test_metrics_counts() {
        let mut metrics = MetricsObserver::new();
        metrics.on_game_start(0, true).unwrap();
        metrics.on_move(0, &greedy_move(0, 0.5)).unwrap();
        metrics.on_game_end(0, &finished(GameResult::FirstWins)).unwrap();
        metrics.on_game_start(1, false).unwrap();
        metrics.on_game_end(1, &finished(GameResult::Draw)).unwrap();

        let summary = metrics.summary();
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.learner_first_games, 1);
        assert_eq!(summary.updates, 1);
        assert_eq!(summary.win_rate, 0.5);
        assert_eq!(summary.avg_game_length, 0.5);
    }

    #[test]
    fn test_console_narration() {
        let mut console = ConsoleObserver::new(Vec::new()).with_labels("Computer", "You");
        console.on_game_start(0, true).unwrap();
        console.on_move(0, &greedy_move(0, 0.625)).unwrap();
        console.on_game_end(0, &finished(GameResult::SecondWins)).unwrap();

        let text = String::from_utf8(console.into_inner()).unwrap();
        assert!(text.contains("Computer moves first."));
        assert!(text.contains("Being greedy..."));
        assert!(text.contains("62.50% chance of winning with this move..."));
        assert!(text.contains(" |X| "));
        assert!(text.ends_with("You won!\n"));
    }

    #[test]
    fn test_observation_tagging() {
        let json = serde_json::to_string(&Observation::Epoch {
            epoch: 1,
            alpha: 0.5,
            games: 10,
            win_rate: 0.6,
            draw_rate: 0.1,
            loss_rate: 0.3,
        })
        .unwrap();
        assert!(json.starts_with(r#"{"event":"epoch""#));
    }
}
