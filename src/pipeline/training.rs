//! Game loop, training and evaluation for the afterstate learner

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    opponents::RandomActor,
    schedule::{EpochPlan, EpochReport},
};
use crate::{
    Error, Result,
    codec::StateIndex,
    error::ensure_unit_interval,
    policy::{Choice, EpsilonGreedy, learn_from_loss},
    ports::{Actor, Observer},
    tictactoe::{Board, GameResult, Player},
    value_table::ValueTable,
};

/// Mark placed by the opponent actor
const OPPONENT: Player = Player::Second;

/// Who opens each game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    Learner,
    Opponent,
    /// Learner opens the even-numbered games
    Alternate,
    /// Fair coin per game
    #[default]
    CoinFlip,
}

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Random seed; the policy, the opponent and the opening coin get
    /// distinct streams derived from it
    pub seed: Option<u64>,

    /// Who opens each game
    pub first_mover: FirstMover,

    /// Exploration rate used until a training call sets its own
    pub epsilon: f64,
}

impl TrainingConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_first_mover(mut self, first_mover: FirstMover) -> Self {
        self.first_mover = first_mover;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            first_mover: FirstMover::CoinFlip,
            epsilon: 0.001,
        }
    }
}

/// Which actor placed a mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Learner,
    Opponent,
}

/// One placed mark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Ply within the game, from 0
    pub step: usize,
    pub side: Side,
    pub position: usize,
    /// Board after the mark was placed
    pub board: Board,
    /// How the learner chose the move; `None` for opponent moves
    pub choice: Option<Choice>,
    /// New value of the learner's pending state if this move triggered a TD update
    pub updated_value: Option<f64>,
}

/// Summary of one finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub result: GameResult,
    pub learner_first: bool,
    pub moves: Vec<usize>,
    pub final_board: Board,
    /// Number of TD updates applied during the game
    pub updates: usize,
}

impl GameRecord {
    pub fn learner_won(&self) -> bool {
        self.result == GameResult::FirstWins
    }

    pub fn learner_lost(&self) -> bool {
        self.result == GameResult::SecondWins
    }
}

/// Result of a training run, from the learner's perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total games played
    pub total_games: usize,

    /// Number of wins
    pub wins: usize,

    /// Number of draws
    pub draws: usize,

    /// Number of losses
    pub losses: usize,

    /// Win rate
    pub win_rate: f64,

    /// Draw rate
    pub draw_rate: f64,

    /// Loss rate
    pub loss_rate: f64,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(total_games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if total_games > 0 {
                count as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }
}

/// Running win/draw/loss counts
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    wins: usize,
    draws: usize,
    losses: usize,
}

impl Tally {
    pub(crate) fn record(&mut self, result: GameResult) {
        match result {
            GameResult::FirstWins => self.wins += 1,
            GameResult::SecondWins => self.losses += 1,
            GameResult::Draw | GameResult::InProgress => self.draws += 1,
        }
    }

    pub(crate) fn finish(self) -> TrainingResult {
        TrainingResult::new(
            self.wins + self.draws + self.losses,
            self.wins,
            self.draws,
            self.losses,
        )
    }
}

/// Borrowed state for playing one game
struct GameContext<'a> {
    table: &'a mut ValueTable,
    policy: &'a mut EpsilonGreedy,
    observers: &'a mut [Box<dyn Observer>],
    alpha: f64,
    update: bool,
}

impl GameContext<'_> {
    fn play(
        &mut self,
        opponent: &mut dyn Actor,
        game_num: usize,
        learner_first: bool,
    ) -> Result<GameRecord> {
        for observer in self.observers.iter_mut() {
            observer.on_game_start(game_num, learner_first)?;
        }

        let mut board = Board::new();
        // Learner's afterstate from its previous turn, the target of its next update
        let mut pending_learner_state = StateIndex::EMPTY;
        let mut moves = Vec::with_capacity(9);
        let mut updates = 0;
        let mut learner_to_move = learner_first;

        let result = loop {
            let step = moves.len();
            let mut record = if learner_to_move {
                let decision = self.policy.act(
                    &board,
                    self.table,
                    pending_learner_state,
                    self.alpha,
                    self.update,
                )?;
                let updated_value = (self.update && decision.choice.is_greedy())
                    .then(|| self.table.get(pending_learner_state));
                board = decision.board;
                MoveRecord {
                    step,
                    side: Side::Learner,
                    position: decision.position,
                    board,
                    choice: Some(decision.choice),
                    updated_value,
                }
            } else {
                let position = opponent.select_move(&board)?;
                pending_learner_state = board.index();
                board.place(position, OPPONENT)?;
                MoveRecord {
                    step,
                    side: Side::Opponent,
                    position,
                    board,
                    choice: None,
                    updated_value: None,
                }
            };
            moves.push(record.position);

            let outcome = board.outcome();
            if outcome == GameResult::SecondWins && self.update {
                record.updated_value = Some(learn_from_loss(
                    self.table,
                    board.index(),
                    pending_learner_state,
                    self.alpha,
                ));
            }
            if record.updated_value.is_some() {
                updates += 1;
            }

            for observer in self.observers.iter_mut() {
                observer.on_move(game_num, &record)?;
            }

            if outcome.is_terminal() {
                break outcome;
            }
            learner_to_move = !learner_to_move;
        };

        let record = GameRecord {
            result,
            learner_first,
            moves,
            final_board: board,
            updates,
        };
        for observer in self.observers.iter_mut() {
            observer.on_game_end(game_num, &record)?;
        }
        Ok(record)
    }
}

/// Owns the value table and drives games between the learner and an opponent.
///
/// # Examples
///
/// ```no_run
/// use ttt_td::pipeline::{Trainer, TrainingConfig};
///
/// let mut trainer = Trainer::new(TrainingConfig::default().with_seed(7)).unwrap();
/// let result = trainer.train(0.01, 0.5, 1_000).unwrap();
/// let (win_rate, loss_rate) = trainer.evaluate(0.0, 0.0, 500).unwrap();
/// println!("{} games, {win_rate:.2} win, {loss_rate:.2} loss", result.total_games);
/// ```
pub struct Trainer {
    config: TrainingConfig,
    table: ValueTable,
    policy: EpsilonGreedy,
    opponent: Box<dyn Actor>,
    observers: Vec<Box<dyn Observer>>,
    opening_rng: StdRng,
    alpha: f64,
    games_played: usize,
}

impl Trainer {
    /// Create a trainer with a freshly initialized table and a random opponent
    pub fn new(config: TrainingConfig) -> Result<Self> {
        let mut policy = EpsilonGreedy::new(config.epsilon)?;
        let mut opponent = RandomActor::new("Random".to_string());
        let opening_rng = match config.seed {
            Some(seed) => {
                policy.reseed(seed);
                opponent.set_rng_seed(seed.wrapping_add(1))?;
                StdRng::seed_from_u64(seed.wrapping_add(2))
            }
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            config,
            table: ValueTable::with_terminal_values(),
            policy,
            opponent: Box::new(opponent),
            observers: Vec::new(),
            opening_rng,
            alpha: 0.0,
            games_played: 0,
        })
    }

    /// Replace the training opponent
    pub fn with_opponent(mut self, opponent: Box<dyn Actor>) -> Self {
        self.opponent = opponent;
        self
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Detach every observer
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    /// Games played since construction
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Play `num_games` learning games at fixed `epsilon` and `alpha`
    pub fn train(&mut self, epsilon: f64, alpha: f64, num_games: usize) -> Result<TrainingResult> {
        self.prepare(epsilon, alpha)?;
        self.notify_training_start(num_games)?;
        let result = self.play_block(num_games)?;
        self.notify_training_end()?;
        Ok(result)
    }

    /// Estimate `(win_rate, loss_rate)` against the opponent.
    ///
    /// Games still learn at `alpha`; pass `alpha = 0.0` to keep the table frozen.
    pub fn evaluate(&mut self, epsilon: f64, alpha: f64, num_games: usize) -> Result<(f64, f64)> {
        let result = self.train(epsilon, alpha, num_games)?;
        Ok((result.win_rate, result.loss_rate))
    }

    /// Run every epoch of `plan`, each at the alpha its schedule assigns
    pub fn run_plan(&mut self, plan: &EpochPlan) -> Result<Vec<EpochReport>> {
        plan.validate()?;
        self.policy.set_epsilon(plan.epsilon)?;
        self.notify_training_start(plan.total_games())?;

        let mut reports = Vec::with_capacity(plan.epochs);
        for epoch in 1..=plan.epochs {
            self.alpha = plan.alpha.alpha_for_epoch(epoch);
            let result = self.play_block(plan.games_per_epoch)?;
            let report = EpochReport {
                epoch,
                alpha: self.alpha,
                result,
            };
            for observer in &mut self.observers {
                observer.on_epoch_end(&report)?;
            }
            reports.push(report);
        }

        self.notify_training_end()?;
        Ok(reports)
    }

    /// Learner's reply on `board` for interactive use; never updates the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if the game on `board` is already over.
    pub fn choose_move(&mut self, board: &Board, epsilon: f64) -> Result<Board> {
        if board.outcome().is_terminal() {
            return Err(Error::NoValidMoves);
        }
        ensure_unit_interval("epsilon", epsilon)?;
        let saved = self.policy.epsilon();
        self.policy.set_epsilon(epsilon)?;
        let decision = self.policy.decide(board, &self.table);
        self.policy.set_epsilon(saved)?;
        Ok(decision?.board)
    }

    /// Play one learning game against the trainer's own opponent at the
    /// current alpha
    pub fn play_game(&mut self, learner_first: bool) -> Result<GameRecord> {
        let Self {
            table,
            policy,
            opponent,
            observers,
            alpha,
            games_played,
            ..
        } = self;
        let mut ctx = GameContext {
            table,
            policy,
            observers,
            alpha: *alpha,
            update: true,
        };
        let record = ctx.play(&mut **opponent, *games_played, learner_first)?;
        *games_played += 1;
        Ok(record)
    }

    /// Play one game against an outside actor such as a human.
    ///
    /// The learner keeps learning at `alpha` and explores at `epsilon`.
    pub fn play_against(
        &mut self,
        opponent: &mut dyn Actor,
        learner_first: bool,
        epsilon: f64,
        alpha: f64,
    ) -> Result<GameRecord> {
        self.prepare(epsilon, alpha)?;
        let mut ctx = GameContext {
            table: &mut self.table,
            policy: &mut self.policy,
            observers: &mut self.observers,
            alpha,
            update: true,
        };
        let record = ctx.play(opponent, self.games_played, learner_first)?;
        self.games_played += 1;
        Ok(record)
    }

    /// Decide who opens the next game according to the configuration
    pub fn next_learner_first(&mut self) -> bool {
        match self.config.first_mover {
            FirstMover::Learner => true,
            FirstMover::Opponent => false,
            FirstMover::Alternate => self.games_played % 2 == 0,
            FirstMover::CoinFlip => self.opening_rng.random::<f64>() < 0.5,
        }
    }

    fn prepare(&mut self, epsilon: f64, alpha: f64) -> Result<()> {
        ensure_unit_interval("alpha", alpha)?;
        self.policy.set_epsilon(epsilon)?;
        self.alpha = alpha;
        Ok(())
    }

    fn play_block(&mut self, num_games: usize) -> Result<TrainingResult> {
        let mut tally = Tally::default();
        for _ in 0..num_games {
            let learner_first = self.next_learner_first();
            let record = self.play_game(learner_first)?;
            tally.record(record.result);
        }
        Ok(tally.finish())
    }

    fn notify_training_start(&mut self, total_games: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_start(total_games)?;
        }
        Ok(())
    }

    fn notify_training_end(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }
        Ok(())
    }
}
