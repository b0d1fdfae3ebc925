//! Epsilon-greedy afterstate actor and the TD(0) update rule
//!
//! The learner always places the first mark. On each turn it either explores
//! (uniform random empty cell, no learning) or plays greedily: every empty
//! cell is scored by the table value of the afterstate it produces and one of
//! the maximizers is picked uniformly. A greedy move also updates the value of
//! the learner's previous afterstate toward the value of the new one, skipping
//! over the opponent's reply in between.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    codec::StateIndex,
    error::ensure_unit_interval,
    tictactoe::{Board, Player},
    value_table::ValueTable,
};

/// Mark placed by the learner
pub const LEARNER: Player = Player::First;

/// How a move was chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Choice {
    /// Uniform random empty cell
    Explore,
    /// Highest-valued afterstate; `ties` counts the maximizers drawn from
    Greedy { value: f64, ties: usize },
}

impl Choice {
    pub fn is_greedy(&self) -> bool {
        matches!(self, Choice::Greedy { .. })
    }
}

/// Result of one learner decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Board after the learner's mark was placed
    pub board: Board,
    /// Index of `board`, the learner's new afterstate
    pub index: StateIndex,
    pub position: usize,
    pub choice: Choice,
}

/// Maximal afterstate value over the empty cells and every cell reaching it.
///
/// Values are compared exactly, so equal estimates form one tie group.
pub fn greedy_candidates(board: &Board, table: &ValueTable) -> (f64, Vec<usize>) {
    let index = board.index();
    let mut best_value = f64::NEG_INFINITY;
    let mut best = Vec::new();
    for pos in board.empty_positions() {
        let value = table.get(index.after_placing(pos, LEARNER));
        if value > best_value {
            best_value = value;
            best.clear();
            best.push(pos);
        } else if value == best_value {
            best.push(pos);
        }
    }
    (best_value, best)
}

/// Pull the learner's pending afterstate toward the board that just beat it.
///
/// The losing board is terminal and pinned to 0.0, so this is the ordinary
/// TD(0) step with a target that has no future of its own.
pub fn learn_from_loss(
    table: &mut ValueTable,
    losing_board: StateIndex,
    last_state: StateIndex,
    alpha: f64,
) -> f64 {
    table.bootstrap(last_state, losing_board, alpha)
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Epsilon-greedy actor over a [`ValueTable`]
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl EpsilonGreedy {
    /// Create an actor exploring with probability `epsilon`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `epsilon` is outside `[0, 1]`.
    pub fn new(epsilon: f64) -> Result<Self> {
        ensure_unit_interval("epsilon", epsilon)?;
        Ok(Self {
            epsilon,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// Seed of the current random stream, if one was set
    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        ensure_unit_interval("epsilon", epsilon)?;
        self.epsilon = epsilon;
        Ok(())
    }

    /// Choose and place the learner's mark without touching the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if the board is full; callers check
    /// for terminal boards before asking for a move.
    pub fn decide(&mut self, board: &Board, table: &ValueTable) -> Result<Decision> {
        let empty = board.empty_positions();
        if empty.is_empty() {
            return Err(Error::NoValidMoves);
        }

        let (position, choice) = if self.rng.random::<f64>() < self.epsilon {
            let position = empty[self.rng.random_range(0..empty.len())];
            (position, Choice::Explore)
        } else {
            let (value, best) = greedy_candidates(board, table);
            let position = best[self.rng.random_range(0..best.len())];
            (
                position,
                Choice::Greedy {
                    value,
                    ties: best.len(),
                },
            )
        };

        let next = board.with_move(position, LEARNER)?;
        Ok(Decision {
            board: next,
            index: board.index().after_placing(position, LEARNER),
            position,
            choice,
        })
    }

    /// Decide a move and, for greedy moves with `update` set, apply
    /// `V(last_state) += alpha * (V(new afterstate) - V(last_state))`.
    ///
    /// `last_state` is the learner's afterstate from its previous turn, i.e.
    /// the board before the opponent's intervening move. Exploratory moves
    /// never update.
    pub fn act(
        &mut self,
        board: &Board,
        table: &mut ValueTable,
        last_state: StateIndex,
        alpha: f64,
        update: bool,
    ) -> Result<Decision> {
        let decision = self.decide(board, table)?;
        if update && decision.choice.is_greedy() {
            table.bootstrap(last_state, decision.index, alpha);
        }
        Ok(decision)
    }
}
