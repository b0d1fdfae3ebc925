//! Random-vs-random null model
//!
//! Two uniformly random actors play each other; the rates for the first mark
//! are the yardstick a trained learner has to beat.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    opponents::RandomActor,
    training::{Tally, TrainingResult},
};
use crate::{
    Result,
    ports::Actor,
    tictactoe::{Board, GameResult, Player},
};

/// Play one game between two actors; `first` holds the first mark.
fn play_out<'a>(
    first: &'a mut dyn Actor,
    second: &'a mut dyn Actor,
    first_opens: bool,
) -> Result<GameResult> {
    let mut board = Board::new();
    let mut to_move = if first_opens {
        Player::First
    } else {
        Player::Second
    };
    loop {
        let actor = match to_move {
            Player::First => &mut *first,
            Player::Second => &mut *second,
        };
        let position = actor.select_move(&board)?;
        board.place(position, to_move)?;

        let outcome = board.outcome();
        if outcome.is_terminal() {
            return Ok(outcome);
        }
        to_move = to_move.opponent();
    }
}

/// Win/draw/loss rates of the first mark when both sides play at random.
///
/// Who opens is a fair coin per game. With a seed the estimate is reproducible.
pub fn estimate_random_baseline(num_games: usize, seed: Option<u64>) -> Result<TrainingResult> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut first = RandomActor::with_seed("Random X".to_string(), rng.random());
    let mut second = RandomActor::with_seed("Random O".to_string(), rng.random());

    let mut tally = Tally::default();
    for _ in 0..num_games {
        let first_opens = rng.random::<f64>() < 0.5;
        tally.record(play_out(&mut first, &mut second, first_opens)?);
    }
    Ok(tally.finish())
}
