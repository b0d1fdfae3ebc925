//! Built-in opponents for training and evaluation

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{Result, ports::Actor, tictactoe::Board};

/// Uniformly random opponent, the fixed baseline the learner trains against
pub struct RandomActor {
    name: String,
    rng: StdRng,
}

impl RandomActor {
    /// Create a new random actor
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random actor with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Actor for RandomActor {
    fn select_move(&mut self, board: &Board) -> Result<usize> {
        let moves = board.empty_positions();
        if moves.is_empty() {
            return Err(crate::Error::NoValidMoves);
        }
        let index = self.rng.random_range(0..moves.len());
        Ok(moves[index])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Opponent replaying a fixed list of positions, for reproducing games
pub struct ScriptedActor {
    name: String,
    moves: Vec<usize>,
    next: usize,
}

impl ScriptedActor {
    pub fn new(name: String, moves: Vec<usize>) -> Self {
        Self {
            name,
            moves,
            next: 0,
        }
    }

    /// Restart the script from its first move
    pub fn rewind(&mut self) {
        self.next = 0;
    }
}

impl Actor for ScriptedActor {
    fn select_move(&mut self, board: &Board) -> Result<usize> {
        let position = *self
            .moves
            .get(self.next)
            .ok_or(crate::Error::NoValidMoves)?;
        if position >= 9 || !board.is_empty(position) {
            return Err(crate::Error::InvalidMove { position });
        }
        self.next += 1;
        Ok(position)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    #[test]
    fn test_random_actor_only_picks_empty_cells() {
        let mut actor = RandomActor::with_seed("Random".to_string(), 9);
        let board = Board::from_string("XOX .O. X.O").unwrap();
        for _ in 0..100 {
            let pos = actor.select_move(&board).unwrap();
            assert!(board.is_empty(pos));
        }
    }

    #[test]
    fn test_random_actor_is_reproducible() {
        let board = Board::new();
        let mut a = RandomActor::with_seed("A".to_string(), 42);
        let mut b = RandomActor::new("B".to_string());
        b.set_rng_seed(42).unwrap();
        for _ in 0..20 {
            assert_eq!(a.select_move(&board).unwrap(), b.select_move(&board).unwrap());
        }
    }

    #[test]
    fn test_random_actor_full_board() {
        let mut actor = RandomActor::with_seed("Random".to_string(), 1);
        let full = Board::from_string("XOX XOO OXX").unwrap();
        assert!(actor.select_move(&full).is_err());
    }

    #[test]
    fn test_scripted_actor_replays_and_rejects_occupied() {
        let mut actor = ScriptedActor::new("Script".to_string(), vec![4, 0]);
        let mut board = Board::new();
        assert_eq!(actor.select_move(&board).unwrap(), 4);
        board.place(0, Player::First).unwrap();
        assert!(matches!(
            actor.select_move(&board),
            Err(crate::Error::InvalidMove { position: 0 })
        ));
        actor.rewind();
        assert_eq!(actor.select_move(&board).unwrap(), 4);
    }
}
