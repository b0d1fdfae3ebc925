//! Value table initialization, bounds and learning behaviour

mod common;

use common::{board, chi_square_uniform, seeded_trainer};
use ttt_td::{
    StateIndex, ValueTable,
    codec::decode,
    pipeline::{AlphaSchedule, EpochPlan, FirstMover},
    policy::{Choice, EpsilonGreedy},
    tictactoe::{Board, GameResult},
    value_table::PRIOR,
};

/// Chi-square critical value for 8 degrees of freedom at p = 0.001
const CHI_SQUARE_8_DOF: f64 = 26.12;

#[test]
fn terminal_values_are_pinned_for_every_index() {
    let table = ValueTable::with_terminal_values();
    for index in StateIndex::all() {
        let board = decode(index);
        let expected = if !board.is_valid() {
            0.0
        } else {
            match board.outcome() {
                GameResult::FirstWins => 1.0,
                GameResult::SecondWins => 0.0,
                GameResult::Draw | GameResult::InProgress => PRIOR,
            }
        };
        assert_eq!(table.get(index), expected, "index {}", index.get());
    }
}

#[test]
fn values_stay_in_unit_interval_and_terminals_stay_pinned() {
    let mut trainer = seeded_trainer(17, FirstMover::CoinFlip);
    trainer.train(0.1, 0.5, 3_000).unwrap();
    trainer.train(0.0, 1.0, 1_000).unwrap();

    let fresh = ValueTable::with_terminal_values();
    for index in StateIndex::all() {
        let value = trainer.table().get(index);
        assert!((0.0..=1.0).contains(&value), "index {} = {value}", index.get());

        let board = decode(index);
        if !board.is_valid() || board.outcome().is_terminal() {
            assert_eq!(value, fresh.get(index), "terminal index {} moved", index.get());
        }
    }
}

#[test]
fn greedy_training_keeps_empty_value_inside_and_improves() {
    const SEEDS: [u64; 5] = [2024, 7, 31, 512, 90_001];

    let mean = |reports: &[ttt_td::pipeline::EpochReport]| {
        reports.iter().map(|r| r.result.win_rate).sum::<f64>() / reports.len() as f64
    };
    let plan = EpochPlan {
        epochs: 30,
        games_per_epoch: 200,
        epsilon: 0.0,
        alpha: AlphaSchedule::constant(0.5),
    };

    let mut improved = 0;
    for seed in SEEDS {
        let mut trainer = seeded_trainer(seed, FirstMover::CoinFlip);
        let reports = trainer.run_plan(&plan).unwrap();

        let empty = trainer.table().get(StateIndex::EMPTY);
        assert!(empty > 0.0 && empty < 1.0, "seed {seed}: V(empty) = {empty}");

        let early = mean(&reports[..3]);
        let late = mean(&reports[reports.len() - 3..]);
        if late > early {
            improved += 1;
        }
    }
    assert!(
        improved * 2 > SEEDS.len(),
        "win rate improved for only {improved} of {} seeds",
        SEEDS.len()
    );
}

#[test]
fn trained_learner_beats_random_baseline() {
    let mut trainer = seeded_trainer(5, FirstMover::CoinFlip);
    trainer.run_plan(&EpochPlan::annealed(20, 1_000, 0.01, 0.8)).unwrap();

    let before = trainer.table().clone();
    let (win_rate, loss_rate) = trainer.evaluate(0.0, 0.0, 2_000).unwrap();
    assert_eq!(trainer.table().values(), before.values());
    assert!(win_rate > 0.6, "win rate {win_rate:.3}");
    assert!(loss_rate < 0.2, "loss rate {loss_rate:.3}");
}

#[test]
fn greedy_tie_break_is_uniform_on_empty_board() {
    let table = ValueTable::with_terminal_values();
    let mut policy = EpsilonGreedy::new(0.0).unwrap().with_seed(99);
    let mut counts = [0usize; 9];
    for _ in 0..9_000 {
        let decision = policy.decide(&Board::new(), &table).unwrap();
        assert_eq!(decision.choice, Choice::Greedy { value: PRIOR, ties: 9 });
        counts[decision.position] += 1;
    }

    for (pos, &count) in counts.iter().enumerate() {
        assert!((800..=1200).contains(&count), "position {pos} chosen {count} times");
    }
    assert!(chi_square_uniform(&counts) < CHI_SQUARE_8_DOF);
}

#[test]
fn greedy_tie_break_splits_two_winning_moves() {
    // X X . / O X . / O . O: both 2 (top row) and 7 (middle column) win
    let position = board("XX. OX. O.O");
    let table = ValueTable::with_terminal_values();
    let mut policy = EpsilonGreedy::new(0.0).unwrap().with_seed(4);

    let (mut top, mut column) = (0, 0);
    for _ in 0..2_000 {
        let decision = policy.decide(&position, &table).unwrap();
        assert_eq!(decision.choice, Choice::Greedy { value: 1.0, ties: 2 });
        match decision.position {
            2 => top += 1,
            7 => column += 1,
            other => panic!("picked non-maximal cell {other}"),
        }
    }
    assert!((850..=1150).contains(&top), "top row chosen {top} times");
    assert_eq!(top + column, 2_000);
}
