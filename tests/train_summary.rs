use std::io::Write;

use clap::Parser;
use tempfile::{NamedTempFile, tempdir};
use ttt_td::cli::commands::train::{TrainArgs, execute};

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "ttt-td-train",
        "--epochs",
        "3",
        "--games-per-epoch",
        "20",
        "--seed",
        "11",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_games"], 60);
    assert_eq!(parsed["epochs"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["metadata"]["seed"], 11);
    assert!(parsed["evaluation"].is_null());
    assert!(parsed["coverage"].as_f64().unwrap() > 0.0);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "ttt-td-train",
        "--epochs",
        "2",
        "--games-per-epoch",
        "5",
        "--eval-games",
        "10",
        "--summary",
        &summary_arg,
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_games"], 10);
    assert_eq!(parsed["evaluation"]["games"], 10);
}

#[test]
fn config_file_values_apply_and_flags_override() {
    let tmp = tempdir().unwrap();
    let summary = tmp.path().join("summary.json");
    let observations = tmp.path().join("observations.jsonl");

    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{
            "seed": 3,
            "first_mover": "learner",
            "plan": {{
                "epochs": 4,
                "games_per_epoch": 6,
                "epsilon": 0.05,
                "alpha": {{ "kind": "constant", "alpha": 0.4 }}
            }}
        }}"#
    )
    .unwrap();

    let args = parse_args([
        "ttt-td-train",
        "--config",
        config.path().to_str().unwrap(),
        "--epochs",
        "2",
        "--observations",
        observations.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
    ]);
    execute(args).expect("training from a config file should succeed");

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(parsed["training"]["total_games"], 12);
    assert_eq!(parsed["metadata"]["first_mover"], "learner");
    assert_eq!(parsed["metadata"]["alpha_schedule"], "constant(0.4)");
    assert_eq!(parsed["metrics"]["learner_first_games"], 12);

    let log = std::fs::read_to_string(&observations).unwrap();
    assert_eq!(log.lines().count(), 12 + 2);
}

#[test]
fn out_of_range_epsilon_is_rejected() {
    let args = parse_args(["ttt-td-train", "--epsilon", "1.5", "--epochs", "1"]);
    assert!(execute(args).is_err());
}
