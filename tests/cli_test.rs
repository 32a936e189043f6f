//! CLI contract tests
//!
//! Runs the built binary against a fixture team with an explicit window so
//! results do not depend on the current date.

use std::path::Path;
use std::process::Command;

fn teampulse_bin() -> &'static str {
    env!("CARGO_BIN_EXE_teampulse")
}

fn fixture() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/team.json")
}

const WINDOW: [&str; 4] = ["--start", "2024-05-01", "--end", "2024-06-01"];

fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(teampulse_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run teampulse");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn run_json(command: &str, extra: &[&str]) -> serde_json::Value {
    let mut args = vec![command, fixture()];
    args.extend_from_slice(&WINDOW);
    args.extend_from_slice(&["--format", "json"]);
    args.extend_from_slice(extra);
    let (code, stdout, stderr) = run(&args);
    assert_eq!(code, 0, "stderr: {stderr}");
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

#[test]
fn test_report_json() {
    let report = run_json("report", &[]);

    assert_eq!(report["team_id"], 7);
    assert_eq!(report["member_count"], 6);

    let overall = report["three_es"]["overall"]["overall_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&overall));
    // The June message falls outside the window
    assert_eq!(report["three_es"]["energy"]["total_communications"], 11);
    assert_eq!(report["three_es"]["exploration"]["cross_team_communications"], 2);
    assert_eq!(report["three_es"]["exploration"]["external_teams_contacted"], 2);

    assert_eq!(report["network"]["num_nodes"], 6);
    assert_eq!(report["network"]["is_connected"], true);
    // Barbara (4) is the only link between {1, 2, 3} and {5, 6}
    let bottlenecks = report["network"]["potential_bottlenecks"].as_array().unwrap();
    assert!(bottlenecks.contains(&serde_json::json!(4)));
}

#[test]
fn test_score_json_has_ratings_and_recommendations() {
    let score = run_json("score", &[]);
    for key in ["energy", "engagement", "exploration"] {
        assert!(score["ratings"][key].is_string(), "missing rating for {key}");
    }
    assert!(!score["recommendations"].as_array().unwrap().is_empty());
}

#[test]
fn test_communities_json_is_deterministic() {
    let first = run_json("communities", &[]);
    let second = run_json("communities", &[]);
    assert_eq!(first, second);
    assert_eq!(first["seed"], 42);
    let total: u64 = first["communities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["size"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 6);
}

#[test]
fn test_text_output() {
    let mut args = vec!["centrality", fixture()];
    args.extend_from_slice(&WINDOW);
    let (code, stdout, _) = run(&args);
    assert_eq!(code, 0);
    assert!(stdout.contains("KEY ROLES"));
    assert!(stdout.contains("Barbara"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("network.json");
    let out_str = out.to_str().unwrap();

    let mut args = vec!["network", fixture()];
    args.extend_from_slice(&WINDOW);
    args.extend_from_slice(&["--format", "json", "--output", out_str]);
    let (code, stdout, _) = run(&args);
    assert_eq!(code, 0);
    assert!(stdout.trim().is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["num_nodes"], 6);
}

#[test]
fn test_init_then_custom_config() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run(&["init", dir.path().to_str().unwrap()]);
    assert_eq!(code, 0);
    let config_path = dir.path().join("teampulse.toml");
    assert!(config_path.exists());

    // A different seed is echoed back in the partition
    let custom = dir.path().join("custom.toml");
    std::fs::write(&custom, "[community]\nseed = 7\n").unwrap();
    let partition = run_json("communities", &["--config", custom.to_str().unwrap()]);
    assert_eq!(partition["seed"], 7);
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.toml");
    std::fs::write(
        &bad,
        "[overall]\nenergy = 0.9\nengagement = 0.9\nexploration = 0.9\n",
    )
    .unwrap();

    let mut args = vec!["score", fixture(), "--config", bad.to_str().unwrap()];
    args.extend_from_slice(&WINDOW);
    let (code, _, stderr) = run(&args);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr}");
}

#[test]
fn test_missing_input_fails() {
    let (code, _, stderr) = run(&["score", "does-not-exist.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to read"), "stderr: {stderr}");
}

#[test]
fn test_inconsistent_data_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("team.json");
    std::fs::write(
        &input,
        r#"{"members": [{"id": 1, "name": "A", "team_id": 1}],
            "communications": [{"sender_id": 2, "receiver_id": 1, "team_id": 1,
                                "timestamp": "2024-05-02T10:00:00Z"}]}"#,
    )
    .unwrap();

    let mut args = vec!["score", input.to_str().unwrap()];
    args.extend_from_slice(&WINDOW);
    let (code, _, stderr) = run(&args);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown sender 2"), "stderr: {stderr}");
    assert!(Path::new(&input).exists());
}
