use std::path::PathBuf;
use std::process::Command;

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "boardwalk-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_boardwalk-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("fallback-integrity"));
}

#[test]
fn cli_runs_fallback_integrity_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_boardwalk-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "fallback-integrity,unknown",
            "--iterations",
            "1",
            "--seeds",
            "1,2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Boardwalk Rules Tester"));
    assert!(stderr.contains("Unknown scenario"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let json_part = content
        .split("🏁")
        .next()
        .expect("report body before the timing footer");
    let results: serde_json::Value = serde_json::from_str(json_part.trim()).expect("json report");
    let results = results.as_array().expect("array of results");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_fails_on_unreadable_board() {
    let exe = env!("CARGO_BIN_EXE_boardwalk-tester");
    let output = Command::new(exe)
        .args(["--board", "/definitely/not/here/board.json", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load board and rules"));
}
