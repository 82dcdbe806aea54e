use std::io::Write;
use std::process::{Command, Stdio};

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "platte-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_simulates_seeds_into_json_report() {
    let exe = env!("CARGO_BIN_EXE_platte-tester");
    let output_path = temp_path("sim.json");
    let output = Command::new(exe)
        .args([
            "--seeds",
            "7,OR-WAGON42",
            "--iterations",
            "2",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{output:?}");

    let content = std::fs::read_to_string(output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(value["runs"].as_array().map(Vec::len), Some(4));
    assert!(value["aggregates"].as_array().is_some_and(|a| !a.is_empty()));
}

#[test]
fn cli_writes_markdown_for_every_strategy() {
    let exe = env!("CARGO_BIN_EXE_platte-tester");
    let output_path = temp_path("sim.md");
    let status = Command::new(exe)
        .args([
            "--trail",
            "california",
            "--strategies",
            "all",
            "--iterations",
            "1",
            "--report",
            "markdown",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("# Perils Along the Platte Simulation Results"));
    assert!(content.contains("| Gambler | california |"));
}

#[test]
fn cli_play_mode_reads_commands_from_stdin() {
    let exe = env!("CARGO_BIN_EXE_platte-tester");
    let mut child = Command::new(exe)
        .args(["--mode", "play", "--seeds", "CA-PONY11", "--save-dir"])
        .arg(temp_path("saves"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"status\nrest\nquit\n")
        .expect("write commands");
    let output = child.wait_with_output().expect("wait for cli");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("CA-PONY11"));
    assert!(text.contains("Day 1"));
}

#[test]
fn cli_rejects_unknown_seed_tokens() {
    let exe = env!("CARGO_BIN_EXE_platte-tester");
    let output = Command::new(exe)
        .args(["--seeds", "not-a-seed", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}
