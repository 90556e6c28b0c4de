//! CLI integration tests

use std::io::Write;
use std::process::{Command, Output, Stdio};

const FLEET: &str = r#"
items:
- kind: Node
  metadata:
    name: node01
    labels:
      cpu-model.node.kubevirt.io/Haswell: "true"
      cpu-model.node.kubevirt.io/Penryn: "true"
      host-model-cpu.node.kubevirt.io/Haswell: "true"
  status:
    allocatable:
      devices.kubevirt.io/kvm: 1k
- kind: Node
  metadata:
    name: node02
    labels:
      cpu-model.node.kubevirt.io/Penryn: "true"
  status:
    allocatable:
      devices.kubevirt.io/kvm: "0"
"#;

/// Run the CLI with a clean environment, an isolated home directory and
/// the given stdin
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let home = tempfile::tempdir().expect("Failed to create temp home");
    let mut child = Command::new(env!("CARGO_BIN_EXE_cpu-models"))
        .args(args)
        .env_clear()
        .env("HOME", home.path())
        .env("PATH", std::env::var_os("PATH").unwrap_or_default())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"], "");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("CPU model compatibility report"), "Should show about");
    assert!(stdout.contains("report"), "Should show report command");
    assert!(stdout.contains("inspect"), "Should show inspect command");
    assert!(stdout.contains("--eligibility"), "Should show eligibility option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_cli(&["--version"], "");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("cpu-models"), "Should show binary name");
}

/// Default run filters on the KVM device and prints YAML
#[test]
fn test_default_report_from_stdin() {
    let output = run_cli(&[], FLEET);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Report should succeed");
    assert_eq!(
        stdout,
        "cpuModelNodeInfo:\n\
         - cpuModelCompatibleNodeCount: 1\n  \
         cpuModelName: Haswell\n  \
         hostModelCompatibleNodeCount: 1\n\
         - cpuModelCompatibleNodeCount: 1\n  \
         cpuModelName: Penryn\n  \
         hostModelCompatibleNodeCount: 0\n\
         totalNodeCount: 1\n"
    );
}

/// Counting every node changes the ranking
#[test]
fn test_report_all_nodes_json() {
    let output = run_cli(&["report", "--eligibility", "all", "--format", "json"], FLEET);
    assert!(output.status.success(), "Report should succeed");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(value["totalNodeCount"], 2);
    assert_eq!(value["cpuModelNodeInfo"][0]["cpuModelName"], "Penryn");
    assert_eq!(value["cpuModelNodeInfo"][0]["cpuModelCompatibleNodeCount"], 2);
    assert_eq!(value["cpuModelNodeInfo"][1]["cpuModelName"], "Haswell");
}

/// Empty input yields an empty report
#[test]
fn test_empty_input() {
    let output = run_cli(&[], "");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Empty input should succeed");
    assert_eq!(stdout, "cpuModelNodeInfo: []\ntotalNodeCount: 0\n");
}

/// Malformed labels abort with no report on stdout
#[test]
fn test_malformed_label_fails() {
    let input = r#"
items:
- metadata:
    name: bad
    labels:
      cpu-model.node.kubevirt.io/a/b: "true"
"#;
    let output = run_cli(&["--eligibility", "all"], input);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Malformed label should fail");
    assert!(output.stdout.is_empty(), "No partial output");
    assert!(stderr.contains("cpu-model.node.kubevirt.io/a/b"), "Should name the key");
}

/// Invalid documents are reported as input errors
#[test]
fn test_malformed_document_fails() {
    let output = run_cli(&[], "items: [unterminated");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Malformed document should fail");
    assert!(stderr.contains("Failed to load node list from stdin"));
}

/// Empty model names can be skipped instead of rejected
#[test]
fn test_empty_model_name_policy_flag() {
    let input = r#"
items:
- metadata:
    name: odd
    labels:
      cpu-model.node.kubevirt.io/: "true"
"#;
    let rejected = run_cli(&["--eligibility", "all"], input);
    assert!(!rejected.status.success(), "Empty model should be rejected");

    let skipped = run_cli(
        &["--eligibility", "all", "--empty-model-names", "skip"],
        input,
    );
    let stdout = String::from_utf8_lossy(&skipped.stdout);
    assert!(skipped.status.success(), "Empty model should be skipped");
    assert_eq!(stdout, "cpuModelNodeInfo: []\ntotalNodeCount: 1\n");
}

/// Input can come from a file, and settings from a config file
#[test]
fn test_input_file_and_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nodes.yaml");
    std::fs::write(&input, FLEET).unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "eligibility = \"all\"\nformat = \"table\"\n").unwrap();

    let output = run_cli(
        &[
            "--input",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
        "",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Report should succeed");
    assert!(stdout.contains("CPU Model"), "Should render a table");
    assert!(stdout.contains("Penryn"));
    assert!(stdout.contains("Eligible nodes: 2 of 2"));
}

/// Inspect lists every node with its eligibility
#[test]
fn test_inspect() {
    let output = run_cli(&["inspect", "--format", "json"], FLEET);
    assert!(output.status.success(), "Inspect should succeed");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(value[0]["name"], "node01");
    assert_eq!(value[0]["eligible"], true);
    assert_eq!(value[0]["hostModels"][0], "Haswell");
    assert_eq!(value[1]["name"], "node02");
    assert_eq!(value[1]["eligible"], false);
}

/// Missing input file fails with the path in the message
#[test]
fn test_missing_input_file() {
    let output = run_cli(&["--input", "/nonexistent/nodes.yaml"], "");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("/nonexistent/nodes.yaml"));
}
