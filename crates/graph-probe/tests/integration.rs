#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONNECTION_VARS: [&str; 3] = ["NEO4J_URI", "NEO4J_USER", "NEO4J_PASSWORD"];

/// The probe binary running in `dir` with no connection settings inherited.
fn probe(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("graph-probe").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("GRAPH_PROBE_LOG_FILE");
    for var in CONNECTION_VARS {
        cmd.env_remove(var);
    }
    cmd
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn empty_environment_fails_naming_every_variable() {
    let dir = TempDir::new().unwrap();
    probe(&dir)
        .arg("--no-dotenv")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "NEO4J_URI, NEO4J_USER, NEO4J_PASSWORD must be set",
        ))
        .stdout(predicate::str::contains("Initializing graph client").not());
}

#[test]
fn empty_value_is_treated_as_missing() {
    let dir = TempDir::new().unwrap();
    probe(&dir)
        .arg("--no-dotenv")
        .env("NEO4J_URI", "bolt://x")
        .env("NEO4J_USER", "u")
        .env("NEO4J_PASSWORD", "")
        .assert()
        .failure()
        .stdout(predicate::str::contains("NEO4J_PASSWORD must be set"))
        .stdout(predicate::str::contains("NEO4J_URI,").not())
        .stdout(predicate::str::contains("Connecting to Neo4j").not());
}

#[test]
fn dotenv_file_seeds_missing_variables() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "NEO4J_URI=bolt://x\n").unwrap();
    probe(&dir)
        .assert()
        .failure()
        .stdout(predicate::str::contains("NEO4J_USER, NEO4J_PASSWORD must be set"))
        .stdout(predicate::str::contains("Loaded environment from"));
}

#[test]
fn no_dotenv_flag_ignores_env_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "NEO4J_URI=bolt://x\n").unwrap();
    probe(&dir)
        .arg("--no-dotenv")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "NEO4J_URI, NEO4J_USER, NEO4J_PASSWORD must be set",
        ));
}

// ---------------------------------------------------------------------------
// log file
// ---------------------------------------------------------------------------

#[test]
fn default_log_file_is_written_in_working_directory() {
    let dir = TempDir::new().unwrap();
    // Piped stdout is not a terminal, so the console lines carry no colour.
    probe(&dir)
        .arg("--no-dotenv")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Starting graph client probe"))
        .stdout(predicate::str::contains("\u{1b}").not());

    let log = std::fs::read_to_string(dir.path().join("graph_probe_debug.log")).unwrap();
    assert!(log.contains("Starting graph client probe"));
    assert!(log.contains(" - ERROR - "));
    assert!(log.contains("must be set"));
    // File output is plain text.
    assert!(!log.contains('\u{1b}'));
}

#[test]
fn log_file_flag_overrides_path_and_appends() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.log");

    probe(&dir)
        .arg("--no-dotenv")
        .arg("--log-file")
        .arg(&path)
        .assert()
        .failure();
    probe(&dir)
        .arg("--no-dotenv")
        .arg("--log-file")
        .arg(&path)
        .assert()
        .failure();

    let log = std::fs::read_to_string(&path).unwrap();
    assert_eq!(log.matches("Starting graph client probe").count(), 2);
    assert!(!dir.path().join("graph_probe_debug.log").exists());
}

#[test]
fn unwritable_log_file_is_a_startup_error() {
    let dir = TempDir::new().unwrap();
    probe(&dir)
        .arg("--log-file")
        .arg(dir.path().join("missing-dir").join("probe.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open log file"));
}

// ---------------------------------------------------------------------------
// cli surface
// ---------------------------------------------------------------------------

#[test]
fn help_lists_optional_flags() {
    let dir = TempDir::new().unwrap();
    probe(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--strict"))
        .stdout(predicate::str::contains("--log-file"));
}
