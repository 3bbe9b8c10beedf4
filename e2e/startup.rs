// e2e/startup.rs — the `postgres` binary up to the point of dispatch
//
// Runs the binary as a black box with std::process::Command. Role programs
// are pointed at a path that does not exist, so anything that gets past the
// privilege guard ends with "could not execute".

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Locate the `postgres` binary produced by Cargo.
fn postgres_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_postgres"))
}

fn is_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Run the binary with every role program missing.
fn run(args: &[&str]) -> (Output, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::new(postgres_bin());
    cmd.args(args);
    for var in [
        "POSTGRES_SUPERVISOR_PROGRAM",
        "POSTGRES_SINGLE_PROGRAM",
        "POSTGRES_BOOT_PROGRAM",
        "POSTGRES_DESCRIBE_CONFIG_PROGRAM",
        "POSTGRES_FORKCHILD_PROGRAM",
    ] {
        cmd.env(var, dir.path().join("missing"));
    }
    let output = cmd.output().expect("failed to run postgres");
    (output, dir)
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).into_owned()
}

fn stderr(o: &Output) -> String {
    String::from_utf8_lossy(&o.stderr).into_owned()
}

// ── 1. --help / -? ───────────────────────────────────────────────────────────

#[test]
fn test_help_exits_zero() {
    for flag in ["--help", "-?"] {
        let (o, _dir) = run(&[flag]);
        assert_eq!(o.status.code(), Some(0), "{} should exit 0", flag);
        let out = stdout(&o);
        assert!(out.starts_with("postgres is the PostgreSQL server."), "got: {}", out);
        assert!(out.contains("Usage:\n  postgres [OPTION]..."));
        assert!(stderr(&o).is_empty(), "stderr: {}", stderr(&o));
    }
}

#[test]
fn test_help_only_as_first_argument() {
    let (o, _dir) = run(&["-D", "/nonexistent", "--help"]);
    assert_ne!(o.status.code(), Some(0));
    assert!(!stdout(&o).contains("Usage:"));
}

// ── 2. --version / -V ────────────────────────────────────────────────────────

#[test]
fn test_version_output() {
    let (o, _dir) = run(&["--version"]);
    assert!(o.status.success());
    assert_eq!(stdout(&o), "postgres (PostgreSQL) 12.0\n");
}

#[test]
fn test_version_ignores_remaining_arguments() {
    let (plain, _d1) = run(&["-V"]);
    let (noisy, _d2) = run(&["-V", "--single", "-D", "/nonexistent", "junk"]);
    assert!(noisy.status.success());
    assert_eq!(plain.stdout, noisy.stdout);
}

// ── 3. Privilege guard ───────────────────────────────────────────────────────

#[test]
fn test_supervisor_path_guarded() {
    let (o, _dir) = run(&["-D", "/nonexistent"]);
    assert_eq!(o.status.code(), Some(1));
    let err = stderr(&o);
    if is_root() {
        assert!(err.starts_with("\"root\" execution of the PostgreSQL server is not permitted."));
        assert!(!err.contains("could not execute"));
    } else {
        assert!(err.contains("postgres: could not execute supervisor program"), "stderr: {}", err);
    }
}

#[test]
fn test_describe_config_passes_guard() {
    let (o, _dir) = run(&["--describe-config"]);
    assert_eq!(o.status.code(), Some(1));
    let err = stderr(&o);
    assert!(err.contains("could not execute describe-config program"), "stderr: {}", err);
    assert!(!err.contains("\"root\" execution"));
}

#[test]
fn test_show_parameter_passes_guard() {
    let (o, _dir) = run(&["-C", "data_directory"]);
    assert_eq!(o.status.code(), Some(1));
    assert!(stderr(&o).contains("could not execute supervisor program"));
}

// ── 4. Environment handling ──────────────────────────────────────────────────

#[test]
fn test_bogus_locale_environment_still_starts() {
    let o = Command::new(postgres_bin())
        .arg("--version")
        .env("LC_ALL", "xx_NOWHERE.NOPE")
        .env("LC_COLLATE", "yy_NOWHERE.NOPE")
        .output()
        .unwrap();
    assert!(o.status.success(), "stderr: {}", stderr(&o));
    assert_eq!(stdout(&o), "postgres (PostgreSQL) 12.0\n");
}

#[test]
fn test_invalid_log_level_is_warned_about() {
    let o = Command::new(postgres_bin())
        .arg("--version")
        .env("POSTGRES_STARTUP_LOG_LEVEL", "loud")
        .output()
        .unwrap();
    assert!(o.status.success());
    assert!(stderr(&o).contains("WARNING:  ignoring environment variable setting POSTGRES_STARTUP_LOG_LEVEL=loud"));
}

#[test]
fn test_debug_log_level_reports_mode() {
    let o = Command::new(postgres_bin())
        .arg("--version")
        .env("POSTGRES_STARTUP_LOG_LEVEL", "debug")
        .output()
        .unwrap();
    assert!(o.status.success());
    assert!(stderr(&o).contains("DEBUG:  selected ShowVersion mode"), "stderr: {}", stderr(&o));
}
