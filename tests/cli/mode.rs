// Integration tests for cli/mode.rs — execution-mode classification
//
//   - first argument alone selects the mode, exact match, fixed order
//   - `--fork*` only in fork-emulating builds
//   - privilege-check exemptions for read-only configuration queries

use postgres_main::cli::mode::{classify_with, ExecutionMode, PrivilegeCheck};
use postgres_main::ps_status::RawArguments;

fn raw(a: &[&str]) -> RawArguments {
    RawArguments::new(a.iter().copied())
}

fn mode(a: &[&str], exec_backend: bool) -> ExecutionMode {
    classify_with(&raw(a), exec_backend).mode
}

fn check(a: &[&str]) -> PrivilegeCheck {
    classify_with(&raw(a), false).privilege_check
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode selection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fork_arguments_need_exec_backend() {
    assert_eq!(mode(&["postgres", "--forkbackend", "x"], true), ExecutionMode::ForkedWorker);
    assert_eq!(mode(&["postgres", "--forkavlauncher"], true), ExecutionMode::ForkedWorker);
    assert_eq!(mode(&["postgres", "--fork"], true), ExecutionMode::ForkedWorker);
    assert_eq!(mode(&["postgres", "--forkbackend"], false), ExecutionMode::Supervisor);
    assert_eq!(mode(&["postgres", "--for"], true), ExecutionMode::Supervisor);
}

#[test]
fn help_and_version_win_over_fork_prefix() {
    assert_eq!(mode(&["postgres", "--help"], true), ExecutionMode::ShowHelp);
    assert_eq!(mode(&["postgres", "-V"], true), ExecutionMode::ShowVersion);
}

#[test]
fn selectors_are_case_sensitive_and_exact() {
    assert_eq!(mode(&["postgres", "--Single"], false), ExecutionMode::Supervisor);
    assert_eq!(mode(&["postgres", "--boot=1"], false), ExecutionMode::Supervisor);
    assert_eq!(mode(&["postgres", "-v"], false), ExecutionMode::Supervisor);
    assert_eq!(mode(&["postgres", "--versions"], false), ExecutionMode::Supervisor);
}

#[test]
fn residual_is_everything_after_first_argument() {
    let args = raw(&["postgres", "--single", "-D", "/data", "mydb"]);
    let inv = classify_with(&args, false);
    let residual: Vec<_> = inv.residual.iter().map(|a| a.to_str().unwrap()).collect();
    assert_eq!(residual, ["-D", "/data", "mydb"]);

    let args = raw(&["postgres"]);
    assert!(classify_with(&args, false).residual.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Privilege check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn describe_config_is_exempt_wherever_it_appears() {
    assert_eq!(check(&["postgres", "--describe-config"]), PrivilegeCheck::Exempt);
    assert_eq!(check(&["postgres", "-D", "/data", "--describe-config"]), PrivilegeCheck::Exempt);
}

#[test]
fn show_parameter_exempt_only_first_with_value() {
    assert_eq!(check(&["postgres", "-C", "data_directory"]), PrivilegeCheck::Exempt);
    assert_eq!(check(&["postgres", "-C"]), PrivilegeCheck::Required);
    assert_eq!(check(&["postgres", "-D", "/data", "-C", "port"]), PrivilegeCheck::Required);
}

#[test]
fn everything_else_requires_check() {
    assert_eq!(check(&["postgres"]), PrivilegeCheck::Required);
    assert_eq!(check(&["postgres", "--single", "mydb"]), PrivilegeCheck::Required);
    assert_eq!(check(&["postgres", "--boot"]), PrivilegeCheck::Required);
    assert_eq!(check(&[]), PrivilegeCheck::Required);
}
