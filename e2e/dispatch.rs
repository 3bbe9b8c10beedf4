// e2e/dispatch.rs — handing the process to a role program
//
// Each role program is replaced by a small shell script that records its
// arguments and the session environment, then exits with a marker status.
// Since the binary execs the role program, the marker status is what the
// caller sees.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const MARKER_STATUS: i32 = 42;

fn postgres_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_postgres"))
}

fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// A directory holding one recording script per role.
struct Roles {
    dir: TempDir,
}

impl Roles {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for role in ["supervisor", "single", "boot", "describe-config"] {
            let script = format!(
                "#!/bin/sh\n\
                 printf '%s\\n' \"$@\" > \"{dir}/{role}.args\"\n\
                 printf '%s\\n' \"$POSTGRES_SESSION_USER\" \"$POSTGRES_SESSION_DATABASE\" \"$PGSYSCONFDIR\" > \"{dir}/{role}.env\"\n\
                 exit {status}\n",
                dir = dir.path().display(),
                role = role,
                status = MARKER_STATUS,
            );
            let path = dir.path().join(role);
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        Roles { dir }
    }

    fn path(&self, role: &str) -> PathBuf {
        self.dir.path().join(role)
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .env_remove("PGSYSCONFDIR")
            .output()
            .expect("failed to run postgres")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(postgres_bin());
        cmd.args(args)
            .env("POSTGRES_SUPERVISOR_PROGRAM", self.path("supervisor"))
            .env("POSTGRES_SINGLE_PROGRAM", self.path("single"))
            .env("POSTGRES_BOOT_PROGRAM", self.path("boot"))
            .env("POSTGRES_DESCRIBE_CONFIG_PROGRAM", self.path("describe-config"))
            .env_remove("POSTGRES_SESSION_USER")
            .env_remove("POSTGRES_SESSION_DATABASE");
        cmd
    }

    /// Lines recorded by `role`, or `None` if it never ran.
    fn recorded(&self, role: &str, kind: &str) -> Option<Vec<String>> {
        let file = self.dir.path().join(format!("{}.{}", role, kind));
        read_lines(&file)
    }
}

fn read_lines(path: &Path) -> Option<Vec<String>> {
    let text = fs::read_to_string(path).ok()?;
    Some(text.lines().map(str::to_owned).collect())
}

// ── 1. Mode selection reaches the right program ──────────────────────────────

#[test]
fn test_supervisor_receives_all_arguments() {
    if is_root() {
        return;
    }
    let roles = Roles::new();
    let o = roles.run(&["-D", "/data", "-c", "port=5433"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS), "stderr: {}", String::from_utf8_lossy(&o.stderr));
    assert_eq!(roles.recorded("supervisor", "args").unwrap(), ["-D", "/data", "-c", "port=5433"]);
    assert!(roles.recorded("boot", "args").is_none());
}

#[test]
fn test_boot_mode_keeps_selector() {
    if is_root() {
        return;
    }
    let roles = Roles::new();
    let o = roles.run(&["--boot", "-x1", "-F", "template1"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    assert_eq!(roles.recorded("boot", "args").unwrap(), ["--boot", "-x1", "-F", "template1"]);
    assert!(roles.recorded("supervisor", "args").is_none());
}

#[test]
fn test_describe_config_runs_for_everyone() {
    let roles = Roles::new();
    let o = roles.run(&["--describe-config"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    assert_eq!(roles.recorded("describe-config", "args").unwrap(), ["--describe-config"]);
}

#[test]
fn test_show_parameter_goes_to_supervisor() {
    let roles = Roles::new();
    let o = roles.run(&["-C", "shared_buffers", "-D", "/data"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    assert_eq!(roles.recorded("supervisor", "args").unwrap(), ["-C", "shared_buffers", "-D", "/data"]);
}

#[test]
fn test_root_is_refused_before_any_program_runs() {
    if !is_root() {
        return;
    }
    let roles = Roles::new();
    for args in [&["-D", "/data"][..], &["--single", "mydb"], &["--boot"]] {
        let o = roles.run(args);
        assert_eq!(o.status.code(), Some(1));
    }
    for role in ["supervisor", "single", "boot"] {
        assert!(roles.recorded(role, "args").is_none(), "{} ran as root", role);
    }
}

// ── 2. Single-user session target ────────────────────────────────────────────

#[test]
fn test_single_user_defaults_database_to_user() {
    if is_root() {
        return;
    }
    let roles = Roles::new();
    let o = roles.run(&["--single", "-D", "/data"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    let env = roles.recorded("single", "env").unwrap();
    assert!(!env[0].is_empty(), "session user should be set");
    assert_eq!(env[0], env[1]);
}

#[test]
fn test_single_user_named_database() {
    if is_root() {
        return;
    }
    let roles = Roles::new();
    let o = roles.run(&["--single", "-D", "/data", "sales"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    assert_eq!(roles.recorded("single", "args").unwrap(), ["--single", "-D", "/data", "sales"]);
    assert_eq!(roles.recorded("single", "env").unwrap()[1], "sales");
}

#[test]
fn test_single_user_database_before_options() {
    if is_root() {
        return;
    }
    let roles = Roles::new();
    let o = roles.run(&["--single", "sales", "-D", "/data"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    assert_eq!(roles.recorded("single", "env").unwrap()[1], "sales");
}

// ── 3. Installation directories exported to the role ────────────────────────

#[test]
fn test_sysconfdir_exported_when_unset() {
    let roles = Roles::new();
    let o = roles.run(&["--describe-config"]);
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    let env = roles.recorded("describe-config", "env").unwrap();
    assert!(env[2].ends_with("etc"), "PGSYSCONFDIR was {:?}", env[2]);
}

#[test]
fn test_sysconfdir_from_caller_is_kept() {
    let roles = Roles::new();
    let o = roles
        .command(&["--describe-config"])
        .env("PGSYSCONFDIR", "/custom/etc")
        .output()
        .expect("failed to run postgres");
    assert_eq!(o.status.code(), Some(MARKER_STATUS));
    assert_eq!(roles.recorded("describe-config", "env").unwrap()[2], "/custom/etc");
}

// ── 4. Handoff failures ──────────────────────────────────────────────────────

#[test]
fn test_non_executable_program_is_reported() {
    let roles = Roles::new();
    let target = roles.path("describe-config");
    fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();
    let o = roles.run(&["--describe-config"]);
    assert_eq!(o.status.code(), Some(1));
    let err = String::from_utf8_lossy(&o.stderr);
    assert!(err.contains("could not execute describe-config program"), "stderr: {}", err);
    if !is_root() {
        assert!(err.contains("EACCES"), "stderr: {}", err);
    }
}
