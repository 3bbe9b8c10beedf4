//! Execution-mode classification.
//!
//! This module provides:
//! - [`ExecutionMode`] — the role this process will assume.
//! - [`PrivilegeCheck`] — whether the root/identity check runs.
//! - [`classify`] / [`classify_with`] — pick both from the argument vector.
//!
//! Only argv[1] selects the mode. Comparisons are exact and happen in a
//! fixed order; the first match wins and anything unrecognised belongs to
//! the supervisor, which validates its own arguments.

use std::ffi::OsString;

use crate::cli::constants::{
    BOOT, DESCRIBE_CONFIG, FORK_PREFIX, HELP_LONG, HELP_SHORT, SHOW_PARAMETER, SINGLE,
    VERSION_LONG, VERSION_SHORT,
};
use crate::config::EXEC_BACKEND;
use crate::ps_status::RawArguments;

/// The role this process will assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Print usage and exit 0.
    ShowHelp,
    /// Print the version banner and exit 0.
    ShowVersion,
    /// Describe every configuration parameter.
    DescribeConfig,
    /// Re-executed child of a fork-emulating supervisor.
    ForkedWorker,
    /// Bootstrap loading outside normal sessions.
    BootstrapLoad,
    /// One session served directly by this process.
    SingleSession,
    /// The multi-process server (default).
    Supervisor,
}

/// Whether the root/identity check runs before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeCheck {
    Required,
    /// Read-only configuration queries may run as root.
    Exempt,
}

/// Result of classifying an argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub mode: ExecutionMode,
    pub privilege_check: PrivilegeCheck,
    /// Everything after argv[1], untouched.
    pub residual: &'a [OsString],
}

/// Classify `args` for this build.
pub fn classify(args: &RawArguments) -> Invocation<'_> {
    classify_with(args, EXEC_BACKEND)
}

/// Classify `args`; `exec_backend` says whether `--fork*` is recognised.
pub fn classify_with(args: &RawArguments, exec_backend: bool) -> Invocation<'_> {
    let first = args.get(1);
    let mode = match first {
        Some(HELP_LONG) | Some(HELP_SHORT) => ExecutionMode::ShowHelp,
        Some(VERSION_LONG) | Some(VERSION_SHORT) => ExecutionMode::ShowVersion,
        Some(arg) if exec_backend && arg.starts_with(FORK_PREFIX) => ExecutionMode::ForkedWorker,
        Some(BOOT) => ExecutionMode::BootstrapLoad,
        Some(DESCRIBE_CONFIG) => ExecutionMode::DescribeConfig,
        Some(SINGLE) => ExecutionMode::SingleSession,
        _ => ExecutionMode::Supervisor,
    };
    Invocation {
        mode,
        privilege_check: privilege_check_for(args),
        residual: args.as_slice().get(2..).unwrap_or(&[]),
    }
}

/// `--describe-config` anywhere exempts; `-C` exempts only as argv[1] with
/// a value after it, so another mode's `-C` switch is not mistaken for the
/// parameter query.
fn privilege_check_for(args: &RawArguments) -> PrivilegeCheck {
    let describe = args.tail().iter().any(|a| a.to_str() == Some(DESCRIBE_CONFIG));
    let show_param = args.len() > 2 && args.get(1) == Some(SHOW_PARAMETER);
    if describe || show_param {
        PrivilegeCheck::Exempt
    } else {
        PrivilegeCheck::Required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(a: &[&str]) -> RawArguments {
        RawArguments::new(a.iter().copied())
    }

    fn mode_of(a: &[&str]) -> ExecutionMode {
        classify_with(&raw(a), false).mode
    }

    #[test]
    fn recognised_first_arguments() {
        assert_eq!(mode_of(&["postgres", "--help"]), ExecutionMode::ShowHelp);
        assert_eq!(mode_of(&["postgres", "-?"]), ExecutionMode::ShowHelp);
        assert_eq!(mode_of(&["postgres", "--version"]), ExecutionMode::ShowVersion);
        assert_eq!(mode_of(&["postgres", "-V"]), ExecutionMode::ShowVersion);
        assert_eq!(mode_of(&["postgres", "--boot", "-x1"]), ExecutionMode::BootstrapLoad);
        assert_eq!(mode_of(&["postgres", "--describe-config"]), ExecutionMode::DescribeConfig);
        assert_eq!(mode_of(&["postgres", "--single", "db"]), ExecutionMode::SingleSession);
    }

    #[test]
    fn everything_else_is_supervisor() {
        assert_eq!(mode_of(&["postgres"]), ExecutionMode::Supervisor);
        assert_eq!(mode_of(&[]), ExecutionMode::Supervisor);
        assert_eq!(mode_of(&["postgres", "-D", "/data"]), ExecutionMode::Supervisor);
        assert_eq!(mode_of(&["postgres", "--HELP"]), ExecutionMode::Supervisor);
        assert_eq!(mode_of(&["postgres", "--single=x"]), ExecutionMode::Supervisor);
        assert_eq!(mode_of(&["postgres", ""]), ExecutionMode::Supervisor);
    }

    #[test]
    fn only_first_argument_selects() {
        assert_eq!(mode_of(&["postgres", "-D", "/data", "--help"]), ExecutionMode::Supervisor);
        assert_eq!(mode_of(&["postgres", "-c", "x=1", "--single"]), ExecutionMode::Supervisor);
    }

    #[test]
    fn fork_prefix_needs_exec_backend() {
        let args = raw(&["postgres", "--forkbackend", "12"]);
        assert_eq!(classify_with(&args, true).mode, ExecutionMode::ForkedWorker);
        assert_eq!(classify_with(&args, false).mode, ExecutionMode::Supervisor);
        let bare = raw(&["postgres", "--fork"]);
        assert_eq!(classify_with(&bare, true).mode, ExecutionMode::ForkedWorker);
        let short = raw(&["postgres", "--for"]);
        assert_eq!(classify_with(&short, true).mode, ExecutionMode::Supervisor);
    }

    #[test]
    fn residual_is_after_first_argument() {
        let args = raw(&["postgres", "--single", "-D", "/data", "db"]);
        let inv = classify_with(&args, false);
        let residual: Vec<_> = inv.residual.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(residual, ["-D", "/data", "db"]);
        assert!(classify_with(&raw(&["postgres"]), false).residual.is_empty());
    }

    #[test]
    fn privilege_exemptions() {
        let check = |a: &[&str]| classify_with(&raw(a), false).privilege_check;
        assert_eq!(check(&["postgres", "--describe-config"]), PrivilegeCheck::Exempt);
        assert_eq!(check(&["postgres", "-D", "x", "--describe-config"]), PrivilegeCheck::Exempt);
        assert_eq!(check(&["postgres", "-C", "shared_buffers"]), PrivilegeCheck::Exempt);
        assert_eq!(check(&["postgres", "-C"]), PrivilegeCheck::Required);
        assert_eq!(check(&["postgres", "-D", "x", "-C", "port"]), PrivilegeCheck::Required);
        assert_eq!(check(&["postgres", "--boot"]), PrivilegeCheck::Required);
        assert_eq!(check(&["postgres"]), PrivilegeCheck::Required);
        assert_eq!(check(&["--describe-config"]), PrivilegeCheck::Required);
    }
}
