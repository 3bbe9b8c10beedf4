//! Role drivers backed by external programs.
//!
//! Each role lives in its own executable (see [`crate::config::RoleProgram`]).
//! Handing off means replacing this process with that program, keeping the
//! original argument vector (argv[0] included) so the role sees exactly the
//! invocation the user typed. Single-user mode also gets its resolved
//! session owner and database through the environment.
//!
//! On Unix the handoff is `execv`. Elsewhere the program is spawned, waited
//! for, and its exit status becomes ours.

use std::convert::Infallible;
use std::ffi::OsStr;
use std::path::Path;

use anyhow::Context;

use crate::config::{role_program_path, RoleProgram, ENV_SESSION_DATABASE, ENV_SESSION_USER};
use crate::dispatch::{Returned, RoleDrivers, SessionTarget};
use crate::elog::ElogLevel;
use crate::ps_status::RawArguments;
use crate::{elog, write_stderr};

/// Drivers that exec the installed role programs.
#[derive(Debug, Clone)]
pub struct ExecDrivers {
    progname: String,
}

impl ExecDrivers {
    pub fn new(progname: impl Into<String>) -> Self {
        ExecDrivers { progname: progname.into() }
    }

    fn hand_off(&self, role: RoleProgram, args: &RawArguments, env: &[(&str, &OsStr)]) -> ! {
        let program = role_program_path(role);
        elog!(
            ElogLevel::Debug,
            "handing off to {} program \"{}\"",
            role.role_name(),
            program.display()
        );
        let err = match replace_process(&program, args, env) {
            Ok(never) => match never {},
            Err(err) => err,
        };
        write_stderr!(
            "{}: could not execute {} program \"{}\": {:#}\n",
            self.progname,
            role.role_name(),
            program.display(),
            err
        );
        std::process::exit(1)
    }
}

impl RoleDrivers for ExecDrivers {
    fn forked_worker(&mut self, args: &RawArguments) -> Returned {
        self.hand_off(RoleProgram::ForkedWorker, args, &[])
    }

    fn bootstrap_load(&mut self, args: &RawArguments) -> Returned {
        self.hand_off(RoleProgram::Bootstrap, args, &[])
    }

    fn describe_config(&mut self, args: &RawArguments) -> Returned {
        self.hand_off(RoleProgram::DescribeConfig, args, &[])
    }

    fn single_session(&mut self, args: &RawArguments, target: &SessionTarget) -> Returned {
        let env = [
            (ENV_SESSION_USER, OsStr::new(&target.user)),
            (ENV_SESSION_DATABASE, target.dbname.as_os_str()),
        ];
        self.hand_off(RoleProgram::SingleSession, args, &env)
    }

    fn supervisor(&mut self, args: &RawArguments) -> Returned {
        self.hand_off(RoleProgram::Supervisor, args, &[])
    }
}

/// Replace the current process image with `program`.
#[cfg(unix)]
fn replace_process(
    program: &Path,
    args: &RawArguments,
    env: &[(&str, &OsStr)],
) -> anyhow::Result<Infallible> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let path = CString::new(program.as_os_str().as_bytes())
        .context("program path contains a NUL byte")?;
    let mut argv = args
        .as_slice()
        .iter()
        .map(|a| CString::new(a.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
        .context("argument contains a NUL byte")?;
    if argv.is_empty() {
        argv.push(path.clone());
    }

    // Single-threaded at this point, so mutating the environment is sound.
    for (key, value) in env {
        std::env::set_var(key, value);
    }

    let never = nix::unistd::execv(&path, &argv)?;
    Ok(never)
}

/// No exec on this platform: run `program` and exit with its status.
#[cfg(not(unix))]
fn replace_process(
    program: &Path,
    args: &RawArguments,
    env: &[(&str, &OsStr)],
) -> anyhow::Result<Infallible> {
    let status = std::process::Command::new(program)
        .args(args.tail())
        .envs(env.iter().copied())
        .status()
        .context("could not start process")?;
    std::process::exit(status.code().unwrap_or(1))
}
