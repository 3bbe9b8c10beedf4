//! Startup sequence from locale negotiation to dispatch.
//!
//! The binary does the steps that need the real process first (platform
//! fixes, argument capture, error-reporting bring-up, identity) and then
//! calls [`run`]. Everything [`run`] touches comes in through its
//! parameters, so the whole decision path can be driven from tests with a
//! fake locale backend and recording role drivers.
//!
//! Order is fixed: locale → help/version → classify → privilege guard →
//! dispatch. Help and version are handled before the guard so that even
//! root can ask for them.

use std::io::Write;

use crate::cli::help::{write_help, write_version};
use crate::cli::mode::{classify, ExecutionMode};
use crate::config::USE_SSL;
use crate::dispatch::{dispatch, RoleDrivers};
use crate::elog;
use crate::elog::ElogLevel;
use crate::error::StartupError;
use crate::identity::ProcessIdentity;
use crate::locale::{negotiate, LocaleBackend};
use crate::privilege::guard;
use crate::ps_status::RawArguments;

/// How the process should end when [`run`] returns without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Help or version was printed; exit with this status.
    Exit(i32),
}

/// Run the startup sequence. On success only help/version can come back;
/// every other path either hands the process to a role driver or fails.
pub fn run<L, D>(
    args: &RawArguments,
    identity: &ProcessIdentity,
    locale: &mut L,
    drivers: &mut D,
    out: &mut dyn Write,
) -> Result<Termination, StartupError>
where
    L: LocaleBackend + ?Sized,
    D: RoleDrivers + ?Sized,
{
    let settings = negotiate(locale, cfg!(windows))?;
    for setting in settings.iter() {
        elog!(
            ElogLevel::Debug,
            "{} set to \"{}\"",
            setting.category,
            setting.resolved
        );
    }

    let invocation = classify(args);
    elog!(ElogLevel::Debug, "invoked as: {}", args.display_text());
    elog!(
        ElogLevel::Debug,
        "selected {:?} mode, privilege check {:?}",
        invocation.mode,
        invocation.privilege_check
    );

    match invocation.mode {
        ExecutionMode::ShowHelp => {
            if let Err(err) = write_help(out, identity.progname(), USE_SSL) {
                elog!(ElogLevel::Log, "could not write help text: {}", err);
            }
            return Ok(Termination::Exit(0));
        }
        ExecutionMode::ShowVersion => {
            if let Err(err) = write_version(out) {
                elog!(ElogLevel::Log, "could not write version: {}", err);
            }
            return Ok(Termination::Exit(0));
        }
        _ => {}
    }

    guard(&invocation, identity)?;

    match dispatch(invocation.mode, args, identity, drivers) {
        Ok(never) => match never {},
        Err(err) => Err(err),
    }
}
