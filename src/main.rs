//! Binary entry point for the `postgres` server executable.
//!
//! Any server process begins here: the supervisor, a single-user session,
//! the bootstrap loader, the configuration reporter, or a re-executed child
//! of a fork-emulating supervisor. This routine does the setup every one of
//! them needs and then hands the process to exactly one of them.
//!
//! # Control flow
//!
//! 1. [`platform::normalize`] applies platform fixes before anything else.
//! 2. [`save_ps_display_args`] keeps the original argv for the status display.
//! 3. [`elog::init`] brings up error reporting.
//! 4. [`config::export_service_dirs`] exports the installation's
//!    configuration and message-catalog directories.
//! 5. [`startup::run`] negotiates locales, answers `--help`/`--version`,
//!    checks privileges, and dispatches. It only comes back to print help,
//!    or with an error.

use std::io;

use postgres_main::cli::arg_utils::progname_from;
use postgres_main::config;
use postgres_main::drivers::ExecDrivers;
use postgres_main::elog::{self, ElogLevel};
use postgres_main::error::StartupError;
use postgres_main::identity::ProcessIdentity;
use postgres_main::locale::SystemLocale;
use postgres_main::platform;
use postgres_main::ps_status::{save_ps_display_args, RawArguments};
use postgres_main::startup::{self, Termination};

/// Report `err` and end the process the way it demands.
fn fail(progname: &str, err: StartupError) -> ! {
    elog::report_startup_error(progname, &err);
    match err.exit_code() {
        Some(code) => std::process::exit(code),
        None => std::process::abort(),
    }
}

fn main() {
    let raw = RawArguments::capture();
    let argv0 = raw.argv0().map(|a| a.to_string_lossy().into_owned());
    let progname = progname_from(argv0.as_deref(), cfg!(windows));

    let platform = match platform::normalize() {
        Ok(state) => state,
        Err(err) => fail(&progname, err),
    };

    // Must happen before anything could hold on to the original argv.
    let args = save_ps_display_args(raw);

    elog::init();
    postgres_main::elog!(ElogLevel::Debug, "platform: {:?}", platform);

    for (name, dir) in config::export_service_dirs() {
        postgres_main::elog!(ElogLevel::Debug, "{} set to \"{}\"", name, dir.display());
    }

    let identity = ProcessIdentity::resolve(progname);
    let mut locale = SystemLocale::new();
    let mut drivers = ExecDrivers::new(identity.progname());
    let mut stdout = io::stdout();

    match startup::run(args, &identity, &mut locale, &mut drivers, &mut stdout) {
        Ok(Termination::Exit(code)) => std::process::exit(code),
        Err(err) => fail(identity.progname(), err),
    }
}
