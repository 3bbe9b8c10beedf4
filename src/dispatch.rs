//! The one-way handoff to a role driver.
//!
//! Each role (supervisor, single-user engine, bootstrap loader,
//! configuration reporter, forked worker) owns the process once it is
//! called: it runs until it exits the process itself. Driver methods
//! therefore return [`Returned`], a value no correct driver ever produces;
//! implementations end in a `-> !` call such as `std::process::exit`, which
//! coerces to it. If one does come back, [`dispatch`] reports
//! [`StartupError::DispatchReturned`] and the binary aborts.

use std::convert::Infallible;
use std::ffi::OsString;

use crate::cli::arg_utils::single_user_dbname;
use crate::cli::mode::ExecutionMode;
use crate::error::StartupError;
use crate::identity::ProcessIdentity;
use crate::ps_status::RawArguments;

/// Evidence that a role driver returned control. Never legitimately built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a role driver returned; the caller must treat this as fatal"]
pub struct Returned;

/// Database and session owner for single-user mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTarget {
    /// Database to open, byte for byte as given on the command line.
    pub dbname: OsString,
    /// `true` if the command line named the database, `false` if it
    /// defaulted to the user name.
    pub explicit: bool,
    /// Session owner: always the effective user.
    pub user: String,
}

impl SessionTarget {
    /// Resolve the target from the arguments after `--single`.
    pub fn resolve(args: &RawArguments, identity: &ProcessIdentity) -> Result<Self, StartupError> {
        let user = identity.effective_user_name()?.to_owned();
        let after_single = args.as_slice().get(2..).unwrap_or(&[]);
        let target = match single_user_dbname(after_single) {
            Some(dbname) => SessionTarget { dbname, explicit: true, user },
            None => SessionTarget { dbname: OsString::from(&user), explicit: false, user },
        };
        Ok(target)
    }
}

/// Entry points of the roles this binary can become.
pub trait RoleDrivers {
    /// Re-executed child of a fork-emulating supervisor.
    fn forked_worker(&mut self, args: &RawArguments) -> Returned;
    /// Bootstrap loading.
    fn bootstrap_load(&mut self, args: &RawArguments) -> Returned;
    /// Configuration-parameter description.
    fn describe_config(&mut self, args: &RawArguments) -> Returned;
    /// Single-user session against `target`.
    fn single_session(&mut self, args: &RawArguments, target: &SessionTarget) -> Returned;
    /// The multi-process supervisor.
    fn supervisor(&mut self, args: &RawArguments) -> Returned;
}

/// Hand the process to the driver for `mode`. Only ever returns an error.
pub fn dispatch<D: RoleDrivers + ?Sized>(
    mode: ExecutionMode,
    args: &RawArguments,
    identity: &ProcessIdentity,
    drivers: &mut D,
) -> Result<Infallible, StartupError> {
    let Returned = match mode {
        ExecutionMode::ForkedWorker => drivers.forked_worker(args),
        ExecutionMode::BootstrapLoad => drivers.bootstrap_load(args),
        ExecutionMode::DescribeConfig => drivers.describe_config(args),
        ExecutionMode::SingleSession => {
            let target = SessionTarget::resolve(args, identity)?;
            drivers.single_session(args, &target)
        }
        ExecutionMode::Supervisor => drivers.supervisor(args),
        // help and version exit before dispatch
        ExecutionMode::ShowHelp | ExecutionMode::ShowVersion => Returned,
    };
    Err(StartupError::DispatchReturned { mode })
}
