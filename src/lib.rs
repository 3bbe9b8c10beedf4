// postgres-main — startup and role dispatch for the postgres server executable

pub mod config;
pub mod error;
pub mod elog;
pub mod spin;
pub mod platform;
pub mod ps_status;
pub mod cli;
pub mod identity;
pub mod privilege;
pub mod locale;
pub mod dispatch;
pub mod drivers;
pub mod startup;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use cli::mode::{classify, ExecutionMode, Invocation, PrivilegeCheck};
pub use dispatch::{dispatch, Returned, RoleDrivers, SessionTarget};
pub use error::StartupError;
pub use identity::{Credentials, ProcessIdentity};
pub use locale::{LocaleBackend, LocaleCategory, LocaleSettings, SystemLocale};
pub use ps_status::RawArguments;
pub use startup::{run, Termination};
