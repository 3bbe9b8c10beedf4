//! Errors that stop the server before any role starts.
//!
//! Every variant is terminal: the startup sequence never retries and never
//! continues in a degraded mode. [`StartupError::exit_code`] tells the
//! binary how to end the process.

use std::fmt;

use crate::cli::mode::ExecutionMode;

/// How a [`StartupError`] is written to the error stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporting {
    /// Fixed text, printed verbatim.
    Raw,
    /// Printed as `<progname>: <message>`.
    Prefixed,
    /// Routed through the error subsystem at FATAL level.
    Fatal,
    /// Routed through the error subsystem at PANIC level; the process aborts.
    Panic,
}

/// A startup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    /// A required OS-level subsystem could not be initialised.
    PlatformInit { step: &'static str, code: i32 },
    /// Neither the requested locale nor "C" could be adopted.
    LocaleAdoption { category: &'static str, requested: String },
    /// The C library's strxfrm() writes past the length it was given.
    StrxfrmOverrun { locale: String },
    /// Effective uid is 0.
    SuperuserExecution,
    /// Windows: the process token carries administrative rights.
    AdministratorExecution,
    /// Real and effective uid differ.
    IdentityMismatch,
    /// No password-database entry for the effective uid.
    UserLookup { uid: u32, reason: String },
    /// A role driver handed control back to the dispatcher.
    DispatchReturned { mode: ExecutionMode },
}

impl StartupError {
    /// Exit status for a clean termination, or `None` when the process must
    /// abort instead.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            StartupError::DispatchReturned { .. } => None,
            _ => Some(1),
        }
    }

    pub fn reporting(&self) -> Reporting {
        match self {
            StartupError::SuperuserExecution | StartupError::AdministratorExecution => {
                Reporting::Raw
            }
            StartupError::PlatformInit { .. }
            | StartupError::IdentityMismatch
            | StartupError::UserLookup { .. } => Reporting::Prefixed,
            StartupError::LocaleAdoption { .. } | StartupError::StrxfrmOverrun { .. } => {
                Reporting::Fatal
            }
            StartupError::DispatchReturned { .. } => Reporting::Panic,
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::PlatformInit { step, code } => write!(f, "{} failed: {}", step, code),
            StartupError::LocaleAdoption { category, requested } => write!(
                f,
                "could not adopt \"{}\" locale nor C locale for {}",
                requested, category
            ),
            StartupError::StrxfrmOverrun { locale } => write!(
                f,
                "strxfrm(), in locale \"{}\", writes past the specified array length",
                locale
            ),
            StartupError::SuperuserExecution => f.write_str(
                "\"root\" execution of the PostgreSQL server is not permitted.\n\
                 The server must be started under an unprivileged user ID to prevent\n\
                 possible system security compromise.  See the documentation for\n\
                 more information on how to properly start the server.",
            ),
            StartupError::AdministratorExecution => f.write_str(
                "Execution of PostgreSQL by a user with administrative permissions is not\n\
                 permitted.\n\
                 The server must be started under an unprivileged user ID to prevent\n\
                 possible system security compromises.  See the documentation for\n\
                 more information on how to properly start the server.",
            ),
            StartupError::IdentityMismatch => {
                f.write_str("real and effective user IDs must match")
            }
            StartupError::UserLookup { uid, reason } => write!(
                f,
                "could not look up effective user ID {}: {}",
                uid, reason
            ),
            StartupError::DispatchReturned { mode } => {
                write!(f, "role driver for {:?} mode returned control", mode)
            }
        }
    }
}

impl std::error::Error for StartupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dispatch_returned_aborts() {
        let err = StartupError::DispatchReturned { mode: ExecutionMode::Supervisor };
        assert_eq!(err.exit_code(), None);
        assert_eq!(err.reporting(), Reporting::Panic);
        assert_eq!(StartupError::IdentityMismatch.exit_code(), Some(1));
        assert_eq!(StartupError::SuperuserExecution.exit_code(), Some(1));
    }

    #[test]
    fn locale_message_names_value_and_category() {
        let err = StartupError::LocaleAdoption {
            category: "LC_CTYPE",
            requested: "xx_YY.bogus".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "could not adopt \"xx_YY.bogus\" locale nor C locale for LC_CTYPE"
        );
        assert_eq!(err.reporting(), Reporting::Fatal);
    }

    #[test]
    fn root_message_is_fixed_text() {
        let text = StartupError::SuperuserExecution.to_string();
        assert!(text.starts_with("\"root\" execution of the PostgreSQL server is not permitted."));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn platform_failure_names_step() {
        let err = StartupError::PlatformInit { step: "WSAStartup", code: 10091 };
        assert_eq!(err.to_string(), "WSAStartup failed: 10091");
        assert_eq!(err.reporting(), Reporting::Prefixed);
    }
}
