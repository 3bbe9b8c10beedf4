//! Refuse to run the server with elevated privileges.
//!
//! A server started as root (or as a Windows administrator) could be turned
//! against the host by anyone able to run SQL. Running setuid from a root
//! shell is refused too: with the real uid still root, a compromised
//! process could switch back.

use crate::cli::mode::{Invocation, PrivilegeCheck};
use crate::error::StartupError;
use crate::identity::{Credentials, ProcessIdentity};

/// Fail unless `credentials` are unprivileged with real == effective uid.
pub fn check_root(credentials: Credentials) -> Result<(), StartupError> {
    match credentials {
        Credentials::Unix { effective_uid: 0, .. } => Err(StartupError::SuperuserExecution),
        Credentials::Unix { real_uid, effective_uid } if real_uid != effective_uid => {
            Err(StartupError::IdentityMismatch)
        }
        Credentials::Unix { .. } => Ok(()),
        Credentials::Windows { administrator: true } => Err(StartupError::AdministratorExecution),
        Credentials::Windows { administrator: false } => Ok(()),
    }
}

/// Run [`check_root`] unless the invocation is exempt.
pub fn guard(invocation: &Invocation<'_>, identity: &ProcessIdentity) -> Result<(), StartupError> {
    match invocation.privilege_check {
        PrivilegeCheck::Exempt => Ok(()),
        PrivilegeCheck::Required => check_root(identity.credentials()),
    }
}
