//! Who the process is: program name and user identity.
//!
//! Resolved once at startup and read-only afterwards; the user name is
//! looked up when first asked for. Error messages use the
//! program name; the privilege guard reads the credentials; single-user
//! mode defaults its database and session owner to the user name.

use std::cell::OnceCell;

use crate::error::StartupError;

/// Operating-system identity of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    Unix { real_uid: u32, effective_uid: u32 },
    Windows { administrator: bool },
}

impl Credentials {
    /// Credentials of the running process.
    #[cfg(unix)]
    pub fn current() -> Self {
        use nix::unistd::{geteuid, getuid};
        Credentials::Unix {
            real_uid: getuid().as_raw(),
            effective_uid: geteuid().as_raw(),
        }
    }

    #[cfg(windows)]
    pub fn current() -> Self {
        let administrator = unsafe { winapi::um::shlobj::IsUserAnAdmin() } != 0;
        Credentials::Windows { administrator }
    }

    pub fn effective_uid(&self) -> Option<u32> {
        match *self {
            Credentials::Unix { effective_uid, .. } => Some(effective_uid),
            Credentials::Windows { .. } => None,
        }
    }
}

/// Program name, credentials, and the effective user's name.
///
/// The name is looked up on first use; only single-user mode needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    progname: String,
    credentials: Credentials,
    user_name: OnceCell<Result<String, String>>,
}

impl ProcessIdentity {
    /// Identity of the running process, shown as `progname`.
    pub fn resolve(progname: impl Into<String>) -> Self {
        ProcessIdentity {
            progname: progname.into(),
            credentials: Credentials::current(),
            user_name: OnceCell::new(),
        }
    }

    /// Build an identity from parts; `user_name` is the lookup result, with
    /// the failure reason on `Err`.
    pub fn new(
        progname: impl Into<String>,
        credentials: Credentials,
        user_name: Result<String, String>,
    ) -> Self {
        ProcessIdentity {
            progname: progname.into(),
            credentials,
            user_name: OnceCell::from(user_name),
        }
    }

    pub fn progname(&self) -> &str {
        &self.progname
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials
    }

    /// Name of the effective user. Failing to find one is fatal for callers
    /// that need it.
    pub fn effective_user_name(&self) -> Result<&str, StartupError> {
        match self.user_name.get_or_init(|| lookup_user_name(&self.credentials)) {
            Ok(name) => Ok(name),
            Err(reason) => Err(StartupError::UserLookup {
                uid: self.credentials.effective_uid().unwrap_or(0),
                reason: reason.clone(),
            }),
        }
    }
}

#[cfg(unix)]
fn lookup_user_name(credentials: &Credentials) -> Result<String, String> {
    use nix::unistd::{Uid, User};

    let uid = credentials.effective_uid().unwrap_or_else(|| nix::unistd::geteuid().as_raw());
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => Ok(user.name),
        Ok(None) => Err("user does not exist".to_owned()),
        Err(errno) => Err(errno.desc().to_owned()),
    }
}

#[cfg(windows)]
fn lookup_user_name(_credentials: &Credentials) -> Result<String, String> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::winbase::GetUserNameW;

    // UNLEN + 1
    let mut buf = [0u16; 257];
    let mut len = buf.len() as u32;
    if unsafe { GetUserNameW(buf.as_mut_ptr(), &mut len) } == 0 {
        return Err(format!("error code {}", unsafe { GetLastError() }));
    }
    // len counts the terminating NUL
    let used = (len as usize).saturating_sub(1).min(buf.len());
    OsString::from_wide(&buf[..used])
        .into_string()
        .map_err(|_| "user name is not valid Unicode".to_owned())
}
