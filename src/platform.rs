//! Platform-specific startup fixes.
//!
//! [`normalize`] must run before anything else touches stdio, sockets, or
//! synchronisation primitives. It runs once per process image; a
//! fork-emulating build runs it again in each re-executed child, so every
//! step tolerates repetition.
//!
//! Keep this list short. Each entry exists only because some platform does
//! not give a standard execution environment on its own.

use crate::error::StartupError;
use crate::spin::{fallback_memory_barrier, DUMMY_SPINLOCK};

/// What [`normalize`] did to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformState {
    /// The platform socket library was started (Windows only).
    pub sockets_initialized: bool,
    /// Crash dialogs are suppressed (Windows only).
    pub crash_dialogs_suppressed: bool,
    /// The fallback spinlock was initialised and passed its self-test.
    pub barrier_spinlock_ready: bool,
}

/// Apply every platform fix. Fails only if a required OS subsystem cannot
/// be brought up.
pub fn normalize() -> Result<PlatformState, StartupError> {
    let (sockets_initialized, crash_dialogs_suppressed) = os_environment()?;
    init_barrier_spinlock()?;
    Ok(PlatformState {
        sockets_initialized,
        crash_dialogs_suppressed,
        barrier_spinlock_ready: true,
    })
}

#[cfg(windows)]
fn os_environment() -> Result<(bool, bool), StartupError> {
    windows::start_winsock()?;
    windows::suppress_crash_dialogs();
    Ok((true, true))
}

#[cfg(not(windows))]
fn os_environment() -> Result<(bool, bool), StartupError> {
    Ok((false, false))
}

/// Initialise [`DUMMY_SPINLOCK`] and make sure it behaves like a lock.
fn init_barrier_spinlock() -> Result<(), StartupError> {
    DUMMY_SPINLOCK.init();
    if !DUMMY_SPINLOCK.try_acquire() {
        return Err(StartupError::PlatformInit { step: "spinlock self-test", code: 1 });
    }
    let held = DUMMY_SPINLOCK.is_held() && !DUMMY_SPINLOCK.try_acquire();
    DUMMY_SPINLOCK.release();
    if !held || DUMMY_SPINLOCK.is_held() {
        return Err(StartupError::PlatformInit { step: "spinlock self-test", code: 2 });
    }
    fallback_memory_barrier();
    Ok(())
}

#[cfg(windows)]
mod windows {
    use winapi::shared::minwindef::MAKEWORD;
    use winapi::um::errhandlingapi::SetErrorMode;
    use winapi::um::winbase::{SEM_FAILCRITICALERRORS, SEM_NOGPFAULTERRORBOX};
    use winapi::um::winsock2::{WSAStartup, WSADATA};

    use crate::error::StartupError;

    /// Winsock 2.2. WSAStartup is reference counted, so a re-executed child
    /// calling it again is fine.
    pub(super) fn start_winsock() -> Result<(), StartupError> {
        let mut data: WSADATA = unsafe { std::mem::zeroed() };
        let err = unsafe { WSAStartup(MAKEWORD(2, 2), &mut data) };
        if err != 0 {
            return Err(StartupError::PlatformInit { step: "WSAStartup", code: err });
        }
        Ok(())
    }

    /// On a general protection fault, don't pop up a GUI box.
    pub(super) fn suppress_crash_dialogs() {
        unsafe {
            SetErrorMode(SEM_FAILCRITICALERRORS | SEM_NOGPFAULTERRORBOX);
        }
    }
}
