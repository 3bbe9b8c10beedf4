// elog.rs — startup error reporting.
//
// The running server has a full error subsystem with log destinations and
// message localization; none of that exists yet while the entry routine
// runs. What does exist is this: a process-wide minimum level and two
// macros that write to stderr.
//
//   elog!(level, ...)   → "<LEVEL>:  message" when level >= min_level()
//   write_stderr!(...)  → raw text, always written

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config::ENV_LOG_LEVEL;
use crate::error::{Reporting, StartupError};

/// Message severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElogLevel {
    Debug = 0,
    Log = 1,
    Info = 2,
    Notice = 3,
    Warning = 4,
    Error = 5,
    Fatal = 6,
    Panic = 7,
}

impl ElogLevel {
    pub fn name(self) -> &'static str {
        match self {
            ElogLevel::Debug => "DEBUG",
            ElogLevel::Log => "LOG",
            ElogLevel::Info => "INFO",
            ElogLevel::Notice => "NOTICE",
            ElogLevel::Warning => "WARNING",
            ElogLevel::Error => "ERROR",
            ElogLevel::Fatal => "FATAL",
            ElogLevel::Panic => "PANIC",
        }
    }

    fn from_u8(v: u8) -> ElogLevel {
        match v {
            0 => ElogLevel::Debug,
            1 => ElogLevel::Log,
            2 => ElogLevel::Info,
            3 => ElogLevel::Notice,
            4 => ElogLevel::Warning,
            5 => ElogLevel::Error,
            6 => ElogLevel::Fatal,
            _ => ElogLevel::Panic,
        }
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<ElogLevel> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "debug" => ElogLevel::Debug,
            "log" => ElogLevel::Log,
            "info" => ElogLevel::Info,
            "notice" => ElogLevel::Notice,
            "warning" => ElogLevel::Warning,
            "error" => ElogLevel::Error,
            "fatal" => ElogLevel::Fatal,
            "panic" => ElogLevel::Panic,
            _ => return None,
        };
        Some(level)
    }
}

pub const DEFAULT_MIN_LEVEL: ElogLevel = ElogLevel::Warning;

static MIN_LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_MIN_LEVEL as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn min_level() -> ElogLevel {
    ElogLevel::from_u8(MIN_LEVEL.load(Ordering::Relaxed))
}

#[inline]
pub fn set_min_level(level: ElogLevel) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// True once [`init`] has run.
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

/// Bring up error reporting: pick the minimum level from
/// `POSTGRES_STARTUP_LOG_LEVEL` and switch to tagged messages.
pub fn init() {
    set_min_level(init_min_level());
    INITIALIZED.store(true, Ordering::Release);
}

/// Read the minimum level from the environment.
pub fn init_min_level() -> ElogLevel {
    init_min_level_from(std::env::var(ENV_LOG_LEVEL).ok().as_deref())
}

/// Testable core of [`init_min_level`].
pub fn init_min_level_from(env_val: Option<&str>) -> ElogLevel {
    if let Some(env) = env_val {
        if let Some(level) = ElogLevel::parse(env) {
            return level;
        }
        crate::write_stderr!(
            "WARNING:  ignoring environment variable setting {}={}: not a valid log level\n",
            ENV_LOG_LEVEL,
            env
        );
    }
    DEFAULT_MIN_LEVEL
}

/// Format one message the way [`elog!`] prints it.
pub fn format_message(level: ElogLevel, msg: &str) -> String {
    format!("{}:  {}\n", level.name(), msg)
}

/// Write an already formatted message at `level`. Backs [`elog!`].
///
/// Before [`init`] the message goes out bare, without the level tag.
pub fn emit(level: ElogLevel, msg: &str) {
    if level < min_level() && level < ElogLevel::Fatal {
        return;
    }
    let line = if is_initialized() {
        format_message(level, msg)
    } else {
        format!("{}\n", msg)
    };
    let mut err = std::io::stderr().lock();
    let _ = err.write_all(line.as_bytes());
    let _ = err.flush();
}

/// Write `msg` to stderr unconditionally. Backs [`write_stderr!`].
pub fn write_raw(msg: &str) {
    let mut err = std::io::stderr().lock();
    let _ = err.write_all(msg.as_bytes());
    let _ = err.flush();
}

/// Render a startup failure as the text it is reported with.
pub fn render_startup_error(progname: &str, err: &StartupError) -> String {
    match err.reporting() {
        Reporting::Raw => format!("{}\n", err),
        Reporting::Prefixed => format!("{}: {}\n", progname, err),
        Reporting::Fatal => format_message(ElogLevel::Fatal, &err.to_string()),
        Reporting::Panic => format_message(ElogLevel::Panic, &err.to_string()),
    }
}

/// Report a startup failure on stderr.
pub fn report_startup_error(progname: &str, err: &StartupError) {
    write_raw(&render_startup_error(progname, err));
}

/// Report at `level` through the startup error subsystem.
///
/// FATAL and PANIC are always written; lower levels only at or above
/// [`min_level`].
#[macro_export]
macro_rules! elog {
    ($level:expr, $($arg:tt)*) => {
        $crate::elog::emit($level, &format!($($arg)*))
    };
}

/// Write raw text to stderr regardless of level.
#[macro_export]
macro_rules! write_stderr {
    ($($arg:tt)*) => {
        $crate::elog::write_raw(&format!($($arg)*))
    };
}
