//! Preserved invocation arguments.
//!
//! The process-status display shown by `ps` is rebuilt later from the
//! original command line, so the argument vector is captured before anything
//! else can consume it and kept, unchanged, for the life of the process.

use std::ffi::{OsStr, OsString};
use std::sync::OnceLock;

/// The original argument vector, argv[0] included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawArguments {
    args: Vec<OsString>,
}

impl RawArguments {
    /// Capture the arguments of the running process.
    pub fn capture() -> Self {
        RawArguments { args: std::env::args_os().collect() }
    }

    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        RawArguments { args: args.into_iter().map(Into::into).collect() }
    }

    /// Number of arguments, argv[0] included (argc).
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn argv0(&self) -> Option<&OsStr> {
        self.os(0)
    }

    pub fn os(&self, index: usize) -> Option<&OsStr> {
        self.args.get(index).map(OsString::as_os_str)
    }

    /// Argument `index` as UTF-8; `None` if absent or not valid UTF-8.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.os(index).and_then(OsStr::to_str)
    }

    pub fn as_slice(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments after argv[0].
    pub fn tail(&self) -> &[OsString] {
        self.args.get(1..).unwrap_or(&[])
    }

    /// Space-joined command line, as the status display shows it.
    pub fn display_text(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

static SAVED_ARGS: OnceLock<RawArguments> = OnceLock::new();

/// Keep `args` for the rest of the process lifetime and return the kept copy.
///
/// The first call wins; a later call returns the arguments saved first.
pub fn save_ps_display_args(args: RawArguments) -> &'static RawArguments {
    SAVED_ARGS.get_or_init(|| args)
}
