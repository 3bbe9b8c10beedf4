//! Locale negotiation at startup.
//!
//! Every locale category the server cares about gets a definite setting
//! before any role runs:
//!
//! | Category      | Requested                        |
//! |---------------|----------------------------------|
//! | `LC_COLLATE`  | from the environment             |
//! | `LC_CTYPE`    | from the environment             |
//! | `LC_MESSAGES` | from the environment (Unix only) |
//! | `LC_MONETARY` | always `C`                       |
//! | `LC_NUMERIC`  | always `C`                       |
//! | `LC_TIME`     | always `C`                       |
//!
//! The last three stay `C` because the roles format numbers and dates
//! themselves and need the unlocalized C library behaviour. Collation and
//! ctype set here are what `initdb` records for a new cluster; an existing
//! cluster overrides them later from its control file.
//!
//! If the requested locale cannot be adopted, `C` is tried; if that fails
//! too, startup fails. Each adopted value is exported to the category's
//! environment variable, and `LC_ALL` is removed afterwards so those
//! per-category variables keep their force in child processes.

use std::fmt;

use crate::elog;
use crate::elog::ElogLevel;
use crate::error::StartupError;

/// A locale category negotiated at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocaleCategory {
    Collate,
    Ctype,
    Messages,
    Monetary,
    Numeric,
    Time,
}

impl LocaleCategory {
    /// Environment variable (and display name) of the category.
    pub fn env_name(self) -> &'static str {
        match self {
            LocaleCategory::Collate => "LC_COLLATE",
            LocaleCategory::Ctype => "LC_CTYPE",
            LocaleCategory::Messages => "LC_MESSAGES",
            LocaleCategory::Monetary => "LC_MONETARY",
            LocaleCategory::Numeric => "LC_NUMERIC",
            LocaleCategory::Time => "LC_TIME",
        }
    }

    /// Categories recognised on this platform, in negotiation order.
    pub fn recognized() -> &'static [LocaleCategory] {
        if HAVE_LC_MESSAGES {
            &[
                LocaleCategory::Collate,
                LocaleCategory::Ctype,
                LocaleCategory::Messages,
                LocaleCategory::Monetary,
                LocaleCategory::Numeric,
                LocaleCategory::Time,
            ]
        } else {
            &[
                LocaleCategory::Collate,
                LocaleCategory::Ctype,
                LocaleCategory::Monetary,
                LocaleCategory::Numeric,
                LocaleCategory::Time,
            ]
        }
    }

    /// Whether the category is pinned to `C` regardless of environment.
    pub fn is_pinned(self) -> bool {
        matches!(
            self,
            LocaleCategory::Monetary | LocaleCategory::Numeric | LocaleCategory::Time
        )
    }
}

impl fmt::Display for LocaleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_name())
    }
}

const HAVE_LC_MESSAGES: bool = cfg!(unix);

/// The portable default locale.
pub const C_LOCALE: &str = "C";

/// Aggregate override removed once negotiation is done.
pub const LC_ALL: &str = "LC_ALL";

/// Where locale settings are actually applied.
pub trait LocaleBackend {
    /// Adopt `locale` for `category` for the rest of the process and export
    /// it to the category's environment variable. `""` means "take it from
    /// the environment". Returns the resolved locale name, or `None` if the
    /// locale was rejected or could not be exported.
    fn set_permanent(&mut self, category: LocaleCategory, locale: &str) -> Option<String>;

    /// Read an environment variable.
    fn getenv(&self, name: &str) -> Option<String>;

    /// Remove an environment variable.
    fn unsetenv(&mut self, name: &str);

    /// Check that collation transforms respect their length limit. `Err`
    /// carries the collation locale in force.
    fn check_collation_transform(&mut self) -> Result<(), String>;
}

/// One negotiated category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCategorySetting {
    pub category: LocaleCategory,
    /// What was asked for (`""` = environment).
    pub requested: String,
    /// What the C library settled on.
    pub resolved: String,
    /// `true` when the request was rejected and `C` adopted instead.
    pub fell_back: bool,
}

/// The outcome of negotiation: one setting per recognised category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocaleSettings {
    settings: Vec<LocaleCategorySetting>,
}

impl LocaleSettings {
    pub fn get(&self, category: LocaleCategory) -> Option<&LocaleCategorySetting> {
        self.settings.iter().find(|s| s.category == category)
    }

    /// Resolved locale name for `category`.
    pub fn resolved(&self, category: LocaleCategory) -> Option<&str> {
        self.get(category).map(|s| s.resolved.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleCategorySetting> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// What to request for each recognised category.
///
/// Windows takes its locale from the code page rather than the
/// environment, so there `LC_COLLATE` and `LC_CTYPE` are read from the
/// environment explicitly (initdb passes them that way) before falling back
/// to the code page (`""`).
pub fn negotiation_plan<B: LocaleBackend + ?Sized>(
    backend: &B,
    windows: bool,
) -> Vec<(LocaleCategory, String)> {
    LocaleCategory::recognized()
        .iter()
        .map(|&category| {
            let requested = match category {
                c if c.is_pinned() => C_LOCALE.to_owned(),
                LocaleCategory::Collate | LocaleCategory::Ctype if windows => {
                    backend.getenv(category.env_name()).unwrap_or_default()
                }
                _ => String::new(),
            };
            (category, requested)
        })
        .collect()
}

/// Make the permanent setting for one category, falling back to `C`.
pub fn init_locale<B: LocaleBackend + ?Sized>(
    backend: &mut B,
    category: LocaleCategory,
    locale: &str,
) -> Result<LocaleCategorySetting, StartupError> {
    if let Some(resolved) = backend.set_permanent(category, locale) {
        return Ok(LocaleCategorySetting {
            category,
            requested: locale.to_owned(),
            resolved,
            fell_back: false,
        });
    }
    if let Some(resolved) = backend.set_permanent(category, C_LOCALE) {
        elog!(
            ElogLevel::Log,
            "could not adopt \"{}\" locale for {}, using C",
            locale,
            category
        );
        return Ok(LocaleCategorySetting {
            category,
            requested: locale.to_owned(),
            resolved,
            fell_back: true,
        });
    }
    Err(StartupError::LocaleAdoption {
        category: category.env_name(),
        requested: locale.to_owned(),
    })
}

/// Negotiate every recognised category, drop `LC_ALL`, and check the
/// collation transform.
///
/// Safe to call once per process; not designed for repeated use.
pub fn negotiate<B: LocaleBackend + ?Sized>(
    backend: &mut B,
    windows: bool,
) -> Result<LocaleSettings, StartupError> {
    let plan = negotiation_plan(backend, windows);
    let mut settings = Vec::with_capacity(plan.len());
    for (category, requested) in plan {
        settings.push(init_locale(backend, category, &requested)?);
    }

    backend.unsetenv(LC_ALL);

    backend
        .check_collation_transform()
        .map_err(|locale| StartupError::StrxfrmOverrun { locale })?;

    Ok(LocaleSettings { settings })
}

/// The process locale, through the C library.
#[derive(Debug, Default)]
pub struct SystemLocale;

impl SystemLocale {
    pub fn new() -> Self {
        SystemLocale
    }

    fn raw_category(category: LocaleCategory) -> libc::c_int {
        match category {
            LocaleCategory::Collate => libc::LC_COLLATE,
            LocaleCategory::Ctype => libc::LC_CTYPE,
            #[cfg(unix)]
            LocaleCategory::Messages => libc::LC_MESSAGES,
            #[cfg(not(unix))]
            LocaleCategory::Messages => libc::LC_CTYPE,
            LocaleCategory::Monetary => libc::LC_MONETARY,
            LocaleCategory::Numeric => libc::LC_NUMERIC,
            LocaleCategory::Time => libc::LC_TIME,
        }
    }

    /// Current setting of `category`, without changing it.
    pub fn query(category: LocaleCategory) -> Option<String> {
        let result = unsafe { libc::setlocale(Self::raw_category(category), std::ptr::null()) };
        copy_locale_name(result)
    }
}

fn copy_locale_name(ptr: *const libc::c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // setlocale() returns static storage the next call may overwrite.
    let name = unsafe { std::ffi::CStr::from_ptr(ptr) };
    Some(name.to_string_lossy().into_owned())
}

impl LocaleBackend for SystemLocale {
    fn set_permanent(&mut self, category: LocaleCategory, locale: &str) -> Option<String> {
        let c_locale = std::ffi::CString::new(locale).ok()?;
        let result = unsafe { libc::setlocale(Self::raw_category(category), c_locale.as_ptr()) };
        let resolved = copy_locale_name(result)?;
        std::env::set_var(category.env_name(), &resolved);
        Some(resolved)
    }

    fn getenv(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn unsetenv(&mut self, name: &str) {
        std::env::remove_var(name);
    }

    fn check_collation_transform(&mut self) -> Result<(), String> {
        if strxfrm_respects_limit() {
            Ok(())
        } else {
            Err(SystemLocale::query(LocaleCategory::Collate).unwrap_or_default())
        }
    }
}

/// Some C libraries' strxfrm() write past the length they are given.
/// Catch that now rather than corrupt memory during a sort.
#[cfg(unix)]
fn strxfrm_respects_limit() -> bool {
    const CANARY: libc::c_char = 0x7F;
    let mut buf: [libc::c_char; 32] = [0; 32];
    let mut ok = true;

    buf[7] = CANARY;
    unsafe { libc::strxfrm(buf.as_mut_ptr(), c"ab".as_ptr(), 7) };
    if buf[7] != CANARY {
        ok = false;
    }

    buf[1] = CANARY;
    unsafe { libc::strxfrm(buf.as_mut_ptr(), c"a".as_ptr(), 1) };
    if buf[1] != CANARY {
        ok = false;
    }
    ok
}

#[cfg(not(unix))]
fn strxfrm_respects_limit() -> bool {
    true
}
