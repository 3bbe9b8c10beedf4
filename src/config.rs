// config.rs — compile-time configuration and environment overrides.
//
// Build-time switches (EXEC_BACKEND, USE_SSL) come from build.rs / Cargo
// features. Role program locations can be overridden per role through
// `POSTGRES_<ROLE>_PROGRAM`. The configuration and message-catalog
// directories move with the installation: they are derived from where the
// running executable lives and exported for the roles and client libraries.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

// Version reported by `--version`.
pub const PG_VERSION: &str = "12.0";

// Program name used when argv[0] is missing or empty.
pub const DEFAULT_PROGNAME: &str = "postgres";

// Where --help tells users to send bug reports.
pub const BUG_REPORT_ADDRESS: &str = "pgsql-bugs@lists.postgresql.org";

// Whether fork() is emulated by re-executing the binary.
// Set by build.rs for Windows or the
// `exec-backend` feature.
pub const EXEC_BACKEND: bool = cfg!(exec_backend);

// Whether the server was built with SSL support (USE_SSL).
pub const USE_SSL: bool = cfg!(feature = "ssl");

// Environment variable selecting the minimum startup log level.
pub const ENV_LOG_LEVEL: &str = "POSTGRES_STARTUP_LOG_LEVEL";

// Environment handed to the single-session program.
pub const ENV_SESSION_USER: &str = "POSTGRES_SESSION_USER";
pub const ENV_SESSION_DATABASE: &str = "POSTGRES_SESSION_DATABASE";

// Whether message translation is built in; only then is the locale
// directory exported.
pub const ENABLE_NLS: bool = cfg!(feature = "nls");

// Install layout the binary was built for. A relocated installation keeps
// the same shape relative to its `bin` directory.
pub const PGBINDIR: &str = "/usr/local/pgsql/bin";
pub const SYSCONFDIR: &str = "/usr/local/pgsql/etc";
pub const LOCALEDIR: &str = "/usr/local/pgsql/share/locale";

// Exported for the roles and client libraries unless already set.
pub const ENV_SYSCONFDIR: &str = "PGSYSCONFDIR";
pub const ENV_LOCALEDIR: &str = "PGLOCALEDIR";

/// An external role program the dispatcher can hand the process to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleProgram {
    Supervisor,
    SingleSession,
    Bootstrap,
    DescribeConfig,
    ForkedWorker,
}

impl RoleProgram {
    /// Human-readable role name used in diagnostics.
    pub fn role_name(self) -> &'static str {
        match self {
            RoleProgram::Supervisor => "supervisor",
            RoleProgram::SingleSession => "single-user",
            RoleProgram::Bootstrap => "bootstrap",
            RoleProgram::DescribeConfig => "describe-config",
            RoleProgram::ForkedWorker => "forked worker",
        }
    }

    /// Installed file name, looked up next to the running executable.
    pub fn default_file_name(self) -> &'static str {
        match self {
            RoleProgram::Supervisor => "postgres-supervisor",
            RoleProgram::SingleSession => "postgres-single",
            RoleProgram::Bootstrap => "postgres-boot",
            RoleProgram::DescribeConfig => "postgres-describe-config",
            RoleProgram::ForkedWorker => "postgres-forkchild",
        }
    }

    /// Environment variable that overrides the program path.
    pub fn env_var(self) -> &'static str {
        match self {
            RoleProgram::Supervisor => "POSTGRES_SUPERVISOR_PROGRAM",
            RoleProgram::SingleSession => "POSTGRES_SINGLE_PROGRAM",
            RoleProgram::Bootstrap => "POSTGRES_BOOT_PROGRAM",
            RoleProgram::DescribeConfig => "POSTGRES_DESCRIBE_CONFIG_PROGRAM",
            RoleProgram::ForkedWorker => "POSTGRES_FORKCHILD_PROGRAM",
        }
    }
}

/// Resolve the program for `role` from the environment and the location of
/// the running executable.
pub fn role_program_path(role: RoleProgram) -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    role_program_path_from(role, std::env::var_os(role.env_var()), exe_dir.as_deref())
}

/// Testable core of [`role_program_path`].
///
/// A non-empty override wins. Otherwise the default file name is joined onto
/// `exe_dir`, or returned bare when the executable location is unknown.
pub fn role_program_path_from(
    role: RoleProgram,
    env_val: Option<OsString>,
    exe_dir: Option<&Path>,
) -> PathBuf {
    if let Some(path) = env_val.filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    let mut name = OsString::from(role.default_file_name());
    if cfg!(windows) {
        name.push(".exe");
    }
    match exe_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Where `target` lives for an executable in `exe_dir`.
///
/// `target` and `bindir` share a prefix in the build layout; the part of
/// `bindir` after it is swapped for the part of `target` after it. An
/// executable outside any `bindir`-shaped directory gets `target` as is.
pub fn relocated_dir(target: &Path, bindir: &Path, exe_dir: &Path) -> PathBuf {
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let bin_parts: Vec<Component<'_>> = bindir.components().collect();
    let common = target_parts
        .iter()
        .zip(&bin_parts)
        .take_while(|(a, b)| a == b)
        .count();
    let bin_tail = &bin_parts[common..];

    let exe_parts: Vec<Component<'_>> = exe_dir.components().collect();
    if !exe_parts.ends_with(bin_tail) {
        return target.to_path_buf();
    }
    let mut out: PathBuf = exe_parts[..exe_parts.len() - bin_tail.len()].iter().collect();
    out.extend(&target_parts[common..]);
    out
}

/// Export `PGSYSCONFDIR` (and `PGLOCALEDIR` with message translation)
/// for the running executable. Returns what was exported.
pub fn export_service_dirs() -> Vec<(&'static str, PathBuf)> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let exports = service_dir_exports_from(
        std::env::var_os(ENV_SYSCONFDIR).as_deref(),
        std::env::var_os(ENV_LOCALEDIR).as_deref(),
        exe_dir.as_deref(),
        ENABLE_NLS,
    );
    for (name, dir) in &exports {
        std::env::set_var(name, dir);
    }
    exports
}

/// Testable core of [`export_service_dirs`].
///
/// A variable that is already set, even to the empty string, is left
/// alone. Without a known executable location nothing is exported.
pub fn service_dir_exports_from(
    sysconf_env: Option<&OsStr>,
    locale_env: Option<&OsStr>,
    exe_dir: Option<&Path>,
    nls: bool,
) -> Vec<(&'static str, PathBuf)> {
    let Some(exe_dir) = exe_dir else {
        return Vec::new();
    };
    let bindir = Path::new(PGBINDIR);
    let mut exports = Vec::new();
    if nls && locale_env.is_none() {
        exports.push((ENV_LOCALEDIR, relocated_dir(Path::new(LOCALEDIR), bindir, exe_dir)));
    }
    if sysconf_env.is_none() {
        exports.push((ENV_SYSCONFDIR, relocated_dir(Path::new(SYSCONFDIR), bindir, exe_dir)));
    }
    exports
}
