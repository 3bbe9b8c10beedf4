// cli/constants.rs — first-argument tokens and the version banner.

use crate::config::PG_VERSION;

pub const HELP_LONG: &str = "--help";
pub const HELP_SHORT: &str = "-?";
pub const VERSION_LONG: &str = "--version";
pub const VERSION_SHORT: &str = "-V";
pub const DESCRIBE_CONFIG: &str = "--describe-config";
/// `-C NAME` prints one run-time parameter; exempt from the root check only
/// as the very first argument.
pub const SHOW_PARAMETER: &str = "-C";
/// Prefix of the first argument a fork-emulating build passes to its
/// re-executed children (`--forkbackend`, `--forkavlauncher`, ...).
pub const FORK_PREFIX: &str = "--fork";
pub const BOOT: &str = "--boot";
pub const SINGLE: &str = "--single";

/// Text printed by `--version`.
pub fn backend_version_string() -> String {
    format!("postgres (PostgreSQL) {}\n", PG_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_banner() {
        assert_eq!(backend_version_string(), "postgres (PostgreSQL) 12.0\n");
    }

    #[test]
    fn fork_prefix_is_six_bytes() {
        assert_eq!(FORK_PREFIX.len(), 6);
        assert!("--forkbackend".starts_with(FORK_PREFIX));
    }
}
