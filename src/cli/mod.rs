//! First-argument handling for the `postgres` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Recognised first-argument tokens and the version banner. |
//! | [`arg_utils`] | Program name from argv[0]; database name scan for `--single`. |
//! | [`mode`]      | `ExecutionMode`, `PrivilegeCheck`, and the classifier. |
//! | [`help`]      | `--help` / `--version` output. |
//!
//! Typical call sequence: `mode::classify` → `help::write_help` or the
//! privilege guard → dispatch.

pub mod constants;
pub mod arg_utils;
pub mod mode;
pub mod help;
