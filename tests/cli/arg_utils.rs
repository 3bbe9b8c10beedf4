// Integration tests for cli/arg_utils.rs — program name and database scan
//
//   - `progname_from`       → name shown in messages and --help
//   - `single_user_dbname`  → database operand after `--single`

use std::ffi::OsString;

use postgres_main::cli::arg_utils::{progname_from, single_user_dbname, strip_exe_suffix};

// ─────────────────────────────────────────────────────────────────────────────
// progname_from
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn progname_is_basename_of_argv0() {
    assert_eq!(progname_from(Some("/usr/lib/postgresql/12/bin/postgres"), false), "postgres");
    assert_eq!(progname_from(Some("./pgserv"), false), "pgserv");
}

#[test]
fn progname_strips_exe_only_on_windows() {
    assert_eq!(progname_from(Some("C:\\pg\\bin\\postgres.exe"), true), "postgres");
    assert_eq!(progname_from(Some("C:\\pg\\bin\\POSTGRES.EXE"), true), "POSTGRES");
    assert_eq!(progname_from(Some("/opt/postgres.exe"), false), "postgres.exe");
}

#[test]
fn progname_falls_back_when_argv0_is_unusable() {
    assert_eq!(progname_from(None, false), "postgres");
    assert_eq!(progname_from(Some(""), false), "postgres");
    assert_eq!(progname_from(Some("/usr/bin/"), false), "postgres");
}

#[test]
fn exe_suffix_alone_is_kept() {
    // ".exe" has no stem to keep
    assert_eq!(strip_exe_suffix(".exe"), ".exe");
    assert_eq!(strip_exe_suffix("a.exe"), "a");
}

// ─────────────────────────────────────────────────────────────────────────────
// single_user_dbname
// ─────────────────────────────────────────────────────────────────────────────

fn dbname(args: &[&str]) -> Option<String> {
    let args: Vec<OsString> = args.iter().map(OsString::from).collect();
    single_user_dbname(&args).map(|name| name.into_string().unwrap())
}

#[test]
fn dbname_absent() {
    assert_eq!(dbname(&[]), None);
    assert_eq!(dbname(&["-D", "/data"]), None);
    assert_eq!(dbname(&["-E", "-j"]), None);
}

#[test]
fn dbname_after_switches() {
    assert_eq!(dbname(&["mydb"]), Some("mydb".to_owned()));
    assert_eq!(dbname(&["-D", "/data", "mydb"]), Some("mydb".to_owned()));
    assert_eq!(dbname(&["-D/data", "-E", "mydb"]), Some("mydb".to_owned()));
    assert_eq!(dbname(&["-c", "work_mem=4MB", "mydb"]), Some("mydb".to_owned()));
}

#[test]
fn dbname_before_switches() {
    assert_eq!(dbname(&["mydb", "-D", "/data"]), Some("mydb".to_owned()));
    assert_eq!(dbname(&["-E", "mydb", "-c", "work_mem=4MB"]), Some("mydb".to_owned()));
}

#[test]
fn dbname_after_long_parameter_setting() {
    assert_eq!(dbname(&["--work_mem=4MB", "mydb"]), Some("mydb".to_owned()));
}

#[test]
fn dbname_after_double_dash() {
    assert_eq!(dbname(&["-E", "--", "-odd-name"]), Some("-odd-name".to_owned()));
}

#[test]
fn more_than_one_operand_is_not_a_dbname() {
    assert_eq!(dbname(&["one", "two"]), None);
    assert_eq!(dbname(&["one", "-D", "/data", "two"]), None);
}

#[cfg(unix)]
#[test]
fn dbname_is_returned_byte_for_byte() {
    use std::os::unix::ffi::OsStringExt;

    let args = [
        OsString::from("-D"),
        OsString::from_vec(b"/srv/\xfe".to_vec()),
        OsString::from_vec(b"na\xefve".to_vec()),
    ];
    assert_eq!(
        single_user_dbname(&args),
        Some(OsString::from_vec(b"na\xefve".to_vec()))
    );
}
