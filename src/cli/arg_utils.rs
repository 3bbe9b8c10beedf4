// arg_utils.rs — small argument helpers for the entry routine.

use std::ffi::OsString;

use crate::config::DEFAULT_PROGNAME;

/// Returns the last path component of `path`, handling both `/` and `\` separators.
pub fn last_name_from_path(path: &str) -> &str {
    let after_slash = match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    };
    match after_slash.rfind('\\') {
        Some(pos) => &after_slash[pos + 1..],
        None => after_slash,
    }
}

/// Strips a trailing `.exe` (any case).
pub fn strip_exe_suffix(name: &str) -> &str {
    let n = name.len();
    if n > 4 && name.is_char_boundary(n - 4) && name[n - 4..].eq_ignore_ascii_case(".exe") {
        &name[..n - 4]
    } else {
        name
    }
}

/// Program name as shown in messages: the basename of `argv0`, with `.exe`
/// removed when `windows` is set. Falls back to `postgres` for an empty or
/// missing argv[0].
pub fn progname_from(argv0: Option<&str>, windows: bool) -> String {
    let base = last_name_from_path(argv0.unwrap_or(""));
    let base = if windows { strip_exe_suffix(base) } else { base };
    if base.is_empty() {
        DEFAULT_PROGNAME.to_owned()
    } else {
        base.to_owned()
    }
}

/// Single-letter switches of the single-user engine that take a value.
/// `-` covers `--name=value`.
const SINGLE_USER_VALUE_SWITCHES: &[u8] = b"BcCDdfhkNoprStvW-";

/// Find the database name given to `--single`.
///
/// `args` are the arguments after `--single`. Switches are skipped the way
/// a permuting getopt would: grouped letters, values attached or in the
/// next argument, operands anywhere, and `--` ends the switches. The
/// database name is the one operand left over; none, or more than one,
/// yields `None` and the engine decides. Arguments need not be UTF-8.
pub fn single_user_dbname(args: &[OsString]) -> Option<OsString> {
    let mut operands: Vec<&OsString> = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let bytes = arg.as_encoded_bytes();
        if bytes == b"--" {
            operands.extend(iter.by_ref());
            break;
        }
        if bytes.len() < 2 || bytes[0] != b'-' {
            operands.push(arg);
            continue;
        }
        let letters = &bytes[1..];
        if let Some(pos) = letters.iter().position(|b| SINGLE_USER_VALUE_SWITCHES.contains(b)) {
            if pos + 1 == letters.len() {
                // value is the next argument
                iter.next();
            }
        }
    }
    match operands.as_slice() {
        [dbname] => Some((*dbname).clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_name_unix_and_windows() {
        assert_eq!(last_name_from_path("/usr/local/pgsql/bin/postgres"), "postgres");
        assert_eq!(last_name_from_path("C:\\pg\\bin\\postgres.exe"), "postgres.exe");
        assert_eq!(last_name_from_path("postgres"), "postgres");
    }

    #[test]
    fn exe_suffix_only_stripped_when_present() {
        assert_eq!(strip_exe_suffix("postgres.EXE"), "postgres");
        assert_eq!(strip_exe_suffix("postgres"), "postgres");
        assert_eq!(strip_exe_suffix(".exe"), ".exe");
    }

    #[test]
    fn progname_falls_back() {
        assert_eq!(progname_from(None, false), "postgres");
        assert_eq!(progname_from(Some("/bin/"), false), "postgres");
        assert_eq!(progname_from(Some("/opt/pg/bin/pg12"), false), "pg12");
        assert_eq!(progname_from(Some("bin\\postgres.exe"), true), "postgres");
        assert_eq!(progname_from(Some("postgres.exe"), false), "postgres.exe");
    }

    fn os(a: &[&str]) -> Vec<OsString> {
        a.iter().map(OsString::from).collect()
    }

    fn dbname(a: &[&str]) -> Option<String> {
        single_user_dbname(&os(a)).map(|d| d.into_string().unwrap())
    }

    #[test]
    fn dbname_after_switches() {
        assert_eq!(dbname(&["mydb"]), Some("mydb".to_owned()));
        assert_eq!(dbname(&["-D", "/data", "mydb"]), Some("mydb".to_owned()));
        assert_eq!(dbname(&["-D/data", "-E", "mydb"]), Some("mydb".to_owned()));
        assert_eq!(dbname(&["-Ed", "5", "mydb"]), Some("mydb".to_owned()));
        assert_eq!(dbname(&["--search_path=x", "mydb"]), Some("mydb".to_owned()));
        assert_eq!(dbname(&["-j", "--", "-odd"]), Some("-odd".to_owned()));
        assert_eq!(dbname(&["sales", "-D", "/data"]), Some("sales".to_owned()));
        assert_eq!(dbname(&["-E", "sales", "-c", "work_mem=4MB", "-j"]), Some("sales".to_owned()));
    }

    #[test]
    fn dbname_absent_or_ambiguous() {
        assert_eq!(dbname(&[]), None);
        assert_eq!(dbname(&["-D", "/data"]), None);
        assert_eq!(dbname(&["a", "b"]), None);
        assert_eq!(dbname(&["a", "-D", "/data", "b"]), None);
        assert_eq!(dbname(&["a", "--", "b"]), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments_keep_their_positions() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("-D"),
            OsString::from_vec(b"/data/\xff".to_vec()),
            OsString::from("sales"),
        ];
        assert_eq!(single_user_dbname(&args), Some(OsString::from("sales")));

        let raw = OsString::from_vec(b"caf\xe9".to_vec());
        assert_eq!(single_user_dbname(&[raw.clone()]), Some(raw));
    }
}
