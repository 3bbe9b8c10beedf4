// cli/help.rs — --help and --version output.
//
// The option lists must match what the supervisor and the single-user and
// bootstrap engines actually accept.

use std::io::{self, Write};

use crate::cli::constants::backend_version_string;
use crate::config::BUG_REPORT_ADDRESS;

/// Write the full usage text for `progname` to `out`.
pub fn write_help(out: &mut dyn Write, progname: &str, ssl: bool) -> io::Result<()> {
    writeln!(out, "{} is the PostgreSQL server.\n", progname)?;
    writeln!(out, "Usage:\n  {} [OPTION]...\n", progname)?;
    writeln!(out, "Options:")?;
    writeln!(out, "  -B NBUFFERS        number of shared buffers")?;
    writeln!(out, "  -c NAME=VALUE      set run-time parameter")?;
    writeln!(out, "  -C NAME            print value of run-time parameter, then exit")?;
    writeln!(out, "  -d 1-5             debugging level")?;
    writeln!(out, "  -D DATADIR         database directory")?;
    writeln!(out, "  -e                 use European date input format (DMY)")?;
    writeln!(out, "  -F                 turn fsync off")?;
    writeln!(out, "  -h HOSTNAME        host name or IP address to listen on")?;
    writeln!(out, "  -i                 enable TCP/IP connections")?;
    writeln!(out, "  -k DIRECTORY       Unix-domain socket location")?;
    if ssl {
        writeln!(out, "  -l                 enable SSL connections")?;
    }
    writeln!(out, "  -N MAX-CONNECT     maximum number of allowed connections")?;
    writeln!(out, "  -o OPTIONS         pass \"OPTIONS\" to each server process (obsolete)")?;
    writeln!(out, "  -p PORT            port number to listen on")?;
    writeln!(out, "  -s                 show statistics after each query")?;
    writeln!(out, "  -S WORK-MEM        set amount of memory for sorts (in kB)")?;
    writeln!(out, "  -V, --version      output version information, then exit")?;
    writeln!(out, "  --NAME=VALUE       set run-time parameter")?;
    writeln!(out, "  --describe-config  describe configuration parameters, then exit")?;
    writeln!(out, "  -?, --help         show this help, then exit")?;

    writeln!(out, "\nDeveloper options:")?;
    writeln!(out, "  -f s|i|n|m|h       forbid use of some plan types")?;
    writeln!(out, "  -n                 do not reinitialize shared memory after abnormal exit")?;
    writeln!(out, "  -O                 allow system table structure changes")?;
    writeln!(out, "  -P                 disable system indexes")?;
    writeln!(out, "  -t pa|pl|ex        show timings after each query")?;
    writeln!(out, "  -T                 send SIGSTOP to all backend processes if one dies")?;
    writeln!(out, "  -W NUM             wait NUM seconds to allow attach from a debugger")?;

    writeln!(out, "\nOptions for single-user mode:")?;
    writeln!(out, "  --single           selects single-user mode (must be first argument)")?;
    writeln!(out, "  DBNAME             database name (defaults to user name)")?;
    writeln!(out, "  -d 0-5             override debugging level")?;
    writeln!(out, "  -E                 echo statement before execution")?;
    writeln!(out, "  -j                 do not use newline as interactive query delimiter")?;
    writeln!(out, "  -r FILENAME        send stdout and stderr to given file")?;

    writeln!(out, "\nOptions for bootstrapping mode:")?;
    writeln!(out, "  --boot             selects bootstrapping mode (must be first argument)")?;
    writeln!(out, "  DBNAME             database name (mandatory argument in bootstrapping mode)")?;
    writeln!(out, "  -r FILENAME        send stdout and stderr to given file")?;
    writeln!(out, "  -x NUM             internal use")?;

    writeln!(
        out,
        "\nPlease read the documentation for the complete list of run-time\n\
         configuration settings and how to set them on the command line or in\n\
         the configuration file.\n\n\
         Report bugs to <{}>.",
        BUG_REPORT_ADDRESS
    )?;
    out.flush()
}

/// Write the `--version` banner to `out`.
pub fn write_version(out: &mut dyn Write) -> io::Result<()> {
    out.write_all(backend_version_string().as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn help_text(progname: &str, ssl: bool) -> String {
        let mut buf = Vec::new();
        write_help(&mut buf, progname, ssl).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn help_names_program_and_sections() {
        let text = help_text("pgserv", false);
        assert!(text.starts_with("pgserv is the PostgreSQL server.\n\n"));
        assert!(text.contains("Usage:\n  pgserv [OPTION]...\n"));
        assert!(text.contains("\nDeveloper options:\n"));
        assert!(text.contains("\nOptions for single-user mode:\n"));
        assert!(text.contains("\nOptions for bootstrapping mode:\n"));
        assert!(text.ends_with("Report bugs to <pgsql-bugs@lists.postgresql.org>.\n"));
    }

    #[test]
    fn ssl_line_follows_build() {
        assert!(!help_text("postgres", false).contains("enable SSL connections"));
        assert!(help_text("postgres", true).contains("  -l                 enable SSL connections\n"));
    }

    #[test]
    fn version_is_single_line() {
        let mut buf = Vec::new();
        write_version(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("postgres (PostgreSQL) "));
    }
}
