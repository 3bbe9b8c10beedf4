// Integration tests for cli/help.rs — --help and --version output

use postgres_main::cli::constants::backend_version_string;
use postgres_main::cli::help::{write_help, write_version};

fn help(progname: &str, ssl: bool) -> String {
    let mut buf = Vec::new();
    write_help(&mut buf, progname, ssl).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).unwrap()
}

#[test]
fn help_sections_in_order() {
    let text = help("postgres", false);
    let usage = text.find("Usage:").unwrap();
    let options = text.find("\nOptions:\n").unwrap();
    let developer = text.find("\nDeveloper options:\n").unwrap();
    let single = text.find("\nOptions for single-user mode:\n").unwrap();
    let boot = text.find("\nOptions for bootstrapping mode:\n").unwrap();
    assert!(usage < options && options < developer && developer < single && single < boot);
}

#[test]
fn help_lists_mode_selectors() {
    let text = help("postgres", false);
    assert!(text.contains("--single           selects single-user mode (must be first argument)"));
    assert!(text.contains("--boot             selects bootstrapping mode (must be first argument)"));
    assert!(text.contains("--describe-config  describe configuration parameters, then exit"));
    assert!(text.contains("-C NAME            print value of run-time parameter, then exit"));
}

#[test]
fn help_uses_given_program_name() {
    let text = help("pg_custom", false);
    assert!(text.starts_with("pg_custom is the PostgreSQL server."));
    assert!(text.contains("  pg_custom [OPTION]..."));
}

#[test]
fn ssl_option_only_when_built_with_ssl() {
    assert!(!help("postgres", false).contains("-l "));
    assert!(help("postgres", true).contains("-l                 enable SSL connections"));
}

#[test]
fn version_banner_matches_constant() {
    let mut buf = Vec::new();
    write_version(&mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), backend_version_string());
    assert_eq!(backend_version_string(), "postgres (PostgreSQL) 12.0\n");
}
