#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::wildcard_enum_match_arm)]

use clap::CommandFactory;

use super::*;

/// The root help output must contain all top-level subcommand names.
#[test]
fn test_root_help_lists_all_subcommands() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    for name in ["compare", "summary", "select"] {
        assert!(
            help.contains(name),
            "root help should mention subcommand '{name}'"
        );
    }
}

/// The root help output must describe every global flag.
#[test]
fn test_root_help_lists_global_flags() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    let expected_flags = [
        "--format",
        "--quiet",
        "--verbose",
        "--max-file-size",
        "--no-color",
        "--help",
        "--version",
    ];
    for flag in &expected_flags {
        assert!(
            help.contains(flag),
            "root help should mention flag '{flag}'"
        );
    }
}

/// `attrdiff compare --help` must mention the pattern flags and `--collect`.
#[test]
fn test_compare_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("compare")
        .expect("compare subcommand should exist");
    let help = format!("{}", sub.render_help());
    for flag in ["--ignore", "--container", "--collect", "--stats-type"] {
        assert!(help.contains(flag), "compare help should mention {flag}");
    }
    assert!(help.contains("EXPECTED"), "compare help should mention EXPECTED");
}

/// `attrdiff summary --help` must mention `--strict`.
#[test]
fn test_summary_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("summary")
        .expect("summary subcommand should exist");
    let help = format!("{}", sub.render_help());
    assert!(
        help.contains("--strict"),
        "summary help should mention --strict"
    );
}

#[test]
fn test_compare_parses_paths_and_flags() {
    let cli = Cli::try_parse_from([
        "attrdiff",
        "compare",
        "expected.json",
        "-",
        "--container",
        "//Group",
        "--collect",
        "-f",
        "json",
    ])
    .expect("should parse compare");
    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::Compare {
            expected,
            found,
            args,
            collect,
        } => {
            assert!(!expected.is_stdin());
            assert!(found.is_stdin());
            assert_eq!(args.container.as_deref(), Some("//Group"));
            assert!(collect);
        }
        _ => panic!("expected Compare subcommand"),
    }
}

#[test]
fn test_summary_strict_defaults_off() {
    let cli = Cli::try_parse_from(["attrdiff", "summary", "a.json", "b.json"])
        .expect("should parse summary");
    match cli.command {
        Command::Summary { strict, .. } => assert!(!strict),
        _ => panic!("expected Summary subcommand"),
    }
}

#[test]
fn test_select_requires_pattern() {
    let result = Cli::try_parse_from(["attrdiff", "select", "tree.json"]);
    assert!(result.is_err(), "select without a pattern must be rejected");
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["attrdiff", "-q", "-v", "select", "t.json", "//*"]);
    assert!(result.is_err(), "--quiet and --verbose are exclusive");
}

#[test]
fn test_max_file_size_flag() {
    let cli = Cli::try_parse_from([
        "attrdiff",
        "--max-file-size",
        "1024",
        "select",
        "t.json",
        "//*",
    ])
    .expect("should parse --max-file-size");
    assert_eq!(cli.max_file_size, 1024);
}
