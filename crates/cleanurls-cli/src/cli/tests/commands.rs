//! Tests for the clean, unclean and config subcommands.

use super::parse;
use crate::cli::CliCommand;
use clap::Parser;

#[test]
fn cli_parse_clean() {
    match parse(&["cleanurls", "clean", "course/view.php?id=2"]).command {
        CliCommand::Clean { url } => assert_eq!(url, "course/view.php?id=2"),
        _ => panic!("expected Clean"),
    }
}

#[test]
fn cli_parse_unclean() {
    match parse(&["cleanurls", "unclean", "course/short%23course"]).command {
        CliCommand::Unclean { url, json } => {
            assert_eq!(url, "course/short%23course");
            assert!(!json);
        }
        _ => panic!("expected Unclean"),
    }
}

#[test]
fn cli_parse_unclean_json() {
    match parse(&["cleanurls", "unclean", "--json", "foo/bar.php"]).command {
        CliCommand::Unclean { url, json } => {
            assert_eq!(url, "foo/bar.php");
            assert!(json);
        }
        _ => panic!("expected Unclean with --json"),
    }
}

#[test]
fn cli_parse_config() {
    assert!(matches!(
        parse(&["cleanurls", "config"]).command,
        CliCommand::Config
    ));
}

#[test]
fn cli_requires_subcommand() {
    assert!(crate::cli::Cli::try_parse_from(["cleanurls"]).is_err());
}
