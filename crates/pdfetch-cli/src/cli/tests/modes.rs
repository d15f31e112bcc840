//! Tests for mode flag parsing.

use super::parse;
use crate::cli::Cli;
use clap::Parser;

#[test]
fn cli_parse_no_flags_is_fetch_mode() {
    let cli = parse(&["pdfetch"]);
    assert!(!cli.auth);
    assert!(!cli.verify);
    assert!(!cli.no_pause);
}

#[test]
fn cli_parse_auth() {
    let cli = parse(&["pdfetch", "--auth"]);
    assert!(cli.auth);
    assert!(!cli.verify);
}

#[test]
fn cli_parse_verify() {
    let cli = parse(&["pdfetch", "--verify"]);
    assert!(cli.verify);
    assert!(!cli.auth);
}

#[test]
fn cli_parse_no_pause() {
    let cli = parse(&["pdfetch", "--no-pause"]);
    assert!(cli.no_pause);
    assert!(!cli.auth);
    assert!(!cli.verify);
}

#[test]
fn cli_auth_and_verify_conflict() {
    assert!(Cli::try_parse_from(["pdfetch", "--auth", "--verify"]).is_err());
}

#[test]
fn cli_rejects_unknown_flag() {
    assert!(Cli::try_parse_from(["pdfetch", "--jobs", "4"]).is_err());
}
