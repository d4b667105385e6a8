// Unit tests for argument parsing.

use crate::cli::{Cli, Command, YesNo};

use std::path::PathBuf;

use clap::Parser;

/// **VALUE**: Verifies the CI defaults: local mode on, no token.
///
/// **WHY THIS MATTERS**: Analysts run the tool with no flags; it must apply
/// their local overrides without being told.
#[test]
fn given_bare_prepare_when_parsed_then_local_yes_and_no_token() {
    // GIVEN/WHEN: Only the subcommand
    let cli = Cli::try_parse_from(["forecast-env", "prepare"]).unwrap();

    // THEN: Defaults apply
    assert!(cli.root.is_none());
    assert!(!cli.verbose);
    match cli.command {
        Command::Prepare(args) => {
            assert_eq!(args.local, YesNo::Yes);
            assert!(args.token().is_none());
        }
        other => panic!("Expected prepare, got {other:?}"),
    }
}

#[test]
fn given_install_flags_when_parsed_then_values_carried() {
    let cli = Cli::try_parse_from([
        "forecast-env",
        "install",
        "--local",
        "no",
        "--pat",
        "ghp_x",
        "--root",
        "/work/round-42",
    ])
    .unwrap();

    assert_eq!(cli.root, Some(PathBuf::from("/work/round-42")));
    match cli.command {
        Command::Install(args) => {
            assert!(!args.local.is_yes());
            assert_eq!(args.token().unwrap().expose(), "ghp_x");
        }
        other => panic!("Expected install, got {other:?}"),
    }
}

#[test]
fn given_invalid_local_value_when_parsed_then_rejected() {
    let result = Cli::try_parse_from(["forecast-env", "prepare", "--local", "maybe"]);

    assert!(result.is_err());
}

/// **BUG THIS CATCHES**: Would catch an empty `--pat ""` (what CI passes when
/// the secret is unset) being treated as a token and embedded into URLs.
#[test]
fn given_blank_pat_when_reading_token_then_none() {
    let cli = Cli::try_parse_from(["forecast-env", "prepare", "--pat", "  "]).unwrap();

    match cli.command {
        Command::Prepare(args) => assert!(args.token().is_none()),
        other => panic!("Expected prepare, got {other:?}"),
    }
}

#[test]
fn given_stamp_request_without_optionals_when_parsed_then_defaults_apply() {
    let cli = Cli::try_parse_from([
        "forecast-env",
        "stamp-request",
        "--config-path",
        "requests/input-data-request.json",
    ])
    .unwrap();

    match cli.command {
        Command::StampRequest(args) => {
            assert_eq!(args.config_path, PathBuf::from("requests/input-data-request.json"));
            assert!(args.output_file.is_none());
            assert_eq!(args.params_json, "{}");
        }
        other => panic!("Expected stamp-request, got {other:?}"),
    }
}

#[test]
fn given_no_subcommand_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["forecast-env"]).is_err());
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from(["forecast-env", "install", "--verbose"]).unwrap();

    assert!(cli.verbose);
}
