// Unit tests for the git command builders.
// The real-git round trip lives in integration_tests/vcs/git.rs.

use crate::vcs::git::{GIT_BINARY, build_checkout_command, build_clone_command};
use crate::vcs::{CloneStrategy, CloneUrl};

use common::RedactedSecret;

use std::ffi::OsStr;
use std::path::Path;

fn args_of(cmd: &tokio::process::Command) -> Vec<String> {
    cmd.as_std()
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

/// **VALUE**: Verifies the branch-pinned clone is a depth-1, single-branch clone.
///
/// **WHY THIS MATTERS**: Branch-pinned dependencies never get a checkout step, so
/// the clone itself must land on the requested branch. Without `--branch` git
/// would check out the remote's default branch.
///
/// **BUG THIS CATCHES**: Would catch a dropped `--branch`, a dropped depth limit
/// (full history of large repos), or the URL/destination being swapped.
#[test]
fn given_shallow_strategy_when_building_clone_then_uses_depth_one_branch_clone() {
    // GIVEN: A branch strategy
    let url = CloneUrl::plain("https://github.com/OGR-EIU/workflow-forecast.git");
    let strategy = CloneStrategy::ShallowBranch {
        branch: "analyst-2024q1".to_string(),
    };

    // WHEN: Building the command
    let cmd = build_clone_command(&url, Path::new("/ws/workflow-forecast"), &strategy);

    // THEN: git clone --depth 1 --branch <b> --single-branch <url> <dest>
    assert_eq!(cmd.as_std().get_program(), GIT_BINARY);
    assert_eq!(
        args_of(&cmd),
        vec![
            "clone",
            "--depth",
            "1",
            "--branch",
            "analyst-2024q1",
            "--single-branch",
            "https://github.com/OGR-EIU/workflow-forecast.git",
            "/ws/workflow-forecast",
        ]
    );
}

/// **VALUE**: Verifies the commit-pinned clone keeps history and skips the checkout.
///
/// **BUG THIS CATCHES**: Would catch `--depth 1` leaking into commit-pinned
/// clones, which makes any commit but the tip unreachable for the checkout that
/// follows.
#[test]
fn given_no_checkout_strategy_when_building_clone_then_uses_treeless_no_checkout_clone() {
    // GIVEN: A commit-pinned strategy
    let url = CloneUrl::plain("https://example.com/model.git");

    // WHEN: Building the command
    let cmd = build_clone_command(&url, Path::new("model"), &CloneStrategy::NoCheckout);

    // THEN: Treeless, no checkout, no depth limit
    let args = args_of(&cmd);
    assert_eq!(
        args,
        vec![
            "clone",
            "--filter=tree:0",
            "--no-checkout",
            "https://example.com/model.git",
            "model",
        ]
    );
    assert!(!args.iter().any(|a| a == "--depth"));
}

#[test]
fn given_revision_when_building_checkout_then_runs_inside_destination() {
    let cmd = build_checkout_command(Path::new("/ws/model"), "4f2a9c1");

    assert_eq!(args_of(&cmd), vec!["-C", "/ws/model", "checkout", "4f2a9c1"]);
}

/// **VALUE**: Verifies git can never block on an interactive credential prompt.
///
/// **WHY THIS MATTERS**: The installer runs unattended in CI. A private URL
/// without a token would otherwise hang the job waiting for a username.
#[test]
fn given_any_command_when_built_then_disables_terminal_prompt() {
    // GIVEN/WHEN: Both kinds of command
    let commands = [
        build_clone_command(
            &CloneUrl::plain("https://example.com/a.git"),
            Path::new("a"),
            &CloneStrategy::NoCheckout,
        ),
        build_checkout_command(Path::new("a"), "main"),
    ];

    // THEN: GIT_TERMINAL_PROMPT=0 is set on each
    for cmd in &commands {
        let prompt = cmd
            .as_std()
            .get_envs()
            .find(|(key, _)| *key == OsStr::new("GIT_TERMINAL_PROMPT"))
            .and_then(|(_, value)| value);
        assert_eq!(prompt, Some(OsStr::new("0")));
    }
}

#[test]
fn given_tokenized_url_when_building_clone_then_passes_real_url_to_git() {
    // GIVEN: A URL carrying a credential
    let url = CloneUrl::with_secret(
        "https://ghp_secret@github.com/OGR-EIU/model.git",
        RedactedSecret::new("ghp_secret"),
    );

    // WHEN: Building the command
    let cmd = build_clone_command(&url, Path::new("model"), &CloneStrategy::NoCheckout);

    // THEN: git gets the credential, while Display hides it
    assert!(args_of(&cmd).contains(&"https://ghp_secret@github.com/OGR-EIU/model.git".to_string()));
    assert!(!url.to_string().contains("ghp_secret"));
}
