//! Round trips against the real `git` binary and a local throwaway repository.
//! Skipped when git is not installed.

use provision_core::installer::{CloneCredentials, DependencyInstaller};
use provision_core::vcs::git::GitCli;

use models::DependencySpec;

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=Forecast", "-c", "user.email=forecast@example.com"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Origin with two commits on `main` and one extra on `analyst`.
/// Returns (origin URL, first commit, main tip).
fn seed_origin(dir: &Path) -> (String, String, String) {
    std::fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "--quiet", "--initial-branch=main"]);
    git(dir, &["config", "uploadpack.allowFilter", "true"]);

    std::fs::write(dir.join("startup.m"), "v1").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "--quiet", "-m", "first"]);
    let first = git(dir, &["rev-parse", "HEAD"]);

    std::fs::write(dir.join("startup.m"), "v2").unwrap();
    git(dir, &["commit", "--quiet", "-am", "second"]);
    let tip = git(dir, &["rev-parse", "HEAD"]);

    git(dir, &["checkout", "--quiet", "-b", "analyst"]);
    std::fs::write(dir.join("startup.m"), "analyst").unwrap();
    git(dir, &["commit", "--quiet", "-am", "judgment"]);
    git(dir, &["checkout", "--quiet", "main"]);

    (format!("file://{}", dir.display()), first, tip)
}

/// **VALUE**: Verifies a commit-pinned install ends at exactly that commit.
///
/// **WHY THIS MATTERS**: Forecast rounds are reproduced from the config alone.
/// If the working tree sits at the branch tip instead of the pinned commit,
/// the rerun uses different model code.
///
/// **BUG THIS CATCHES**: Would catch a shallow clone being used for commit pins
/// (older commits unreachable) or the checkout step running in the wrong
/// directory.
#[tokio::test]
async fn given_commit_pin_when_installed_with_git_then_head_equals_commit() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    // GIVEN: An origin whose tip differs from the pinned commit
    let temp = TempDir::new().unwrap();
    let (url, first, tip) = seed_origin(&temp.path().join("origin"));
    assert_ne!(first, tip);
    let workspace = temp.path().join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();
    let installer = DependencyInstaller::new(GitCli::new(), &workspace, CloneCredentials::anonymous());

    // WHEN: Installing the first commit
    let destination = installer
        .install("model", &DependencySpec::commit_pinned(&url, &first))
        .await
        .unwrap();

    // THEN: HEAD is the pinned commit and the tree matches it
    assert_eq!(git(&destination, &["rev-parse", "HEAD"]), first);
    assert_eq!(std::fs::read_to_string(destination.join("startup.m")).unwrap(), "v1");
}

#[tokio::test]
async fn given_branch_pin_when_installed_with_git_then_single_commit_of_branch() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    // GIVEN: An origin with an analyst branch
    let temp = TempDir::new().unwrap();
    let (url, _, _) = seed_origin(&temp.path().join("origin"));
    let workspace = temp.path().join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();
    let installer = DependencyInstaller::new(GitCli::new(), &workspace, CloneCredentials::anonymous());
    let spec = DependencySpec::branch_pinned(&url, "analyst");

    // WHEN: Installing twice
    installer.install("workflow-forecast", &spec).await.unwrap();
    let destination = installer.install("workflow-forecast", &spec).await.unwrap();

    // THEN: Branch content, depth one
    assert_eq!(
        std::fs::read_to_string(destination.join("startup.m")).unwrap(),
        "analyst"
    );
    assert_eq!(git(&destination, &["rev-list", "--count", "HEAD"]), "1");
}

#[tokio::test]
async fn given_unknown_commit_when_installed_with_git_then_checkout_error() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let (url, _, _) = seed_origin(&temp.path().join("origin"));
    let workspace = temp.path().join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();
    let installer = DependencyInstaller::new(GitCli::new(), &workspace, CloneCredentials::anonymous());

    let result = installer
        .install("model", &DependencySpec::commit_pinned(&url, "does-not-exist"))
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Checkout Error: model at does-not-exist"));
}
