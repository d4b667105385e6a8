use crate::support::{FakeVcs, VcsCall};

use provision_core::error::provisioning::ProvisioningError;
use provision_core::installer::credentials::DEFAULT_PRIVATE_URL_PATTERN;
use provision_core::installer::{CloneCredentials, DependencyInstaller};
use provision_core::vcs::CloneStrategy;

use common::RedactedSecret;
use models::{DependencySet, DependencySpec};

use tempfile::TempDir;

fn set_of(entries: Vec<(&str, DependencySpec)>) -> DependencySet {
    let mut set = DependencySet::new();
    for (name, spec) in entries {
        set.insert(name, spec).unwrap();
    }
    set
}

/// **VALUE**: Verifies branch-pinned dependencies never get a checkout step.
///
/// **WHY THIS MATTERS**: A shallow branch clone has exactly one commit; a later
/// checkout of anything else would fail, and a checkout of the branch name is
/// redundant work.
#[tokio::test]
async fn given_branch_pinned_spec_when_installed_then_shallow_clone_without_checkout() {
    // GIVEN: One branch-pinned dependency
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let installer = DependencyInstaller::new(vcs.clone(), temp.path(), CloneCredentials::anonymous());
    let spec = DependencySpec::branch_pinned("https://example.com/wf.git", "analyst");

    // WHEN: Installing
    let destination = installer.install("workflow-forecast", &spec).await.unwrap();

    // THEN: One shallow clone, no checkout
    assert_eq!(destination, temp.path().join("workflow-forecast"));
    assert_eq!(
        vcs.calls(),
        vec![VcsCall::Clone {
            name: "workflow-forecast".to_string(),
            url: "https://example.com/wf.git".to_string(),
            destination: destination.clone(),
            strategy: CloneStrategy::ShallowBranch {
                branch: "analyst".to_string()
            },
        }]
    );
    assert!(vcs.checkouts().is_empty());
}

/// **VALUE**: Verifies commit-pinned dependencies are cloned without checkout, then checked out.
#[tokio::test]
async fn given_commit_pinned_spec_when_installed_then_clone_then_checkout() {
    // GIVEN: One commit-pinned dependency
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let installer = DependencyInstaller::new(vcs.clone(), temp.path(), CloneCredentials::anonymous());
    let spec = DependencySpec::commit_pinned("https://example.com/model.git", "4f2a9c1");

    // WHEN: Installing
    installer.install("model", &spec).await.unwrap();

    // THEN: Clone (no checkout) followed by checkout of the commit, in that order
    let destination = temp.path().join("model");
    assert_eq!(
        vcs.calls(),
        vec![
            VcsCall::Clone {
                name: "model".to_string(),
                url: "https://example.com/model.git".to_string(),
                destination: destination.clone(),
                strategy: CloneStrategy::NoCheckout,
            },
            VcsCall::Checkout {
                name: "model".to_string(),
                destination,
                revision: "4f2a9c1".to_string(),
            },
        ]
    );
}

/// **VALUE**: Verifies installing twice leaves the same tree as installing once.
///
/// **BUG THIS CATCHES**: Would catch stale files from a previous run surviving
/// the reinstall (the fake writes only the canned files, so anything else is a
/// leak), or the second clone failing because the directory already exists.
#[tokio::test]
async fn given_previous_install_when_installed_again_then_stale_content_removed() {
    // GIVEN: A first install plus a stray file added afterwards
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new().with_file("model", "requests/input-data-request.json", "[]");
    let installer = DependencyInstaller::new(vcs.clone(), temp.path(), CloneCredentials::anonymous());
    let set = set_of(vec![(
        "model",
        DependencySpec::commit_pinned("https://example.com/model.git", "abc"),
    )]);
    installer.install_all(&set).await.unwrap();
    std::fs::write(temp.path().join("model/stray.txt"), "leftover").unwrap();

    // WHEN: Installing again
    installer.install_all(&set).await.unwrap();

    // THEN: Only the cloned content exists
    let model = temp.path().join("model");
    assert!(model.join("requests/input-data-request.json").exists());
    assert!(!model.join("stray.txt").exists());
    assert_eq!(vcs.calls().len(), 4);
}

/// **VALUE**: Verifies the first failing dependency aborts the remaining installs.
#[tokio::test]
async fn given_failing_clone_when_installing_all_then_later_dependencies_untouched() {
    // GIVEN: Three dependencies, the second of which fails
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new().failing_clone_of("b");
    let installer = DependencyInstaller::new(vcs.clone(), temp.path(), CloneCredentials::anonymous());
    let set = set_of(vec![
        ("a", DependencySpec::branch_pinned("https://example.com/a.git", "main")),
        ("b", DependencySpec::commit_pinned("https://example.com/b.git", "x")),
        ("c", DependencySpec::branch_pinned("https://example.com/c.git", "main")),
    ]);

    // WHEN: Installing
    let result = installer.install_all(&set).await;

    // THEN: Clone error for b, no checkout for b, c never attempted
    match result {
        Err(ProvisioningError::Clone { name, .. }) => assert_eq!(name, "b"),
        other => panic!("Expected Clone error, got {other:?}"),
    }
    let cloned: Vec<String> = vcs
        .calls()
        .into_iter()
        .map(|c| match c {
            VcsCall::Clone { name, .. } | VcsCall::Checkout { name, .. } => name,
        })
        .collect();
    assert_eq!(cloned, vec!["a", "b"]);
    assert!(!temp.path().join("c").exists());
}

#[tokio::test]
async fn given_set_when_installing_all_then_installs_in_mapping_order() {
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let installer = DependencyInstaller::new(vcs.clone(), temp.path(), CloneCredentials::anonymous());
    let set = set_of(vec![
        ("zeta", DependencySpec::branch_pinned("https://example.com/z.git", "main")),
        ("alpha", DependencySpec::branch_pinned("https://example.com/a.git", "main")),
    ]);

    let installed = installer.install_all(&set).await.unwrap();

    assert_eq!(
        installed,
        vec![temp.path().join("zeta"), temp.path().join("alpha")]
    );
}

/// **VALUE**: Verifies the token reaches only private-organization clones.
#[tokio::test]
async fn given_token_when_installing_mixed_urls_then_only_private_urls_tokenized() {
    // GIVEN: A token, one private and one public dependency
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let credentials =
        CloneCredentials::new(Some(RedactedSecret::new("ghp_t0k")), DEFAULT_PRIVATE_URL_PATTERN)
            .unwrap();
    let installer = DependencyInstaller::new(vcs.clone(), temp.path(), credentials);
    let set = set_of(vec![
        ("model", DependencySpec::commit_pinned("https://github.com/OGR-EIU/model.git", "abc")),
        ("iris", DependencySpec::branch_pinned("https://github.com/IRIS-Solutions-Team/iris.git", "main")),
    ]);

    // WHEN: Installing
    installer.install_all(&set).await.unwrap();

    // THEN: Tokenized private URL, untouched public URL
    assert_eq!(
        vcs.cloned_urls(),
        vec![
            "https://ghp_t0k@github.com/OGR-EIU/model.git",
            "https://github.com/IRIS-Solutions-Team/iris.git",
        ]
    );
}
