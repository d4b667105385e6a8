use crate::{DependencyRecord, DependencySpec, DependencySpecBuilder, ModelError};

/// **VALUE**: Verifies that a config entry setting both `branch` and `commitish` is rejected.
///
/// **WHY THIS MATTERS**: The installer picks its clone strategy from which field is
/// set. With both present, one of them would be silently ignored and the run would
/// use a revision nobody asked for.
///
/// **BUG THIS CATCHES**: Would catch if the builder quietly preferred one field
/// instead of failing.
#[test]
fn given_branch_and_commitish_when_building_then_returns_validation_error() {
    // GIVEN: A builder with both pins
    let builder = DependencySpecBuilder::default()
        .with_url("https://github.com/OGR-EIU/model-us.git")
        .with_branch("main")
        .with_commitish("abc1234");

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation fails and names both values
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert!(message.contains("both"));
            assert!(message.contains("main"));
            assert!(message.contains("abc1234"));
        }
    }
}

#[test]
fn given_neither_pin_when_building_then_returns_validation_error() {
    // GIVEN: Only a URL
    let builder = DependencySpecBuilder::default().with_url("https://example.com/repo.git");

    // WHEN/THEN: Building fails
    assert!(matches!(
        builder.build(),
        Err(ModelError::Validation { message, .. }) if message.contains("neither")
    ));
}

#[test]
fn given_missing_or_blank_url_when_building_then_returns_validation_error() {
    let missing = DependencySpecBuilder::default().with_branch("main").build();
    let blank = DependencySpecBuilder::default()
        .with_url("   ")
        .with_branch("main")
        .build();

    assert!(matches!(missing, Err(ModelError::Validation { message, .. }) if message == "Repository URL is required"));
    assert!(matches!(blank, Err(ModelError::Validation { message, .. }) if message == "Repository URL cannot be empty"));
}

/// **VALUE**: Verifies that blank strings count as unset.
///
/// **WHY THIS MATTERS**: The CI step that generates config.json writes
/// `"branch": null` for commit-pinned entries, but hand-edited configs often use
/// `""`. Both must pick the commit-pinned strategy.
#[test]
fn given_blank_branch_and_commitish_when_building_then_commit_pinned() {
    // GIVEN: An empty branch and a real commit
    let builder = DependencySpecBuilder::default()
        .with_url("https://example.com/repo.git")
        .with_branch("")
        .with_commitish("0f3c2a1");

    // WHEN: Building
    let spec = builder.build().unwrap();

    // THEN: Commit pinned
    assert_eq!(
        spec,
        DependencySpec::commit_pinned("https://example.com/repo.git", "0f3c2a1")
    );
}

#[test]
fn given_null_fields_in_json_when_converted_then_picks_set_pin() {
    // GIVEN: Records as written by the config generator
    let branch: DependencyRecord = serde_json::from_str(
        r#"{"url": "https://example.com/a.git", "branch": "forecast-ANALYST", "commitish": null}"#,
    )
    .unwrap();
    let commit: DependencyRecord =
        serde_json::from_str(r#"{"url": "https://example.com/b.git", "commitish": "HEAD"}"#)
            .unwrap();

    // WHEN: Converting
    let branch = DependencySpec::try_from(branch).unwrap();
    let commit = DependencySpec::try_from(commit).unwrap();

    // THEN: Each uses the strategy of its set field
    assert_eq!(branch.revision(), "forecast-ANALYST");
    assert!(matches!(branch, DependencySpec::BranchPinned { .. }));
    assert_eq!(commit.revision(), "HEAD");
    assert_eq!(commit.url(), "https://example.com/b.git");
    assert!(matches!(commit, DependencySpec::CommitPinned { .. }));
}

#[test]
fn given_spec_when_converted_back_to_record_then_only_one_pin_set() {
    let spec = DependencySpec::branch_pinned("https://example.com/a.git", "dev");

    let record = DependencyRecord::from(&spec);

    assert_eq!(record.branch.as_deref(), Some("dev"));
    assert_eq!(record.commitish, None);
    assert_eq!(DependencySpec::try_from(record).unwrap(), spec);
}
