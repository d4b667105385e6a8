use crate::{DependencySet, DependencySpec, ModelError};

fn spec(tag: &str) -> DependencySpec {
    DependencySpec::commit_pinned(format!("https://example.com/{tag}.git"), tag)
}

fn set_of(entries: &[(&str, &str)]) -> DependencySet {
    let mut set = DependencySet::new();
    for (name, tag) in entries {
        set.insert(*name, spec(tag)).unwrap();
    }
    set
}

/// **VALUE**: Verifies the local-mode merge is a right-biased union.
///
/// **WHY THIS MATTERS**: In local mode the analyst's branch of the workflow repo
/// must replace the pinned commit from `dependencies`. If the merge were
/// left-biased, analysts would silently run against the CI revision instead of
/// their own judgment files.
///
/// **BUG THIS CATCHES**: Would catch if `merged_with` kept the base entry on
/// collisions or dropped override-only entries.
#[test]
fn given_overlapping_sets_when_merged_then_overrides_win_and_extras_added() {
    // GIVEN: dependencies = {a: X}, local_dependencies = {a: Y, b: Z}
    let base = set_of(&[("a", "X")]);
    let overrides = set_of(&[("a", "Y"), ("b", "Z")]);

    // WHEN: Merging
    let merged = base.merged_with(&overrides);

    // THEN: {a: Y, b: Z}
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("a"), Some(&spec("Y")));
    assert_eq!(merged.get("b"), Some(&spec("Z")));

    // AND: The base is untouched
    assert_eq!(base.get("a"), Some(&spec("X")));
    assert!(!base.contains("b"));
}

#[test]
fn given_collision_when_merged_then_original_position_kept() {
    // GIVEN: Three entries, the middle one overridden
    let base = set_of(&[("model", "1"), ("workflow-forecast", "2"), ("toolset", "3")]);
    let overrides = set_of(&[("workflow-forecast", "9"), ("extra", "4")]);

    // WHEN: Merging
    let merged = base.merged_with(&overrides);

    // THEN: Insertion order of the base is kept, new names are appended
    let names: Vec<&str> = merged.names().collect();
    assert_eq!(names, vec!["model", "workflow-forecast", "toolset", "extra"]);
}

#[test]
fn given_existing_name_when_inserted_then_previous_spec_returned() {
    let mut set = set_of(&[("a", "1")]);

    let previous = set.insert("a", spec("2")).unwrap();

    assert_eq!(previous, Some(spec("1")));
    assert_eq!(set.len(), 1);
}

/// **VALUE**: Verifies that names which would escape the workspace root are rejected.
///
/// **BUG THIS CATCHES**: The installer deletes `<root>/<name>` recursively before
/// cloning. A name like `..` or `../other` would delete directories outside the
/// workspace.
#[test]
fn given_path_like_names_when_inserted_then_returns_validation_error() {
    let mut set = DependencySet::new();

    for bad in ["", " ", ".", "..", "../other", "a/b", "a\\b"] {
        let result = set.insert(bad, spec("x"));
        assert!(
            matches!(result, Err(ModelError::Validation { .. })),
            "Should reject name {bad:?}"
        );
    }
    assert!(set.is_empty());
}
