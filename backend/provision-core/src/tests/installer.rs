use crate::error::provisioning::ProvisioningError;
use crate::installer::remove_existing;

use tempfile::TempDir;

/// **VALUE**: Verifies a previous install is deleted completely, nested content included.
///
/// **WHY THIS MATTERS**: The installer never trusts what is already on disk. A
/// stale file left from an earlier revision would leak into the forecast run.
#[test]
fn given_populated_directory_when_removed_then_nothing_remains() {
    // GIVEN: A dependency directory with nested content
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("model");
    std::fs::create_dir_all(target.join("requests/old")).unwrap();
    std::fs::write(target.join("requests/old/stale.json"), "[]").unwrap();

    // WHEN: Removing it
    remove_existing(&target).unwrap();

    // THEN: The directory is gone
    assert!(!target.exists());
}

#[test]
fn given_missing_directory_when_removed_then_succeeds() {
    // GIVEN: Nothing at the target path
    let temp = TempDir::new().unwrap();

    // WHEN/THEN: Removal is a no-op
    remove_existing(&temp.path().join("never-installed")).unwrap();
}

/// **VALUE**: Verifies only directories are ever deleted to make room for a clone.
///
/// **WHY THIS MATTERS**: A dependency directory sits directly in the workspace
/// root beside the run's own files. A file with that name is not a previous
/// install and belongs to someone else.
///
/// **BUG THIS CATCHES**: Would catch the installer unlinking a regular file that
/// shares a dependency's name.
#[test]
fn given_plain_file_at_target_when_removed_then_file_kept_and_error_returned() {
    // GIVEN: A regular file where the dependency directory would go
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("model");
    std::fs::write(&target, "not a directory").unwrap();

    // WHEN: Removing the target
    let result = remove_existing(&target);

    // THEN: Refused, naming the path; the file is untouched
    match result {
        Err(ProvisioningError::OccupiedTarget { path, .. }) => assert_eq!(path, target),
        other => panic!("Expected OccupiedTarget, got {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "not a directory");
}

/// **BUG THIS CATCHES**: Would catch `remove_existing` following a symlink and
/// deleting the directory it points to, or silently unlinking the link itself.
#[cfg(unix)]
#[test]
fn given_symlink_at_target_when_removed_then_link_and_target_survive() {
    // GIVEN: A link named like the dependency, pointing elsewhere
    let temp = TempDir::new().unwrap();
    let elsewhere = temp.path().join("elsewhere");
    std::fs::create_dir(&elsewhere).unwrap();
    std::fs::write(elsewhere.join("keep.txt"), "keep").unwrap();
    let target = temp.path().join("model");
    std::os::unix::fs::symlink(&elsewhere, &target).unwrap();

    // WHEN: Removing the target
    let result = remove_existing(&target);

    // THEN: Refused; the link and what it points to both remain
    assert!(matches!(result, Err(ProvisioningError::OccupiedTarget { .. })));
    assert!(std::fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
    assert!(elsewhere.join("keep.txt").exists());
}

#[cfg(unix)]
#[test]
fn given_undeletable_directory_when_removed_then_returns_remove_directory_error() {
    use std::os::unix::fs::PermissionsExt;

    // GIVEN: A directory whose parent is read-only
    let temp = TempDir::new().unwrap();
    let parent = temp.path().join("locked");
    let target = parent.join("model");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o555)).unwrap();

    // WHEN: Removing the target
    let result = remove_existing(&target);
    std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o755)).unwrap();

    // THEN: Running as root bypasses permissions; otherwise the error names the path
    match result {
        Ok(()) => {}
        Err(ProvisioningError::RemoveDirectory { path, .. }) => assert_eq!(path, target),
        Err(other) => panic!("Unexpected error: {other}"),
    }
}
