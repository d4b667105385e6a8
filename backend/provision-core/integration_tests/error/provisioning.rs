use provision_core::error::CoreError;
use provision_core::error::provisioning::ProvisioningError;

use common::ErrorLocation;

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;

/// **VALUE**: Verifies `ProvisioningError::Clone` carries file/line/column.
///
/// **WHY THIS MATTERS**: Clone failures surface from both the installer and the
/// git driver. The location tells which layer gave up.
///
/// **BUG THIS CATCHES**: Would catch the location being dropped from the
/// Display format string.
#[test]
#[track_caller]
fn given_clone_error_when_formatted_then_includes_name_and_location() {
    // GIVEN: A clone error with location
    let err = ProvisioningError::Clone {
        name: "model".to_string(),
        message: "git exited with exit status: 128: repository not found".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Formatting
    let text = err.to_string();

    // THEN: Kind, dependency, message and file location
    assert!(text.starts_with("Clone Error: model:"));
    assert!(text.contains("repository not found"));
    assert!(text.contains("provisioning.rs"));
}

#[test]
#[track_caller]
fn given_checkout_error_when_formatted_then_includes_revision() {
    let err = ProvisioningError::Checkout {
        name: "model".to_string(),
        revision: "4f2a9c1".to_string(),
        message: "pathspec did not match".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    assert!(err.to_string().contains("model at 4f2a9c1"));
}

#[test]
#[track_caller]
fn given_remove_error_when_wrapped_in_core_error_then_source_chain_preserved() {
    // GIVEN: An io error behind a provisioning error
    let err = ProvisioningError::RemoveDirectory {
        path: "model".into(),
        location: ErrorLocation::from(Location::caller()),
        source: IoError::new(ErrorKind::PermissionDenied, "read-only file system"),
    };

    // WHEN: Converting into the aggregate error
    let core: CoreError = err.into();

    // THEN: Display and source are both forwarded to the inner error
    assert!(core.to_string().starts_with("Remove Directory Error: model"));
    assert!(
        core.source()
            .is_some_and(|s| s.to_string() == "read-only file system")
    );
}
