use forecast_env::error::ForecastEnvError;

use common::ErrorLocation;
use provision_core::error::CoreError;
use provision_core::error::request::RequestError;

use std::panic::Location;

#[test]
#[track_caller]
fn given_app_error_when_formatted_then_includes_message_and_location() {
    // GIVEN: An application-level error
    let err = ForecastEnvError::ForecastEnv {
        message: "Failed to create log file".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Formatting
    let text = err.to_string();

    // THEN: Kind, message and location
    assert!(text.starts_with("Forecast Env Error: Failed to create log file"));
    assert!(text.contains("error.rs"));
}

/// **VALUE**: Verifies core errors reach the user unchanged.
///
/// **BUG THIS CATCHES**: Would catch a wrapper prefix hiding the original
/// location, which is the only pointer to the failing phase.
#[test]
#[track_caller]
fn given_core_error_when_wrapped_then_display_is_transparent() {
    let core = CoreError::from(RequestError::Validation {
        message: "Request parameters must be a JSON object".to_string(),
        location: ErrorLocation::from(Location::caller()),
    });
    let expected = core.to_string();

    let err = ForecastEnvError::from(core);

    assert_eq!(err.to_string(), expected);
}
