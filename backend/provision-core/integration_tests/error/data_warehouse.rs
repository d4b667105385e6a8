use provision_core::error::data_warehouse::DataWarehouseError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

#[test]
#[track_caller]
fn given_unclassified_failure_when_formatted_then_includes_status_and_body() {
    let err = DataWarehouseError::UnclassifiedFailure {
        status_code: HttpStatusCode(500),
        body: r#"{"error": "timeout"}"#.to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let text = err.to_string();

    assert!(text.starts_with("Unclassified Failure Error: HTTP 500"));
    assert!(text.contains("timeout"));
    assert!(text.contains("data_warehouse.rs"));
}

/// **VALUE**: Verifies `From<url::ParseError>` records where `?` was applied.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being removed from the
/// conversion, which makes every URL error point into the error module.
#[test]
fn given_url_parse_failure_when_converted_then_location_is_call_site() {
    // GIVEN: A failing parse converted with `?`
    fn parse() -> Result<url::Url, DataWarehouseError> {
        Ok(url::Url::parse("::not a url::")?)
    }

    // WHEN: Converting
    let err = parse().unwrap_err();

    // THEN: The location is this test file
    assert!(matches!(err, DataWarehouseError::UrlParse { .. }));
    assert!(err.to_string().contains("data_warehouse.rs"));
    assert!(!err.to_string().contains("src/error"));
}
