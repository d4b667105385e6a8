use provision_core::error::CoreError;
use provision_core::error::data_warehouse::DataWarehouseError;
use provision_core::output::{BAD_REQUEST_HINT, OUTPUT_INDENT, persist_outcome, write_json};

use common::HttpStatusCode;
use models::RetrievalResult;

use serde_json::json;
use tempfile::TempDir;

#[test]
fn given_success_when_persisted_then_four_space_pretty_json_written() {
    // GIVEN: A successful retrieval
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("input-data.json");
    let outcome = RetrievalResult::Success(json!({"series": [{"key": "gdp", "values": [1.5]}]}));

    // WHEN: Persisting
    let written = persist_outcome(outcome, &output, &mut Vec::new()).unwrap();

    // THEN: Indented with four spaces
    assert_eq!(written, output);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "{\n    \"series\": [\n        {\n            \"key\": \"gdp\",\n            \"values\": [\n                1.5\n            ]\n        }\n    ]\n}"
    );
    assert!(!temp.path().join("input-data.json.tmp").exists());
}

/// **VALUE**: Verifies the persisted artifact carries warehouse numbers digit for digit.
///
/// **BUG THIS CATCHES**: Would catch the payload passing through `f64` between the
/// response body and `input-data.json`, silently rounding large identifiers.
#[test]
fn given_payload_with_wide_numbers_when_persisted_then_digits_survive_to_disk() {
    // GIVEN: A 200 body with a 23-digit integer and a trailing-zero decimal
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("input-data.json");
    let body = r#"{"id":12345678901234567890123,"value":0.10}"#;
    let outcome = RetrievalResult::classify(HttpStatusCode(200), body.to_string()).unwrap();

    // WHEN: Persisting
    persist_outcome(outcome, &output, &mut Vec::new()).unwrap();

    // THEN: Both numbers are written exactly as received
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "{\n    \"id\": 12345678901234567890123,\n    \"value\": 0.10\n}"
    );
}

/// **VALUE**: Verifies a rejected request never touches an existing artifact.
///
/// **BUG THIS CATCHES**: Would catch the writer truncating `input-data.json`
/// before knowing the outcome, leaving last round's data half-overwritten.
#[test]
fn given_bad_request_when_persisted_then_existing_artifact_untouched() {
    // GIVEN: An artifact from a previous run
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("input-data.json");
    std::fs::write(&output, "previous").unwrap();

    // WHEN: Persisting a 400
    let err = persist_outcome(
        RetrievalResult::BadRequest("unknown key".to_string()),
        &output,
        &mut Vec::new(),
    )
    .unwrap_err();

    // THEN: BadRequest carrying the hint and body; old artifact intact
    match err {
        CoreError::DataWarehouse(DataWarehouseError::BadRequest { message, body, .. }) => {
            assert_eq!(message, BAD_REQUEST_HINT);
            assert_eq!(body, "unknown key");
        }
        other => panic!("Expected BadRequest, got {other}"),
    }
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn given_other_failure_when_persisted_then_body_goes_to_sink() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("input-data.json");
    let mut sink = Vec::new();

    let err = persist_outcome(
        RetrievalResult::OtherFailure {
            status: HttpStatusCode(503),
            body: "maintenance".to_string(),
        },
        &output,
        &mut sink,
    )
    .unwrap_err();

    assert_eq!(String::from_utf8(sink).unwrap(), "maintenance\n");
    assert!(err.to_string().contains("503"));
    assert!(!output.exists());
}

#[test]
fn given_missing_parent_directory_when_writing_then_returns_write_error() {
    let temp = TempDir::new().unwrap();

    let result = write_json(&temp.path().join("no/such/dir/out.json"), &json!({}), OUTPUT_INDENT);

    assert!(result.is_err());
}
