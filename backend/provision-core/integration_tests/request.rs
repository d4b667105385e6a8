use provision_core::request::{
    default_output_path, load_request_batch, parse_params, snapshot_time, stamp_request_file,
};

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};
use tempfile::TempDir;

fn fixed_now() -> SystemTime {
    // 2024-03-01T12:00:00.250Z
    UNIX_EPOCH + Duration::from_millis(1_709_294_400_250)
}

#[test]
fn given_instant_when_formatting_snapshot_time_then_millis_with_z_suffix() {
    assert_eq!(snapshot_time(fixed_now()), "2024-03-01T12:00:00.250Z");
}

#[test]
fn given_input_path_when_defaulting_output_then_prefixed_sibling() {
    assert_eq!(
        default_output_path(Path::new("requests/input-data-request.json")),
        Path::new("requests/adjusted-input-data-request.json")
    );
}

#[test]
fn given_non_object_params_when_parsed_then_rejected() {
    assert!(parse_params("[1, 2]").is_err());
    assert!(parse_params("{not json").is_err());
    assert_eq!(parse_params("{}").unwrap().len(), 0);
}

#[test]
fn given_settings_document_when_loaded_then_items_come_from_json_request() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("request.json");
    std::fs::write(
        &path,
        json!({"source": "dw", "json_request": [{"key": "a"}, {"key": "b"}]}).to_string(),
    )
    .unwrap();

    let batch = load_request_batch(&path).unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.items()[1]["key"], "b");
}

#[test]
fn given_missing_file_when_loaded_then_returns_read_error() {
    let temp = TempDir::new().unwrap();

    let err = load_request_batch(&temp.path().join("absent.json")).unwrap_err();

    assert!(err.to_string().contains("absent.json"));
}

/// **VALUE**: Verifies a workflow step's request file is prepared as expected.
///
/// **WHY THIS MATTERS**: Judgment steps reuse the same request with a vintage
/// parameter; blank snapshot times mean "as of now" and must be filled, while
/// explicit ones must be kept for reproducibility.
///
/// **BUG THIS CATCHES**: Would catch explicit snapshot times being overwritten,
/// the settings wrapper being flattened to a bare array, or item order changing.
#[test]
fn given_document_and_params_when_stamped_then_params_applied_and_blanks_filled() {
    // GIVEN: A settings document with blank and explicit snapshot times
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("request.json");
    let output = temp.path().join("adjusted-request.json");
    std::fs::write(
        &input,
        json!({
            "source": "dw",
            "json_request": [
                {"key": "gdp", "snapshot_time": ""},
                {"key": "cpi", "snapshot_time": "2023-12-31T00:00:00.000Z"},
                {"key": "rate", "snapshot_time": null}
            ]
        })
        .to_string(),
    )
    .unwrap();
    let params = parse_params(r#"{"vintage": "2024Q1"}"#).unwrap();

    // WHEN: Stamping
    stamp_request_file(&input, &output, &params, fixed_now()).unwrap();

    // THEN: Params on every item, blanks filled, explicit value kept, shape kept
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({
            "source": "dw",
            "json_request": [
                {"key": "gdp", "snapshot_time": "2024-03-01T12:00:00.250Z", "vintage": "2024Q1"},
                {"key": "cpi", "snapshot_time": "2023-12-31T00:00:00.000Z", "vintage": "2024Q1"},
                {"key": "rate", "snapshot_time": "2024-03-01T12:00:00.250Z", "vintage": "2024Q1"}
            ]
        })
    );
}

#[test]
fn given_array_document_when_stamped_then_written_with_two_space_indent() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("request.json");
    let output = temp.path().join("out.json");
    std::fs::write(&input, r#"[{"key": "gdp"}]"#).unwrap();

    stamp_request_file(&input, &output, &serde_json::Map::new(), fixed_now()).unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "[\n  {\n    \"key\": \"gdp\"\n  }\n]"
    );
}
