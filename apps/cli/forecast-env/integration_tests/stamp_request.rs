use forecast_env::cli::StampRequestArgs;
use forecast_env::commands::stamp_request::stamp;

use serde_json::{Value, json};
use tempfile::TempDir;

/// **VALUE**: Verifies the stamp-request command end to end with default output.
///
/// **WHY THIS MATTERS**: Judgment steps call this before each retrieval; the
/// adjusted file next to the input is what the next step reads.
#[test]
fn given_request_and_params_when_stamped_then_adjusted_file_next_to_input() {
    // GIVEN: A bare-array request with a blank snapshot time
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input-data-request.json");
    std::fs::write(&input, json!([{"key": "gdp", "snapshot_time": ""}]).to_string()).unwrap();
    let args = StampRequestArgs {
        config_path: input.clone(),
        output_file: None,
        params_json: r#"{"vintage": "2024Q1"}"#.to_string(),
    };

    // WHEN: Running the command
    let output = stamp(&args).unwrap();

    // THEN: adjusted-<name>, params applied, snapshot time filled
    assert_eq!(output, temp.path().join("adjusted-input-data-request.json"));
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let item = &written[0];
    assert_eq!(item["vintage"], "2024Q1");
    let snapshot = item["snapshot_time"].as_str().unwrap();
    assert!(snapshot.ends_with('Z'), "{snapshot}");
    assert_eq!(snapshot.len(), "2024-03-01T12:00:00.000Z".len());

    // AND: The input is untouched
    assert_eq!(
        std::fs::read_to_string(&input).unwrap(),
        json!([{"key": "gdp", "snapshot_time": ""}]).to_string()
    );
}

#[test]
fn given_array_params_when_stamped_then_error_and_no_output() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("request.json");
    std::fs::write(&input, "[]").unwrap();
    let output = temp.path().join("out.json");
    let args = StampRequestArgs {
        config_path: input,
        output_file: Some(output.clone()),
        params_json: "[1]".to_string(),
    };

    let result = stamp(&args);

    assert!(result.is_err());
    assert!(!output.exists());
}
