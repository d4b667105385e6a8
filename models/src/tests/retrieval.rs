use crate::{ModelError, RetrievalResult};

use common::HttpStatusCode;

use serde_json::json;

/// **VALUE**: Covers the three branches of response classification.
///
/// **WHY THIS MATTERS**: This is the only branching on remote behavior in the whole
/// pipeline. A 400 must be told apart from other failures because it is the one the
/// analyst can fix (wrong series keys).
#[test]
fn given_status_codes_when_classified_then_maps_to_expected_variant() {
    // GIVEN/WHEN: 200, 400 and 500 responses
    let ok = RetrievalResult::classify(HttpStatusCode(200), r#"{"series": []}"#.into()).unwrap();
    let bad = RetrievalResult::classify(HttpStatusCode(400), "unknown key".into()).unwrap();
    let other =
        RetrievalResult::classify(HttpStatusCode(500), r#"{"error": "timeout"}"#.into()).unwrap();

    // THEN: Each maps to its variant
    assert_eq!(ok, RetrievalResult::Success(json!({"series": []})));
    assert_eq!(bad, RetrievalResult::BadRequest("unknown key".into()));
    assert_eq!(
        other,
        RetrievalResult::OtherFailure {
            status: HttpStatusCode(500),
            body: r#"{"error": "timeout"}"#.into(),
        }
    );
    assert!(ok.is_success());
    assert!(!bad.is_success());
}

/// **BUG THIS CATCHES**: Would catch treating any 2xx as success. The warehouse
/// contract only promises a payload on 200.
#[test]
fn given_non_200_success_code_when_classified_then_other_failure() {
    let result = RetrievalResult::classify(HttpStatusCode(204), String::new()).unwrap();

    assert!(matches!(result, RetrievalResult::OtherFailure { status, .. } if status.0 == 204));
}

#[test]
fn given_200_with_invalid_json_when_classified_then_returns_validation_error() {
    let result = RetrievalResult::classify(HttpStatusCode(200), "<html>".into());

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

/// **VALUE**: Verifies numeric values in a successful payload keep the exact text
/// the warehouse sent.
///
/// **WHY THIS MATTERS**: The payload is persisted as the forecast input. Series
/// identifiers and observations can exceed 64-bit range or carry trailing
/// decimal zeros that downstream readers compare as written.
///
/// **BUG THIS CATCHES**: Would catch large integers being rounded through `f64`,
/// or `1.10` and `1e2` being rewritten as `1.1` and `100.0`.
#[test]
fn given_large_and_formatted_numbers_when_classified_then_digits_preserved() {
    // GIVEN: A payload with numbers outside f64 precision and non-canonical forms
    let body = r#"{"series":[{"v":12345678901234567890123,"w":1.10,"x":1e2}]}"#;

    // WHEN: Classified and serialized again
    let result = RetrievalResult::classify(HttpStatusCode(200), body.into()).unwrap();
    let RetrievalResult::Success(payload) = result else {
        panic!("expected success, got {result:?}");
    };

    // THEN: The text is unchanged
    assert_eq!(serde_json::to_string(&payload).unwrap(), body);
}
