use crate::RedactedSecret;

/// **VALUE**: Verifies that neither Debug nor Display leak the secret.
///
/// **WHY THIS MATTERS**: The data-warehouse password and the bearer token travel
/// through structs that get logged with `{:?}`. A leaking Debug impl would write
/// credentials into the run log that is archived with the forecast artifacts.
///
/// **BUG THIS CATCHES**: Would catch if someone replaces the manual Debug impl
/// with `#[derive(Debug)]`.
#[test]
fn given_secret_when_formatted_then_value_is_redacted() {
    // GIVEN: A secret
    let secret = RedactedSecret::new("t0p-s3cret");

    // WHEN: Formatting with Debug and Display
    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    // THEN: Neither contains the value
    assert!(!debug.contains("t0p-s3cret"));
    assert!(!display.contains("t0p-s3cret"));
    assert!(display.contains("REDACTED"));
}

/// **VALUE**: Verifies that secrets refuse to serialize.
///
/// **BUG THIS CATCHES**: Would catch a `#[derive(Serialize)]` slipping onto a config
/// struct that holds the password and then being dumped to JSON.
#[test]
fn given_secret_when_serialized_then_returns_error() {
    // GIVEN: A secret
    let secret = RedactedSecret::new("t0p-s3cret");

    // WHEN: Serializing
    let result = serde_json::to_string(&secret);

    // THEN: Serialization fails without echoing the value
    let err = result.unwrap_err().to_string();
    assert!(err.contains("cannot be serialized"));
    assert!(!err.contains("t0p-s3cret"));
}

#[test]
fn given_text_containing_secret_when_scrubbed_then_occurrences_replaced() {
    // GIVEN: git stderr echoing a credential-bearing URL
    let secret = RedactedSecret::new("ghp_abc123");
    let stderr = "fatal: unable to access 'https://ghp_abc123@github.com/org/repo.git/'";

    // WHEN: Scrubbing
    let scrubbed = secret.scrub(stderr);

    // THEN: The token is gone, the rest survives
    assert!(!scrubbed.contains("ghp_abc123"));
    assert!(scrubbed.contains("https://[REDACTED]@github.com/org/repo.git/"));
}

#[test]
fn given_empty_secret_when_scrubbed_then_text_unchanged() {
    let secret = RedactedSecret::new("");

    assert!(secret.is_empty());
    assert_eq!(secret.scrub("unchanged"), "unchanged");
}

#[test]
fn given_secret_when_exposed_then_returns_original_value() {
    let secret = RedactedSecret::new("abc");

    assert_eq!(secret.expose(), "abc");
    assert_eq!(secret.len(), 3);
}

#[test]
fn given_json_string_when_deserialized_then_wraps_value() {
    let secret: RedactedSecret = serde_json::from_str(r#""from-config""#).unwrap();

    assert_eq!(secret.expose(), "from-config");
}
