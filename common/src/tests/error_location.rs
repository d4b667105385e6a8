use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error in the workspace carries an ErrorLocation. If it
/// records the wrong position, a failed clone or a rejected data request points at
/// the wrong code and the log line loses its debugging value.
///
/// **BUG THIS CATCHES**: Would catch if file path extraction or line/column capture
/// breaks.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: An ErrorLocation built on a known line
    let (location, expected_line) = (ErrorLocation::from(Location::caller()), line!());

    // THEN: Should capture file, line, and column
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line, expected_line, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the `[file:line:column]` Display format appended to every error.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{location}");

    // THEN: Should produce "[file:line:column]"
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert_eq!(formatted.matches(':').count(), 2, "Should have two separators");
    assert!(formatted.contains(&location.line.to_string()));
}

#[test]
fn given_error_location_when_serialized_then_exposes_fields() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Serializing to JSON
    let json = serde_json::to_value(location).unwrap();

    // THEN: Fields are present by name
    assert_eq!(json["line"], location.line);
    assert_eq!(json["column"], location.column);
    assert!(json["file"].as_str().unwrap().contains("error_location.rs"));
}
