use provision_core::config::data_warehouse::{BASE_URL_ENV, PASSWORD_ENV, USERNAME_ENV};
use provision_core::config::{DataWarehouseSection, DataWarehouseSettings, RunConfig};
use provision_core::error::config::ConfigError;

use common::RedactedSecret;
use models::DependencySpec;

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

fn parse(value: serde_json::Value) -> Result<RunConfig, ConfigError> {
    RunConfig::parse(&value.to_string(), Path::new("config.json"))
}

/// **VALUE**: Verifies a config exactly as the CI step writes it loads cleanly.
///
/// **WHY THIS MATTERS**: The generating script writes `"end": null` sentinels and
/// the legacy `local-dependencies` spelling. Rejecting either would stop every
/// forecast round before it starts.
///
/// **BUG THIS CATCHES**: Would catch the sentinel being treated as a dependency
/// named `end`, or the alias being dropped from the file shape.
#[test]
fn given_ci_generated_config_when_parsed_then_sentinels_skipped_and_alias_accepted() {
    // GIVEN: A config with null sentinels and the hyphenated key
    let value = json!({
        "dependencies": {
            "model": {"url": "https://github.com/OGR-EIU/model.git", "commitish": "4f2a9c1"},
            "workflow-forecast": {"url": "https://github.com/OGR-EIU/workflow-forecast.git", "commitish": "v1.2.0"},
            "end": null
        },
        "local-dependencies": {
            "workflow-forecast": {"url": "https://github.com/OGR-EIU/workflow-forecast.git", "branch": "analyst"},
            "end": null
        },
        "timestamp": "2024-03-01T12:00:00Z"
    });

    // WHEN: Parsing
    let config = parse(value).unwrap();

    // THEN: Only real entries are present, in file order
    let names: Vec<&str> = config.dependencies.names().collect();
    assert_eq!(names, vec!["model", "workflow-forecast"]);
    assert_eq!(config.local_dependencies.len(), 1);
    assert_eq!(
        config.local_dependencies.get("workflow-forecast"),
        Some(&DependencySpec::branch_pinned(
            "https://github.com/OGR-EIU/workflow-forecast.git",
            "analyst"
        ))
    );

    // AND: Defaults fill the optional sections
    assert_eq!(config.request_path, PathBuf::from("model/requests/input-data-request.json"));
    assert_eq!(config.output_path, PathBuf::from("input-data.json"));
    assert_eq!(config.environment.dependency, "workflow-forecast");
    assert_eq!(
        config.environment.files,
        vec!["startup.m", "run_forecast.m", "apply_new_judgment.m"]
    );
}

/// **VALUE**: Verifies local mode is a right-biased union and CI mode ignores overrides.
#[test]
fn given_overrides_when_resolving_then_local_mode_applies_them() {
    // GIVEN: dependencies = {a: X}, local_dependencies = {a: Y, b: Z}
    let config = parse(json!({
        "dependencies": {"a": {"url": "https://example.com/a.git", "commitish": "X"}},
        "local_dependencies": {
            "a": {"url": "https://example.com/a.git", "branch": "Y"},
            "b": {"url": "https://example.com/b.git", "commitish": "Z"}
        },
        "timestamp": "2024-03-01T12:00:00Z"
    }))
    .unwrap();

    // WHEN: Resolving in both modes
    let local = config.resolved_dependencies(true);
    let ci = config.resolved_dependencies(false);

    // THEN: local = {a: Y, b: Z}; ci = {a: X}
    assert_eq!(local.len(), 2);
    assert_eq!(
        local.get("a"),
        Some(&DependencySpec::branch_pinned("https://example.com/a.git", "Y"))
    );
    assert_eq!(
        local.get("b"),
        Some(&DependencySpec::commit_pinned("https://example.com/b.git", "Z"))
    );
    assert_eq!(ci.len(), 1);
    assert_eq!(
        ci.get("a"),
        Some(&DependencySpec::commit_pinned("https://example.com/a.git", "X"))
    );
}

/// **VALUE**: Verifies the overlapping `branch`/`commitish` case is rejected up front.
///
/// **BUG THIS CATCHES**: Would catch the loader silently preferring one field,
/// which pins the run to a revision nobody asked for.
#[test]
fn given_branch_and_commitish_when_parsed_then_returns_validation_error() {
    let result = parse(json!({
        "dependencies": {"model": {"url": "https://example.com/m.git", "branch": "main", "commitish": "abc"}},
        "timestamp": "2024-03-01T12:00:00Z"
    }));

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }), "got {err}");
    assert!(err.to_string().contains("both"));
}

#[test]
fn given_neither_revision_when_parsed_then_returns_validation_error() {
    let result = parse(json!({
        "dependencies": {"model": {"url": "https://example.com/m.git", "branch": null, "commitish": ""}},
        "timestamp": "2024-03-01T12:00:00Z"
    }));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_bad_timestamp_when_parsed_then_returns_validation_error() {
    let result = parse(json!({"dependencies": {}, "timestamp": "yesterday"}));

    let err = result.unwrap_err();
    assert!(err.to_string().contains("yesterday"));
}

/// **VALUE**: Verifies every ISO-8601 shape the CI step may stamp is accepted
/// and carried through untouched.
///
/// **WHY THIS MATTERS**: The timestamp is written by tooling outside this
/// workspace, sometimes in local time with an offset or as a bare date. It is
/// forwarded verbatim in every data request.
///
/// **BUG THIS CATCHES**: Would catch validation that only understands UTC `Z`
/// timestamps, which rejected `+01:00` offsets and stopped the run.
#[test]
fn given_offset_and_date_only_timestamps_when_parsed_then_accepted_verbatim() {
    for timestamp in [
        "2024-03-01T12:00:00Z",
        "2024-03-01T12:00:00+01:00",
        "2024-03-01T07:00:00.250-05:00",
        "2024-03-01T12:00:00",
        "2024-03-01",
    ] {
        // GIVEN: A config stamped in this shape
        let value = json!({"dependencies": {}, "timestamp": timestamp});

        // WHEN: Parsed
        let config = parse(value).unwrap_or_else(|e| panic!("{timestamp} rejected: {e}"));

        // THEN: The stamp is kept as written
        assert_eq!(config.timestamp, timestamp);
    }
}

#[test]
fn given_impossible_calendar_date_when_parsed_then_returns_validation_error() {
    let result = parse(json!({"dependencies": {}, "timestamp": "2024-13-01T12:00:00+01:00"}));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

/// **VALUE**: Verifies a dependency cannot be named after a file the pipeline
/// owns in the workspace root.
///
/// **WHY THIS MATTERS**: Installing a dependency first removes `<root>/<name>`.
/// A dependency called `config.json` or `.env` would clash with the run's own
/// configuration and credentials.
///
/// **BUG THIS CATCHES**: Would catch the reserved-name check missing one of the
/// workspace files or skipping the local override table.
#[test]
fn given_dependency_named_after_workspace_file_when_parsed_then_rejected() {
    for (table, name) in [
        ("dependencies", "config.json"),
        ("dependencies", ".env"),
        ("dependencies", "input-data.json"),
        ("local_dependencies", "startup.m"),
    ] {
        // GIVEN: A dependency whose directory would land on a workspace file
        let value = json!({
            table: {name: {"url": "https://example.com/m.git", "branch": "main"}},
            "timestamp": "2024-03-01T12:00:00Z"
        });

        // WHEN: Parsed
        let result = parse(value);

        // THEN: Validation names the offending dependency
        let err = result.expect_err(name);
        assert!(matches!(err, ConfigError::ValidationError { .. }));
        assert!(err.to_string().contains(name));
    }
}

#[test]
fn given_missing_timestamp_when_parsed_then_returns_parse_error() {
    let result = parse(json!({"dependencies": {}}));

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **BUG THIS CATCHES**: Would catch a dependency name like `..` reaching the
/// installer, which deletes `<root>/<name>` recursively.
#[test]
fn given_escaping_dependency_name_when_parsed_then_rejected() {
    let result = parse(json!({
        "dependencies": {"..": {"url": "https://example.com/m.git", "branch": "main"}},
        "timestamp": "2024-03-01T12:00:00Z"
    }));

    assert!(result.is_err());
}

#[test]
fn given_absolute_output_path_when_parsed_then_rejected() {
    let result = parse(json!({
        "timestamp": "2024-03-01T12:00:00Z",
        "output_path": "/etc/input-data.json"
    }));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_invalid_private_pattern_when_parsed_then_rejected() {
    let result = parse(json!({
        "timestamp": "2024-03-01T12:00:00Z",
        "private_url_pattern": "^https://(unclosed"
    }));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

/// **VALUE**: Verifies the config is read from the given root, not the working directory.
#[test]
fn given_root_without_config_when_loaded_then_returns_read_error() {
    // GIVEN: An empty root
    let temp = TempDir::new().unwrap();

    // WHEN: Loading
    let result = RunConfig::load(temp.path());

    // THEN: The error names the expected path
    match result {
        Err(ConfigError::ReadError { path, .. }) => {
            assert_eq!(path, temp.path().join("config.json"));
        }
        other => panic!("Expected ReadError, got {other:?}"),
    }
}

#[test]
fn given_malformed_file_when_loaded_then_returns_parse_error() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.json"), "{ not json").unwrap();

    let result = RunConfig::load(temp.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

// ===== DATA WAREHOUSE SETTINGS =====

fn section() -> DataWarehouseSection {
    DataWarehouseSection {
        base_url: Some("https://dw.example.com/api".to_string()),
        username: Some("analyst".to_string()),
        password: Some(RedactedSecret::new("from-config")),
    }
}

#[test]
fn given_complete_section_and_empty_environment_when_resolved_then_uses_section() {
    let settings = DataWarehouseSettings::resolve(&section(), |_| None).unwrap();

    assert_eq!(settings.base_url, "https://dw.example.com/api");
    assert_eq!(settings.username, "analyst");
    assert_eq!(settings.password.expose(), "from-config");
}

/// **VALUE**: Verifies environment variables override the config file.
///
/// **WHY THIS MATTERS**: CI injects the real password as a secret variable; the
/// committed config must never need to hold it.
#[test]
fn given_environment_values_when_resolved_then_environment_wins() {
    // GIVEN: Every variable set, plus a blank one that must be ignored
    let lookup = |key: &str| match key {
        BASE_URL_ENV => Some("http://localhost:9000".to_string()),
        USERNAME_ENV => Some("   ".to_string()),
        PASSWORD_ENV => Some("from-env".to_string()),
        _ => None,
    };

    // WHEN: Resolving
    let settings = DataWarehouseSettings::resolve(&section(), lookup).unwrap();

    // THEN: Non-blank environment values win
    assert_eq!(settings.base_url, "http://localhost:9000");
    assert_eq!(settings.username, "analyst");
    assert_eq!(settings.password.expose(), "from-env");
}

#[test]
fn given_no_password_anywhere_when_resolved_then_error_names_variable() {
    let mut incomplete = section();
    incomplete.password = None;

    let err = DataWarehouseSettings::resolve(&incomplete, |_| None).unwrap_err();

    assert!(err.to_string().contains(PASSWORD_ENV));
}

#[test]
fn given_non_http_url_when_resolved_then_rejected() {
    let mut bad = section();
    bad.base_url = Some("ftp://dw.example.com".to_string());

    assert!(DataWarehouseSettings::resolve(&bad, |_| None).is_err());
}

#[test]
fn given_settings_when_debug_printed_then_password_hidden() {
    let settings = DataWarehouseSettings::resolve(&section(), |_| None).unwrap();

    let debug = format!("{settings:?} {:?}", section());

    assert!(!debug.contains("from-config"));
}
