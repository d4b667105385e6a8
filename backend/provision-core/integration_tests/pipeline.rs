use crate::support::log_capture::{self, messages_at};
use crate::support::{FakeVcs, VcsCall, write_config};

use provision_core::config::data_warehouse::{PASSWORD_ENV, USERNAME_ENV};
use provision_core::error::CoreError;
use provision_core::error::assembly::AssemblyError;
use provision_core::error::data_warehouse::DataWarehouseError;
use provision_core::pipeline::{PipelineOptions, install_dependencies, run};
use provision_core::vcs::CloneStrategy;

use common::RedactedSecret;

use log::Level;

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMESTAMP: &str = "2024-03-01T12:00:00Z";

fn lookup(key: &str) -> Option<String> {
    match key {
        USERNAME_ENV => Some("analyst".to_string()),
        PASSWORD_ENV => Some("s3cret".to_string()),
        _ => None,
    }
}

/// Clones of `model` and `workflow-forecast` carrying what the run needs.
fn forecast_vcs() -> FakeVcs {
    FakeVcs::new()
        .with_file(
            "model",
            "requests/input-data-request.json",
            r#"[{"key": "gdp"}, {"key": "cpi"}]"#,
        )
        .with_file("workflow-forecast", "environment/startup.m", "startup")
        .with_file("workflow-forecast", "environment/run_forecast.m", "run")
        .with_file("workflow-forecast", "environment/apply_new_judgment.m", "judge")
}

/// Assert `expected` appear among `messages` in this order.
fn assert_in_order(messages: &[String], expected: &[&str]) {
    let mut remaining = messages.iter();
    for line in expected {
        assert!(
            remaining.any(|message| message == line),
            "missing or out of order: {line:?} in {messages:#?}"
        );
    }
}

fn write_run_config(root: &Path, server: &MockServer) {
    write_config(
        root,
        &json!({
            "dependencies": {
                "model": {"url": "https://github.com/OGR-EIU/model.git", "commitish": "4f2a9c1"},
                "workflow-forecast": {"url": "https://github.com/OGR-EIU/workflow-forecast.git", "commitish": "v1.2.0"},
                "end": null
            },
            "local-dependencies": {
                "workflow-forecast": {"url": "https://github.com/OGR-EIU/workflow-forecast.git", "branch": "analyst"},
                "end": null
            },
            "timestamp": TIMESTAMP,
            "data_warehouse": {"base_url": server.uri()}
        }),
    );
}

async fn mount_authenticate(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id_token": "T"})))
        .mount(server)
        .await;
}

/// **VALUE**: Verifies the whole run: config → install → assemble → retrieve → write.
///
/// **WHY THIS MATTERS**: This is what CI executes before every forecast round.
///
/// **BUG THIS CATCHES**: Would catch phases running out of order (e.g. assembling
/// before the workflow is cloned), local overrides not applied, the request
/// batch read from the wrong place, or an output that is not exactly the
/// pretty-printed payload. Also catches the progress lines CI operators follow
/// going missing or being reordered.
#[tokio::test]
async fn given_complete_workspace_when_run_then_output_written_and_environment_assembled() {
    // GIVEN: A config, a fake forge and a warehouse expecting the stamped batch
    log_capture::capture();
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_run_config(temp.path(), &server);
    mount_authenticate(&server).await;
    Mock::given(method("POST"))
        .and(path("/data-requests/series/retrieve"))
        .and(header("Authorization", "Bearer T"))
        .and(body_json(json!([
            {"key": "gdp", "snapshot_time": TIMESTAMP},
            {"key": "cpi", "snapshot_time": TIMESTAMP}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"series": []})))
        .expect(1)
        .mount(&server)
        .await;
    let vcs = forecast_vcs();
    let options = PipelineOptions::new(temp.path());

    // WHEN: Running in local mode
    let written = run(vcs.clone(), &options, lookup, &mut Vec::new())
        .await
        .unwrap();

    // THEN: Output is exactly the pretty-printed payload
    assert_eq!(written, temp.path().join("input-data.json"));
    assert_eq!(
        std::fs::read_to_string(&written).unwrap(),
        "{\n    \"series\": []\n}"
    );

    // AND: The environment sits at the root
    assert_eq!(std::fs::read_to_string(temp.path().join("startup.m")).unwrap(), "startup");
    assert!(temp.path().join("apply_new_judgment.m").exists());

    // AND: The local override replaced the pinned workflow commit
    assert_eq!(
        vcs.calls()[2],
        VcsCall::Clone {
            name: "workflow-forecast".to_string(),
            url: "https://github.com/OGR-EIU/workflow-forecast.git".to_string(),
            destination: temp.path().join("workflow-forecast"),
            strategy: CloneStrategy::ShallowBranch {
                branch: "analyst".to_string()
            },
        }
    );
    assert_eq!(vcs.checkouts().len(), 1);

    // AND: Progress is reported phase by phase
    assert_in_order(
        &messages_at(Level::Info),
        &[
            "Cloning model at 4f2a9c1",
            "Checking out 4f2a9c1 in model",
            "Cloning workflow-forecast at analyst",
            "Copying environment files",
            "Requesting forecast input data",
            "Successfully retrieved forecast input data",
        ],
    );
    assert!(messages_at(Level::Error).is_empty());

    // AND: The warehouse password never reaches a log line
    assert!(
        log_capture::records()
            .iter()
            .all(|(_, message)| !message.contains("s3cret"))
    );
}

/// **VALUE**: Verifies a rejected data request is reported on the log as well as
/// returned.
///
/// **WHY THIS MATTERS**: In CI the log is all the analyst sees. The hint about
/// the requested keys is the actionable part of a 400.
///
/// **BUG THIS CATCHES**: Would catch the hint being dropped from the log, logged
/// below error level, or a partial artifact being left behind.
#[tokio::test]
async fn given_400_when_run_then_no_output_and_bad_request_error() {
    // GIVEN: A warehouse that rejects the keys
    log_capture::capture();
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_run_config(temp.path(), &server);
    mount_authenticate(&server).await;
    Mock::given(method("POST"))
        .and(path("/data-requests/series/retrieve"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unknown key"))
        .mount(&server)
        .await;

    // WHEN: Running
    let result = run(
        forecast_vcs(),
        &PipelineOptions::new(temp.path()),
        lookup,
        &mut Vec::new(),
    )
    .await;

    // THEN: Failure mentioning the requested keys, no artifact
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        CoreError::DataWarehouse(DataWarehouseError::BadRequest { .. })
    ));
    assert!(err.to_string().contains("requested keys"));
    assert!(!temp.path().join("input-data.json").exists());

    // AND: The hint is logged at error level, success is not
    let errors = messages_at(Level::Error);
    assert!(
        errors.iter().any(|message| message.contains("requested keys")),
        "no error log about requested keys in {errors:#?}"
    );
    assert!(
        !messages_at(Level::Info)
            .iter()
            .any(|message| message.starts_with("Successfully retrieved"))
    );
}

/// **VALUE**: Verifies an unclassified failure surfaces the body on the error channel.
#[tokio::test]
async fn given_500_when_run_then_body_surfaced_and_no_output() {
    // GIVEN: A warehouse timing out internally
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_run_config(temp.path(), &server);
    mount_authenticate(&server).await;
    Mock::given(method("POST"))
        .and(path("/data-requests/series/retrieve"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error": "timeout"}"#))
        .mount(&server)
        .await;
    let mut sink = Vec::new();

    // WHEN: Running
    let result = run(forecast_vcs(), &PipelineOptions::new(temp.path()), lookup, &mut sink).await;

    // THEN: Body on the sink, failure reported, nothing written
    assert!(result.is_err());
    assert_eq!(String::from_utf8(sink).unwrap(), "{\"error\": \"timeout\"}\n");
    assert!(!temp.path().join("input-data.json").exists());
}

#[tokio::test]
async fn given_missing_environment_file_when_run_then_assembly_error_before_any_request() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_run_config(temp.path(), &server);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let vcs = FakeVcs::new().with_file("workflow-forecast", "environment/startup.m", "startup");

    let result = run(vcs, &PipelineOptions::new(temp.path()), lookup, &mut Vec::new()).await;

    assert!(matches!(
        result,
        Err(CoreError::Assembly(AssemblyError::MissingSource { .. }))
    ));
}

/// **VALUE**: Verifies missing warehouse credentials fail before anything is cloned.
#[tokio::test]
async fn given_no_password_when_run_then_config_error_and_nothing_installed() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_run_config(temp.path(), &server);
    let vcs = forecast_vcs();

    let result = run(vcs.clone(), &PipelineOptions::new(temp.path()), |_| None, &mut Vec::new()).await;

    assert!(matches!(result, Err(CoreError::Config(_))));
    assert!(vcs.calls().is_empty());
}

#[tokio::test]
async fn given_ci_mode_and_token_when_installing_then_pinned_commits_with_tokenized_urls() {
    // GIVEN: CI mode with a clone token
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_run_config(temp.path(), &server);
    let vcs = FakeVcs::new();
    let options = PipelineOptions::new(temp.path())
        .with_local(false)
        .with_token(Some(RedactedSecret::new("ghp_ci")));

    // WHEN: Installing only
    let installed = install_dependencies(vcs.clone(), &options).await.unwrap();

    // THEN: Both dependencies commit-pinned, both URLs tokenized
    assert_eq!(installed.len(), 2);
    assert_eq!(vcs.checkouts().len(), 2);
    assert_eq!(
        vcs.cloned_urls(),
        vec![
            "https://ghp_ci@github.com/OGR-EIU/model.git",
            "https://ghp_ci@github.com/OGR-EIU/workflow-forecast.git",
        ]
    );
    assert!(!temp.path().join("input-data.json").exists());
}
