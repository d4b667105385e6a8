use provision_core::config::DataWarehouseSettings;
use provision_core::data_warehouse::DataWarehouseClient;
use provision_core::error::data_warehouse::DataWarehouseError;

use common::{HttpStatusCode, RedactedSecret};
use models::{DataRequestBatch, RetrievalResult};

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMESTAMP: &str = "2024-03-01T12:00:00Z";

fn settings(server: &MockServer) -> DataWarehouseSettings {
    DataWarehouseSettings {
        base_url: server.uri(),
        username: "analyst".to_string(),
        password: RedactedSecret::new("s3cret"),
    }
}

fn batch(items: Value) -> DataRequestBatch {
    DataRequestBatch::from_value(items).unwrap()
}

async fn mount_authenticate(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .and(body_json(json!({"username": "analyst", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id_token": "T"})))
        .expect(1)
        .mount(server)
        .await;
}

/// **VALUE**: Verifies the full happy path: token exchange, stamping, bearer header.
///
/// **WHY THIS MATTERS**: Every forecast round depends on this exchange. The
/// warehouse rejects unstamped requests and requests without the bearer token.
///
/// **BUG THIS CATCHES**: Would catch a missing `snapshot_time`, an old value not
/// being overwritten, reordered items, or the token not being sent as `Bearer`.
#[tokio::test]
async fn given_valid_credentials_when_requesting_data_then_stamped_batch_posted_with_bearer() {
    // GIVEN: A warehouse that accepts exactly the stamped, ordered batch
    let server = MockServer::start().await;
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
    let client = DataWarehouseClient::new(&server.uri()).unwrap();
    let mut batch = batch(json!([
        {"key": "gdp"},
        {"key": "cpi", "snapshot_time": "1999-01-01T00:00:00Z"}
    ]));

    // WHEN: Requesting
    let outcome = client
        .request_data(&settings(&server), &mut batch, TIMESTAMP)
        .await
        .unwrap();

    // THEN: Success with the payload
    assert_eq!(outcome, RetrievalResult::Success(json!({"series": []})));
}

#[tokio::test]
async fn given_400_when_retrieving_then_bad_request_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/data-requests/series/retrieve"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unknown key: gdpp"))
        .mount(&server)
        .await;
    let client = DataWarehouseClient::new(&server.uri()).unwrap();

    let outcome = client
        .retrieve(RedactedSecret::new("T"), &batch(json!([{"key": "gdpp"}])))
        .await
        .unwrap();

    assert_eq!(outcome, RetrievalResult::BadRequest("unknown key: gdpp".to_string()));
}

#[tokio::test]
async fn given_500_when_retrieving_then_other_failure_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/data-requests/series/retrieve"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error": "timeout"}"#))
        .mount(&server)
        .await;
    let client = DataWarehouseClient::new(&server.uri()).unwrap();

    let outcome = client
        .retrieve(RedactedSecret::new("T"), &batch(json!([{"key": "gdp"}])))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RetrievalResult::OtherFailure {
            status: HttpStatusCode(500),
            body: r#"{"error": "timeout"}"#.to_string(),
        }
    );
}

/// **VALUE**: Verifies a rejected login stops before any data request is sent.
#[tokio::test]
async fn given_401_from_authenticate_when_requesting_data_then_authentication_error() {
    // GIVEN: Authentication rejects; retrieve must never be called
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data-requests/series/retrieve"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = DataWarehouseClient::new(&server.uri()).unwrap();
    let mut batch = batch(json!([{"key": "gdp"}]));

    // WHEN: Requesting
    let result = client
        .request_data(&settings(&server), &mut batch, TIMESTAMP)
        .await;

    // THEN: Authentication error with status, password nowhere in the message
    match result {
        Err(err @ DataWarehouseError::Authentication { .. }) => {
            let text = err.to_string();
            assert!(text.contains("401"));
            assert!(text.contains("invalid credentials"));
            assert!(!text.contains("s3cret"));
        }
        other => panic!("Expected Authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_response_without_id_token_when_authenticating_then_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T"})))
        .mount(&server)
        .await;
    let client = DataWarehouseClient::new(&server.uri()).unwrap();

    let result = client
        .authenticate("analyst", &RedactedSecret::new("s3cret"))
        .await;

    assert!(matches!(result, Err(DataWarehouseError::Json { .. })));
}

/// **BUG THIS CATCHES**: Would catch `Url::join` dropping the `/api` prefix
/// because the base URL lacked a trailing slash.
#[tokio::test]
async fn given_base_url_with_path_prefix_when_authenticating_then_prefix_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id_token": "T"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = DataWarehouseClient::new(&format!("{}/api", server.uri())).unwrap();

    let token = client
        .authenticate("analyst", &RedactedSecret::new("s3cret"))
        .await
        .unwrap();

    assert_eq!(token.expose(), "T");
    assert_eq!(client.base_url().path(), "/api/");
}

#[test]
fn given_unparseable_base_url_when_constructing_then_url_parse_error() {
    let result = DataWarehouseClient::new("not a url");

    assert!(matches!(result, Err(DataWarehouseError::UrlParse { .. })));
}
