//! Client for the data warehouse series API.
//!
//! Two exchanges per retrieval: `POST authenticate` for a bearer token, then
//! `POST data-requests/series/retrieve` with the stamped request batch. No
//! retries and no connection reuse between the two.

use crate::config::DataWarehouseSettings;
use crate::error::data_warehouse::DataWarehouseError;

use common::{ErrorLocation, HttpStatusCode, RedactedSecret};
use models::{DataRequestBatch, RetrievalResult};

use std::panic::Location;

use const_format::concatcp;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

const AUTHENTICATE_ENDPOINT: &str = "authenticate";
const DATA_REQUESTS_ENDPOINT: &str = "data-requests";
const RETRIEVE_SERIES_ENDPOINT: &str = concatcp!(DATA_REQUESTS_ENDPOINT, "/series/retrieve");

#[derive(Serialize)]
struct AuthenticateRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthenticateResponse {
    id_token: String,
}

#[derive(Clone)]
pub struct DataWarehouseClient {
    base_url: Url,
    client: Client,
}

impl DataWarehouseClient {
    /// `base_url` may carry a path prefix (e.g. `https://host/api`); endpoints
    /// are resolved below it.
    pub fn new(base_url_str: &str) -> Result<Self, DataWarehouseError> {
        let mut base_url = Url::parse(base_url_str)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().pool_max_idle_per_host(0).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    /// [`DataWarehouseError::Authentication`] on any non-2xx status;
    /// [`DataWarehouseError::Json`] if the body carries no `id_token`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &RedactedSecret,
    ) -> Result<RedactedSecret, DataWarehouseError> {
        let url = self.base_url.join(AUTHENTICATE_ENDPOINT)?;
        debug!("Authenticating as {username} at {url}");

        let body = AuthenticateRequest {
            username,
            password: password.expose(),
        };

        let response = self.client.post(url).json(&body).send().await?;
        let status = HttpStatusCode::from(response.status().as_u16());

        if !status.is_success() {
            return Err(DataWarehouseError::Authentication {
                status_code: status,
                message: response.text().await.unwrap_or_default(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let text = response.text().await?;
        let parsed: AuthenticateResponse =
            serde_json::from_str(&text).map_err(|e| DataWarehouseError::Json {
                message: format!("Authenticate response has no usable id_token: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(RedactedSecret::new(parsed.id_token))
    }

    /// Submit the batch and classify the answer.
    ///
    /// The token is consumed; it is zeroized when this call returns.
    pub async fn retrieve(
        &self,
        token: RedactedSecret,
        batch: &DataRequestBatch,
    ) -> Result<RetrievalResult, DataWarehouseError> {
        let url = self.base_url.join(RETRIEVE_SERIES_ENDPOINT)?;
        debug!("Posting {} data requests to {url}", batch.len());

        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose())
            .json(&batch.to_request_body())
            .send()
            .await?;
        drop(token);

        let status = HttpStatusCode::from(response.status().as_u16());
        let body = response.text().await?;
        debug!("Retrieve answered HTTP {status} ({} bytes)", body.len());

        Ok(RetrievalResult::classify(status, body)?)
    }

    /// Stamp `batch` with `snapshot_time`, authenticate, and retrieve.
    pub async fn request_data(
        &self,
        settings: &DataWarehouseSettings,
        batch: &mut DataRequestBatch,
        snapshot_time: &str,
    ) -> Result<RetrievalResult, DataWarehouseError> {
        info!("Requesting forecast input data");
        batch.stamp_snapshot_time(snapshot_time);

        let token = self
            .authenticate(&settings.username, &settings.password)
            .await?;
        self.retrieve(token, batch).await
    }
}
