//! HTTP client for the management server's REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use recon_core::{ProfileEntry, ReconError};

use crate::builder::CatalogSource;
use crate::dispatch::ProfileInstaller;

/// Fixed basic-auth user of the management server API.
const API_USER: &str = "micromdm";

/// A named grouping of profile identifiers devices are expected to run.
#[derive(Debug, Clone, Deserialize)]
pub struct Blueprint {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub profile_ids: Vec<String>,
}

#[derive(Deserialize)]
struct BlueprintsResponse {
    #[serde(default)]
    blueprints: Vec<Blueprint>,
}

/// One profile definition as the server returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "Identifier")]
    pub identifier: String,
    #[serde(rename = "Mobileconfig")]
    pub mobileconfig: String,
}

#[derive(Deserialize)]
struct ProfilesResponse {
    #[serde(default)]
    profiles: Vec<ProfileRecord>,
}

/// Client for the blueprint, profile and command endpoints.
///
/// All calls carry a bounded timeout and a bounded retry count; once
/// those are exhausted the failure surfaces to the caller instead of
/// hanging it.
pub struct MdmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Additional attempts after the first failed one
    retries: u32,
}

impl MdmClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        retries: u32,
    ) -> Result<Self, ReconError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReconError::CatalogBuildFailed(format!("http client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST a JSON body with bounded retries, expecting a success status.
    /// Returns the raw response on success, the last error text otherwise.
    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<reqwest::Response, String> {
        let url = self.url(path);
        let mut last_error = String::new();

        for attempt in 0..=self.retries {
            if attempt > 0 {
                debug!(%url, attempt, "retrying management server call");
            }
            let sent = self
                .http
                .post(&url)
                .basic_auth(API_USER, Some(&self.api_key))
                .json(body)
                .send()
                .await;
            match sent {
                Ok(response) => match response.error_for_status() {
                    Ok(ok) => return Ok(ok),
                    Err(e) => last_error = e.to_string(),
                },
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(format!("{url}: {last_error}"))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, String> {
        let response = self.post(path, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| format!("response body: {e}"))
    }
}

#[async_trait]
impl CatalogSource for MdmClient {
    async fn blueprints(&self) -> Result<Vec<Blueprint>, ReconError> {
        let response: BlueprintsResponse = self
            .post_json("/v1/blueprints", &json!({}))
            .await
            .map_err(ReconError::CatalogBuildFailed)?;
        Ok(response.blueprints)
    }

    async fn profiles(&self, id: &str) -> Result<Vec<ProfileRecord>, ReconError> {
        let response: ProfilesResponse = self
            .post_json("/v1/profiles", &json!({ "id": id }))
            .await
            .map_err(ReconError::CatalogBuildFailed)?;
        Ok(response.profiles)
    }
}

#[async_trait]
impl ProfileInstaller for MdmClient {
    async fn install_profile(&self, udid: &str, entry: &ProfileEntry) -> Result<(), ReconError> {
        let body = json!({
            "request_type": "InstallProfile",
            "udid": udid,
            "payload": entry.mobileconfig,
        });
        // Fire-and-forget: the response body only classifies success.
        self.post("/v1/commands", &body)
            .await
            .map(|_| ())
            .map_err(ReconError::DispatchFailed)
    }
}
