//! reqwest implementation of [`HomeAssistantApi`]

use async_trait::async_trait;
use ha_core::EntityState;
use reqwest::{header, Client, RequestBuilder, Response, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::HomeAssistantApi;

/// HTTP client bound to one Home Assistant instance
#[derive(Clone)]
pub struct HaClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HaClient {
    /// Create a client for the instance at `base_url`.
    ///
    /// `base_url` is the instance root (e.g. `http://homeassistant.local:8123`
    /// or `http://supervisor/core`); the `/api/...` paths are appended to it.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Build `{base}/api/{segments...}`, percent-encoding each segment so
    /// caller-supplied names cannot escape the path
    fn api_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Turn non-2xx responses into [`ClientError::Status`] and read the body
    async fn read_body(response: Response) -> ClientResult<String> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }
        Ok(body)
    }
}

#[async_trait]
impl HomeAssistantApi for HaClient {
    async fn get_states(&self) -> ClientResult<Vec<EntityState>> {
        let url = self.api_url(&["states"])?;
        debug!(%url, "Fetching states");

        let response = self.authorize(self.client.get(url)).send().await?;
        let body = Self::read_body(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn call_service(&self, domain: &str, service: &str, data: Value) -> ClientResult<Value> {
        let url = self.api_url(&["services", domain, service])?;
        debug!(%url, domain, service, "Calling service");

        let response = self
            .authorize(self.client.post(url))
            .json(&data)
            .send()
            .await?;
        let body = Self::read_body(response).await?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
