//! REST client for the Dock backend.

use std::time::Duration;

use async_trait::async_trait;
use dock_types::{
    DispatchRequest, EquipmentReturnRequest, ManifestItem, ReturnRequest, ReturnResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::backend::DockBackend;
use crate::endpoint::{Endpoint, WAVE_NUMBER_PARAM};
use crate::error::{ClientError, ClientResult};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of [`DockBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a new client targeting the given base URL.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("dock/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Setup(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> ClientResult<reqwest::Response> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("{endpoint} request failed: {e}")))?;
        check_status(endpoint, response).await
    }
}

/// Pass 2xx responses through; turn anything else into [`ClientError::Server`]
/// carrying the body's `message` field when there is one.
async fn check_status(
    endpoint: Endpoint,
    response: reqwest::Response,
) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.map_err(|e| {
        ClientError::Network(format!("failed reading {endpoint} error body: {e}"))
    })?;
    let message = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .or_else(|| {
            let text = String::from_utf8_lossy(&body).trim().to_string();
            (!text.is_empty()).then_some(text)
        });

    debug!(%endpoint, status = status.as_u16(), ?message, "backend rejected request");
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(endpoint: Endpoint, response: reqwest::Response) -> ClientResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(format!("invalid {endpoint} response: {e}")))
}

#[async_trait]
impl DockBackend for HttpBackend {
    async fn fetch_manifest(&self, wave_number: &str) -> ClientResult<Vec<ManifestItem>> {
        let endpoint = Endpoint::Manifest;
        let response = self
            .client
            .get(self.url(endpoint))
            .query(&[(WAVE_NUMBER_PARAM, wave_number)])
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("{endpoint} request failed: {e}")))?;
        let response = check_status(endpoint, response).await?;
        decode(endpoint, response).await
    }

    async fn submit_dispatch(&self, request: &DispatchRequest) -> ClientResult<()> {
        self.post(Endpoint::Submit, request).await?;
        Ok(())
    }

    async fn submit_return(&self, request: &ReturnRequest) -> ClientResult<ReturnResponse> {
        let response = self.post(Endpoint::Return, request).await?;
        decode(Endpoint::Return, response).await
    }

    async fn return_equipment(&self, request: &EquipmentReturnRequest) -> ClientResult<()> {
        self.post(Endpoint::ReturnEquipment, request).await?;
        Ok(())
    }
}
