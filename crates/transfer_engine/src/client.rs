use std::time::Duration;

use transfer_core::ProgressSnapshot;
use transfer_logging::transfer_trace;
use url::Url;

use crate::wire::decode_snapshot;
use crate::{Endpoints, FailureKind, TransportError};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Where progress snapshots come from. One call is one poll.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<ProgressSnapshot, TransportError>;
}

/// Backend job control. Response bodies are ignored; only completion matters.
#[async_trait::async_trait]
pub trait JobControl: Send + Sync {
    async fn run(&self) -> Result<(), TransportError>;
    async fn abort_queue(&self) -> Result<(), TransportError>;
}

/// HTTP implementation of both backend seams.
#[derive(Debug, Clone)]
pub struct ReqwestTransferClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl ReqwestTransferClient {
    pub fn new(endpoints: Endpoints, settings: &ClientSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, endpoints })
    }

    async fn get(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        transfer_trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl StatusSource for ReqwestTransferClient {
    async fn fetch_status(&self) -> Result<ProgressSnapshot, TransportError> {
        let body = self.get(&self.endpoints.status).await?;
        decode_snapshot(&body)
    }
}

#[async_trait::async_trait]
impl JobControl for ReqwestTransferClient {
    async fn run(&self) -> Result<(), TransportError> {
        self.get(&self.endpoints.run).await.map(|_| ())
    }

    async fn abort_queue(&self) -> Result<(), TransportError> {
        self.get(&self.endpoints.abort).await.map(|_| ())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return TransportError::new(FailureKind::InvalidUrl, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
