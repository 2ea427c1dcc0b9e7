//! Reqwest-backed moderation gateway.
//!
//! Owns transport details only: request encoding, timeouts, status mapping,
//! and decoding the provider's verdict. Provider failures become internal
//! domain errors here, so the boundary redacts them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::domain::Error;
use crate::domain::ports::{ModerationGateway, ModerationVerdict};

const DEFAULT_USER_AGENT: &str = "crud-backend-moderation/0.1";

#[derive(Debug, Serialize)]
struct ReviewRequestDto<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReviewResponseDto {
    approved: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Moderation adapter that POSTs text to a single review endpoint.
pub struct HttpModerationGateway {
    client: Client,
    endpoint: Url,
}

impl HttpModerationGateway {
    /// Build an adapter using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ModerationGateway for HttpModerationGateway {
    async fn review(&self, text: &str) -> Result<ModerationVerdict, Error> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ReviewRequestDto { text })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        parse_verdict(body.as_ref())
    }
}

fn parse_verdict(body: &[u8]) -> Result<ModerationVerdict, Error> {
    let decoded: ReviewResponseDto = serde_json::from_slice(body).map_err(|error| {
        Error::internal(format!("invalid moderation payload: {error}"))
    })?;
    if decoded.approved {
        return Ok(ModerationVerdict::Approved);
    }
    let reason = decoded
        .reason
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or_else(|| "content rejected by moderation".to_owned());
    Ok(ModerationVerdict::Rejected { reason })
}

fn map_transport_error(error: reqwest::Error) -> Error {
    warn!(%error, timeout = error.is_timeout(), "moderation transport failure");
    if error.is_timeout() {
        Error::internal(format!("moderation service timed out: {error}"))
    } else {
        Error::internal(format!("moderation service unreachable: {error}"))
    }
}

fn map_status_error(status: StatusCode) -> Error {
    warn!(status = status.as_u16(), "moderation service returned an error status");
    match status {
        StatusCode::TOO_MANY_REQUESTS => Error::internal("moderation service rate limited"),
        _ if status.is_client_error() => {
            Error::internal(format!("moderation request refused: status {}", status.as_u16()))
        }
        _ => Error::internal(format!(
            "moderation service unavailable: status {}",
            status.as_u16()
        )),
    }
}
