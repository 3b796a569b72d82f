//! Reqwest-backed implementation of the control-plane and log transports.

use crate::client::error::TransportError;
use crate::client::{ControlApi, RangeRead, RangeResponse};
use async_trait::async_trait;
use fd_protocol::{StepMetrics, StepState};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, RANGE};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP transport for control-plane calls and log reads.
///
/// Control-plane requests carry the headers supplied at construction
/// (authentication header construction itself is owned by the caller).
/// Log read URLs are pre-signed, so [`RangeRead`] requests are sent
/// without them.
pub struct HttpTransport {
    client: reqwest::Client,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Create a transport with the given control-plane request headers.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// initialized.
    pub fn new(headers: HeaderMap) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| TransportError::Init {
                message: error.to_string(),
            })?;

        Ok(Self { client, headers })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|error| request_error(url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|error| TransportError::Decode {
                url: url.to_string(),
                message: error.to_string(),
            })
    }
}

fn request_error(url: &str, error: &reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        message: error.to_string(),
    }
}

// Read from the header rather than `Response::content_length`, which
// reports the (empty) body size for HEAD responses.
fn header_content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

async fn response_bytes(url: &str, response: Response) -> Result<Vec<u8>, TransportError> {
    Ok(response
        .bytes()
        .await
        .map_err(|error| request_error(url, &error))?
        .to_vec())
}

#[async_trait]
impl ControlApi for HttpTransport {
    async fn refresh_step(&self, url: &str) -> Result<StepState, TransportError> {
        self.get_json(url).await
    }

    async fn step_metrics(&self, url: &str) -> Result<StepMetrics, TransportError> {
        self.get_json(url).await
    }

    async fn submit_transition(&self, url: &str, body: &Value) -> Result<(), TransportError> {
        let response = self
            .client
            .put(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|error| request_error(url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn resolve_log_url(&self, url: &str) -> Result<String, TransportError> {
        let document: Value = self.get_json(url).await?;
        document
            .get("redirect")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TransportError::MissingRedirect {
                url: url.to_string(),
            })
    }
}

#[async_trait]
impl RangeRead for HttpTransport {
    async fn read_range(&self, url: &str, offset: u64) -> Result<RangeResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(RANGE, format!("bytes={}-", offset))
            .send()
            .await
            .map_err(|error| request_error(url, &error))?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("").to_string();
        let header_length = header_content_length(&response);

        let body = if status == StatusCode::PARTIAL_CONTENT {
            response_bytes(url, response).await?
        } else {
            Vec::new()
        };

        Ok(RangeResponse {
            status: status.as_u16(),
            reason,
            content_length: header_length.unwrap_or(body.len() as u64),
            body,
        })
    }

    async fn content_size(&self, url: &str) -> Result<u64, TransportError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|error| request_error(url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        header_content_length(&response).ok_or_else(|| TransportError::MissingContentLength {
            url: url.to_string(),
        })
    }

    async fn read_full(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| request_error(url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response_bytes(url, response).await
    }
}
