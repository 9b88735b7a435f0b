//! Hub client: submit signed envelopes over the hub's HTTP API.
//!
//! One operation, `submitMessage`. Outcomes are classified for the caller:
//! accepted, duplicate (already merged, not an error), validation rejection
//! (permanent), or transport failure (retryable). No retry loop lives here.

use prost::Message as _;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::proto::Message;

/// Successful submission outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitAck {
    /// The hub accepted and merged the message.
    Accepted { hash: Vec<u8> },
    /// The hub had already merged an identical message.
    Duplicate { hash: Vec<u8> },
}

impl SubmitAck {
    /// Canonical identifier of the submitted envelope.
    pub fn hash(&self) -> &[u8] {
        match self {
            Self::Accepted { hash } | Self::Duplicate { hash } => hash,
        }
    }
}

/// Error payload hubs return alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct HubErrorBody {
    #[serde(rename = "errCode")]
    err_code: Option<String>,
    details: Option<String>,
}

/// Client for a single hub endpoint.
pub struct HubClient {
    http: reqwest::Client,
    submit_url: String,
}

impl HubClient {
    /// Connect to a hub at `host:port` (scheme optional). The timeout bounds
    /// the whole submit round trip.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, crate::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            submit_url: format!("{}/v1/submitMessage", normalize_endpoint(endpoint)),
        })
    }

    /// Submit a signed envelope and classify the hub's answer.
    pub async fn submit(&self, message: &Message) -> Result<SubmitAck, crate::Error> {
        // Never put an envelope with a broken hash or signature on the wire.
        crate::factory::verify_envelope(message)?;

        let response = self
            .http
            .post(&self.submit_url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(message.encode_to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    crate::Error::HubTransport("submit timed out".into())
                } else {
                    crate::Error::HubTransport(format!("submit failed: {e}"))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            info!(hash = %hex::encode(&message.hash), "Message accepted by hub");
            return Ok(SubmitAck::Accepted {
                hash: message.hash.clone(),
            });
        }

        let payload = response.bytes().await.unwrap_or_default();
        classify_rejection(status, &payload, &message.hash)
    }
}

/// Map a non-2xx hub response to an outcome.
fn classify_rejection(
    status: StatusCode,
    payload: &[u8],
    hash: &[u8],
) -> Result<SubmitAck, crate::Error> {
    let body: Option<HubErrorBody> = serde_json::from_slice(payload).ok();
    let err_code = body
        .as_ref()
        .and_then(|b| b.err_code.clone())
        .unwrap_or_default();
    let details = body
        .as_ref()
        .and_then(|b| b.details.clone())
        .unwrap_or_else(|| String::from_utf8_lossy(payload).into_owned());

    if err_code.contains("duplicate") {
        info!(hash = %hex::encode(hash), "Message already merged by hub");
        return Ok(SubmitAck::Duplicate {
            hash: hash.to_vec(),
        });
    }

    if status.is_server_error() {
        warn!(status = %status, "Hub unavailable");
        return Err(crate::Error::HubTransport(format!(
            "hub returned {status}: {details}"
        )));
    }

    let reason = if err_code.is_empty() {
        format!("{status}: {details}")
    } else {
        format!("{err_code}: {details}")
    };
    Err(crate::Error::HubValidation(reason))
}

/// Accept `host:port` or a full URL; default to plain HTTP, as hub
/// endpoints inside a deployment usually are.
fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}
