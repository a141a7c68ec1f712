use reqwest::multipart;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::payload::{PartKind, Payload};

/// Connection settings for the backend, passed in explicitly by the caller.
/// The bearer credential comes from whatever session store the surrounding
/// application uses; the adapter never reads ambient global state.
#[derive(Debug, Clone, Default)]
pub struct SubmitConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
}

/// Thin client over the remote REST API. One request per call, no retries;
/// status codes are interpreted generically as 2xx vs. everything else.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: SubmitConfig,
}

impl Client {
    pub fn new(config: SubmitConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// POST a payload built from a validated snapshot.
    ///
    /// On 2xx the parsed response body is returned (`Null` for an empty
    /// body); the caller is expected to reset its form state and show a
    /// success notice. On anything else the server-provided error message
    /// is surfaced verbatim when present.
    pub async fn submit(&self, endpoint: &str, payload: Payload) -> Result<JsonValue, SubmitError> {
        let url = self.url(endpoint);
        debug!(%url, "submitting form");

        let req = self.authorize(self.http.post(&url));
        let req = match payload {
            Payload::Json(body) => req.json(&body),
            Payload::Multipart(parts) => {
                let mut form = multipart::Form::new();
                for part in parts {
                    form = match part.kind {
                        PartKind::Text(text) => form.text(part.name, text),
                        PartKind::File(file) => {
                            let bytes = tokio::fs::read(&file.path).await?;
                            form.part(
                                part.name,
                                multipart::Part::bytes(bytes).file_name(file.file_name),
                            )
                        }
                    };
                }
                req.multipart(form)
            }
        };

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            if body.is_empty() {
                return Ok(JsonValue::Null);
            }
            return Ok(serde_json::from_slice(&body).unwrap_or(JsonValue::Null));
        }

        let message = extract_server_message(&response.bytes().await.unwrap_or_default())
            .unwrap_or_else(|| format!("submission failed with status {}", status.as_u16()));
        warn!(%url, status = status.as_u16(), "submission rejected");
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Reachability probe against the API root. Returns the status code;
    /// any HTTP response at all counts as reachable.
    pub async fn ping(&self) -> Result<u16, SubmitError> {
        let url = self.url("/");
        debug!(%url, "pinging backend");
        let response = self.authorize(self.http.get(&url)).send().await?;
        Ok(response.status().as_u16())
    }

    /// GET the full record set behind a form's list view. No pagination or
    /// partial fetch; every call returns everything the backend has.
    pub async fn fetch_records(&self, endpoint: &str) -> Result<Vec<JsonValue>, SubmitError> {
        let url = self.url(endpoint);
        debug!(%url, "fetching records");

        let response = self.authorize(self.http.get(&url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = extract_server_message(&response.bytes().await.unwrap_or_default())
                .unwrap_or_else(|| format!("list fetch failed with status {}", status.as_u16()));
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let records: Vec<JsonValue> = response.json().await?;
        Ok(records)
    }
}

/// Pull the human-readable error out of a backend failure body: the
/// conventional `message` or `error` string field, when the body is JSON.
fn extract_server_message(body: &[u8]) -> Option<String> {
    let value: JsonValue = serde_json::from_slice(body).ok()?;
    for key in ["message", "error"] {
        if let Some(msg) = value.get(key).and_then(JsonValue::as_str) {
            return Some(msg.to_string());
        }
    }
    None
}
