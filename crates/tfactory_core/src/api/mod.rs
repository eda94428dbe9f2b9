//! Client for the application's own `/api/*` endpoints.
//!
//! # Responsibility
//! - Fetch JSON with `Accept: application/json` and classify failures.
//! - Decode the shared wire payloads.
//!
//! # Invariants
//! - A non-JSON response is an error even when the status is 2xx.
//! - A non-2xx JSON response surfaces its `error` field when present.

use crate::model::wire::{HelloPayload, NotesEnvPayload};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const HELLO_ENDPOINT: &str = "/api/hello";
pub const NOTES_ENV_ENDPOINT: &str = "/api/notes";

/// Failure of one endpoint fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS or TLS failure before a response arrived.
    Transport(String),
    /// Response content type was not JSON.
    NonJson { status: u16 },
    /// JSON response with a non-2xx status.
    Status { status: u16, message: Option<String> },
    /// JSON that does not match the expected payload.
    Decode(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) if message.is_empty() => write!(f, "request failed"),
            Self::Transport(message) => write!(f, "{message}"),
            Self::NonJson { .. } => write!(f, "non-json response"),
            Self::Status {
                message: Some(message),
                ..
            } if !message.is_empty() => write!(f, "{message}"),
            Self::Status { status, .. } => write!(f, "HTTP {status}"),
            Self::Decode(message) => write!(f, "invalid response payload: {message}"),
        }
    }
}

impl Error for FetchError {}

/// Endpoint access used by the health panel.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn hello(&self) -> Result<HelloPayload, FetchError>;
}

/// reqwest-backed client for a deployed origin.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Fetches the env-presence demo endpoint.
    pub async fn notes_env(&self) -> Result<NotesEnvPayload, FetchError> {
        self.get_json(NOTES_ENV_ENDPOINT).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        if !is_json {
            return Err(FetchError::NonJson {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.get("error").and_then(Value::as_str).map(str::to_string),
            });
        }

        serde_json::from_value(body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn hello(&self) -> Result<HelloPayload, FetchError> {
        self.get_json(HELLO_ENDPOINT).await
    }
}

#[cfg(test)]
mod tests {
    use super::FetchError;

    #[test]
    fn messages_are_never_empty() {
        let cases = [
            FetchError::Transport(String::new()),
            FetchError::NonJson { status: 200 },
            FetchError::Status {
                status: 502,
                message: None,
            },
            FetchError::Status {
                status: 500,
                message: Some(String::new()),
            },
            FetchError::Decode("missing field `ok`".to_string()),
        ];
        for err in cases {
            assert!(!err.to_string().is_empty(), "{err:?}");
        }
    }

    #[test]
    fn status_prefers_body_error() {
        let err = FetchError::Status {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert_eq!(err.to_string(), "boom");
        let err = FetchError::Status {
            status: 404,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 404");
    }
}
