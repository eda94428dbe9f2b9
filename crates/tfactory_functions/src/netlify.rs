//! Static-host function handlers.
//!
//! # Responsibility
//! - Model the host's function event and response envelope.
//! - Answer `hello` and `notes` as event handlers.
//! - Adapt those handlers to axum so the router can serve them.
//!
//! # Invariants
//! - Response bodies are JSON strings; `Content-Type` is always set.
//! - `route` echoes the event path without the query string.

use crate::error::FunctionsError;
use crate::handlers::{self, HELLO_CACHE_CONTROL};
use crate::state::FunctionsState;
use axum::body::Body;
use axum::extract::{OriginalUri, Query, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tfactory_core::config::FunctionsEnv;
use tfactory_core::model::wire::Platform;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Incoming function invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub path: String,
    pub http_method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub query_string_parameters: BTreeMap<String, String>,
}

impl FunctionEvent {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            http_method: Method::GET.to_string(),
            ..Self::default()
        }
    }
}

/// Function result handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    fn json<T: Serialize>(value: &T) -> Result<Self, FunctionsError> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        Ok(Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: serde_json::to_string(value)?,
        })
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;
        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => warn!("event=function_header module=functions status=error header={name}"),
            }
        }
        response
    }
}

pub fn hello(
    event: &FunctionEvent,
    env: &FunctionsEnv,
    now: DateTime<Utc>,
) -> Result<FunctionResponse, FunctionsError> {
    let payload = handlers::hello(Platform::Netlify, &event.path, env, now);
    Ok(FunctionResponse::json(&payload)?.with_header("Cache-Control", HELLO_CACHE_CONTROL))
}

pub fn notes(
    event: &FunctionEvent,
    env: &FunctionsEnv,
    now: DateTime<Utc>,
) -> Result<FunctionResponse, FunctionsError> {
    debug!(
        "event=function_call module=functions status=ok platform=netlify function=notes method={}",
        event.http_method
    );
    FunctionResponse::json(&handlers::notes_env(Platform::Netlify, env, now))
}

/// axum entry point for [`hello`].
pub async fn hello_route(
    State(state): State<FunctionsState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<FunctionResponse, FunctionsError> {
    let event = event_from_request(&method, uri.path(), &headers, query);
    debug!(
        "event=function_call module=functions status=ok platform=netlify function=hello method={}",
        event.http_method
    );
    hello(&event, &state.env, Utc::now())
}

/// axum entry point for [`notes`].
pub async fn notes_route(
    State(state): State<FunctionsState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<FunctionResponse, FunctionsError> {
    let event = event_from_request(&method, uri.path(), &headers, query);
    notes(&event, &state.env, Utc::now())
}

fn event_from_request(
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    query: BTreeMap<String, String>,
) -> FunctionEvent {
    FunctionEvent {
        path: path.to_string(),
        http_method: method.to_string(),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
        query_string_parameters: query,
    }
}
