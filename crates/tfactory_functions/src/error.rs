//! Error types of the functions host.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

/// Request-level failure, answered as `{ "ok": false, "error": ... }`.
#[derive(Debug)]
pub enum FunctionsError {
    /// No function is mounted at the requested `/api/*` path.
    NotFound(String),
    /// A payload could not be serialized.
    Encode(serde_json::Error),
}

impl FunctionsError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for FunctionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "no function at `{path}`"),
            Self::Encode(err) => write!(f, "failed to encode response: {err}"),
        }
    }
}

impl Error for FunctionsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for FunctionsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}

impl IntoResponse for FunctionsError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(
            "event=function_error module=functions status=error http_status={} error={}",
            status.as_u16(),
            self
        );
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}

/// Failure to run the functions host process.
#[derive(Debug)]
pub enum ServerError {
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },
    Serve(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bind { address, source } => write!(f, "failed to bind {address}: {source}"),
            Self::Serve(err) => write!(f, "server stopped with error: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
            Self::Serve(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FunctionsError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn not_found_maps_to_404() {
        let err = FunctionsError::NotFound("/api/missing".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("/api/missing"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
