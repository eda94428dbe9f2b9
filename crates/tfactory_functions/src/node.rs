//! Node-host handlers.
//!
//! `route` echoes the request URL as received: path plus query string.

use crate::handlers::{self, HELLO_CACHE_CONTROL};
use crate::state::FunctionsState;
use axum::extract::{OriginalUri, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use log::debug;
use tfactory_core::model::wire::Platform;

pub async fn hello(
    State(state): State<FunctionsState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let route = request_url(&uri);
    debug!("event=function_call module=functions status=ok platform=vercel function=hello");
    let payload = handlers::hello(Platform::Vercel, route, &state.env, Utc::now());
    ([(CACHE_CONTROL, HELLO_CACHE_CONTROL)], Json(payload)).into_response()
}

pub async fn notes(State(state): State<FunctionsState>) -> Response {
    debug!("event=function_call module=functions status=ok platform=vercel function=notes");
    Json(handlers::notes_env(Platform::Vercel, &state.env, Utc::now())).into_response()
}

fn request_url(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|path_and_query| path_and_query.as_str())
        .unwrap_or_else(|| uri.path())
}

#[cfg(test)]
mod tests {
    use super::request_url;
    use axum::http::Uri;

    #[test]
    fn request_url_keeps_query() {
        let uri: Uri = "/api/hello?debug=1".parse().expect("valid uri");
        assert_eq!(request_url(&uri), "/api/hello?debug=1");
        let uri: Uri = "/api/hello".parse().expect("valid uri");
        assert_eq!(request_url(&uri), "/api/hello");
    }
}
