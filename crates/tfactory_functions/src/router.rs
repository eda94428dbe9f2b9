//! HTTP surface of one deployment.
//!
//! # Invariants
//! - `/api/hello` and `/api/notes` are answered by the configured platform.
//! - Unknown `/api/*` paths are JSON 404s and never fall back to the page.
//! - Missing `/assets/*` files are plain 404s.
//! - Every other path is answered with the entry document so client-side
//!   routes survive a reload.

use crate::error::FunctionsError;
use crate::state::FunctionsState;
use crate::{netlify, node};
use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{debug, info};
use tfactory_core::api::{HELLO_ENDPOINT, NOTES_ENV_ENDPOINT};
use tfactory_core::model::wire::Platform;

pub const NETLIFY_HELLO_PATH: &str = "/.netlify/functions/hello";
pub const NETLIFY_NOTES_PATH: &str = "/.netlify/functions/notes";

const API_PREFIX: &str = "/api";
const ASSETS_PREFIX: &str = "/assets/";

/// Document every client-side route is served from.
pub const ENTRY_DOCUMENT: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Template Factory</title>
    <script type="module" src="/assets/index.js"></script>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

pub fn build_router(state: FunctionsState) -> Router {
    info!(
        "event=router_build module=functions status=ok platform={}",
        state.platform
    );
    let api = match state.platform {
        Platform::Vercel => Router::new()
            .route(HELLO_ENDPOINT, get(node::hello))
            .route(NOTES_ENV_ENDPOINT, get(node::notes)),
        Platform::Netlify => Router::new()
            .route(HELLO_ENDPOINT, get(netlify::hello_route))
            .route(NOTES_ENV_ENDPOINT, get(netlify::notes_route)),
    };

    api.route(NETLIFY_HELLO_PATH, get(netlify::hello_route))
        .route(NETLIFY_NOTES_PATH, get(netlify::notes_route))
        .fallback(fallback)
        .with_state(state)
}

async fn fallback(OriginalUri(uri): OriginalUri) -> Response {
    let path = uri.path();
    if is_api_path(path) {
        return FunctionsError::NotFound(path.to_string()).into_response();
    }
    if path.starts_with(ASSETS_PREFIX) {
        debug!("event=asset_missing module=functions status=error");
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }
    Html(ENTRY_DOCUMENT).into_response()
}

fn is_api_path(path: &str) -> bool {
    path == API_PREFIX
        || path
            .strip_prefix(API_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}
