//! Serverless handlers for Template Factory.
//!
//! The `/api/hello` and `/api/notes` endpoints exist once per hosting
//! platform: axum handlers for the Node host and event handlers for the
//! static host. [`router::build_router`] mounts both next to the deep-link
//! fallback so one process can stand in for a deployment.

pub mod config;
pub mod error;
pub mod handlers;
pub mod netlify;
pub mod node;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{FunctionsError, ServerError};
pub use netlify::{FunctionEvent, FunctionResponse};
pub use router::build_router;
pub use server::start_server;
pub use state::FunctionsState;
