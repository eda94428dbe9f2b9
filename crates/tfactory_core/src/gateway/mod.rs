//! Remote data gateway capability.
//!
//! # Responsibility
//! - Define the narrow auth + notes-table surface the view consumes.
//! - Construct the hosted client only when it is fully configured.
//!
//! # Invariants
//! - An unconfigured gateway is `None`, never a stub that errors.
//! - Every notes-table call is scoped by an owner equality filter.

pub mod session_file;
pub mod supabase;

use crate::config::AppConfig;
use crate::model::note::{Note, NoteId};
use crate::model::session::Session;
use crate::subscription::Subscription;
use async_trait::async_trait;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use session_file::SessionFile;
pub use supabase::SupabaseGateway;

pub const NOTES_TABLE: &str = "notes";
pub const NOTES_COLUMNS: &str = "id,title,body,created_at";

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway call failure, rendered as a display-only message by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    Transport(String),
    /// The service answered with an error status.
    Rejected { status: u16, message: String },
    Decode(String),
    /// A table call was attempted without an authenticated session.
    NotSignedIn,
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "gateway unreachable: {message}"),
            Self::Rejected { status, message } if message.is_empty() => {
                write!(f, "gateway rejected request (HTTP {status})")
            }
            Self::Rejected { message, .. } => write!(f, "{message}"),
            Self::Decode(message) => write!(f, "unexpected gateway response: {message}"),
            Self::NotSignedIn => write!(f, "not signed in"),
        }
    }
}

impl Error for GatewayError {}

/// Kind of auth transition broadcast to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
}

/// One auth-state notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// `select` over the notes table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesQuery {
    pub owner_id: String,
    pub created_at: SortOrder,
}

impl NotesQuery {
    /// Newest first, the order the notes panel shows.
    pub fn newest_first(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            created_at: SortOrder::Descending,
        }
    }
}

/// Row inserted into the notes table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteInsert {
    pub user_id: String,
    pub title: String,
    pub body: String,
}

/// `delete` filter: note id and owner must both match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDeleteFilter {
    pub id: NoteId,
    pub owner_id: String,
}

/// Hosted auth and row-secured notes storage.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn get_session(&self) -> GatewayResult<Option<Session>>;

    /// Registers for auth changes; dropping the handle unsubscribes.
    fn on_auth_state_change(&self) -> Subscription<AuthChange>;

    /// Requests a passwordless sign-in link for `email`.
    async fn sign_in_with_otp(&self, email: &str) -> GatewayResult<()>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> GatewayResult<Session>;

    async fn sign_out(&self) -> GatewayResult<()>;

    async fn select_notes(&self, query: &NotesQuery) -> GatewayResult<Vec<Note>>;

    async fn insert_note(&self, row: &NoteInsert) -> GatewayResult<()>;

    async fn delete_note(&self, filter: &NoteDeleteFilter) -> GatewayResult<()>;
}

/// Builds the gateway capability from configuration, once per process.
pub fn connect(config: &AppConfig) -> Option<Arc<dyn Gateway>> {
    match &config.gateway {
        Some(settings) => {
            info!("event=gateway_connect module=gateway status=ok");
            Some(Arc::new(SupabaseGateway::new(settings.clone())))
        }
        None => {
            info!("event=gateway_connect module=gateway status=skipped mode=mock");
            None
        }
    }
}
