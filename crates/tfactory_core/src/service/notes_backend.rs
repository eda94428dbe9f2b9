//! Local and remote notes backends behind one type.
//!
//! # Responsibility
//! - Select mock or remote storage once per session.
//! - Apply load/add/delete to the view's ordered note list.
//!
//! # Invariants
//! - Local mutations are synchronous and never fail.
//! - Remote mutations never edit the list directly; the list is reloaded
//!   from the gateway after every successful write.
//! - Remote lists are ordered by `created_at` descending.

use crate::gateway::{Gateway, GatewayResult, NoteDeleteFilter, NoteInsert, NotesQuery};
use crate::model::note::{Note, NoteDraft};
use crate::model::session::Session;
use chrono::Utc;
use log::info;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Where notes live for the current session.
#[derive(Clone, Default)]
pub enum NotesBackend {
    /// Transient in-memory list (mock mode or signed out).
    #[default]
    Local,
    /// Gateway table rows owned by `owner_id`.
    Remote {
        gateway: Arc<dyn Gateway>,
        owner_id: String,
    },
}

impl Debug for NotesBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "NotesBackend::Local"),
            Self::Remote { owner_id, .. } => f
                .debug_struct("NotesBackend::Remote")
                .field("owner_id", owner_id)
                .finish(),
        }
    }
}

impl NotesBackend {
    /// Remote only when the gateway exists and a session is active.
    pub fn select(gateway: Option<&Arc<dyn Gateway>>, session: Option<&Session>) -> Self {
        match (gateway, session) {
            (Some(gateway), Some(session)) => Self::Remote {
                gateway: Arc::clone(gateway),
                owner_id: session.user_id().to_string(),
            },
            _ => Self::Local,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote { .. } => "remote",
        }
    }

    /// Replaces `notes` with the authoritative list.
    ///
    /// Locally that is the single placeholder note.
    pub async fn load(&self, notes: &mut Vec<Note>) -> GatewayResult<()> {
        match self {
            Self::Local => {
                *notes = vec![Note::placeholder(Utc::now())];
            }
            Self::Remote { gateway, owner_id } => {
                *notes = gateway
                    .select_notes(&NotesQuery::newest_first(owner_id.as_str()))
                    .await?;
            }
        }
        info!(
            "event=notes_load module=notes status=ok mode={} count={}",
            self.mode(),
            notes.len()
        );
        Ok(())
    }

    /// Adds one note: prepended locally, inserted then reloaded remotely.
    pub async fn add(&self, notes: &mut Vec<Note>, draft: &NoteDraft) -> GatewayResult<()> {
        match self {
            Self::Local => {
                notes.insert(0, Note::local(draft, Utc::now()));
            }
            Self::Remote { gateway, owner_id } => {
                let row = NoteInsert {
                    user_id: owner_id.clone(),
                    title: draft.resolved_title().to_string(),
                    body: draft.body.clone(),
                };
                gateway.insert_note(&row).await?;
                self.load(notes).await?;
            }
        }
        info!("event=notes_add module=notes status=ok mode={}", self.mode());
        Ok(())
    }

    /// Removes every note with `id`, keeping the order of the rest.
    pub async fn delete(&self, notes: &mut Vec<Note>, id: &str) -> GatewayResult<()> {
        match self {
            Self::Local => {
                notes.retain(|note| note.id != id);
            }
            Self::Remote { gateway, owner_id } => {
                let filter = NoteDeleteFilter {
                    id: id.to_string(),
                    owner_id: owner_id.clone(),
                };
                gateway.delete_note(&filter).await?;
                self.load(notes).await?;
            }
        }
        info!(
            "event=notes_delete module=notes status=ok mode={}",
            self.mode()
        );
        Ok(())
    }
}
