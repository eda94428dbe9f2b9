//! Note records and add-form drafts.
//!
//! # Invariants
//! - Local ids carry the `mock-` prefix; remote ids are whatever the gateway
//!   assigned, kept as strings.
//! - Local ids come from a random source without a collision check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Note identifier as exposed to views.
pub type NoteId = String;

/// Title used when a draft is submitted with an empty title.
pub const UNTITLED: &str = "Untitled";
/// Id of the placeholder note seeded in mock mode.
pub const PLACEHOLDER_NOTE_ID: &str = "mock-1";
const PLACEHOLDER_TITLE: &str = "Mock Note";
const PLACEHOLDER_BODY: &str = "Set the gateway environment values and notes become real.";
const LOCAL_ID_PREFIX: &str = "mock-";
const LOCAL_ID_HEX_LEN: usize = 13;

/// One note as listed in the notes panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: NoteId,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// The single placeholder shown when notes are loaded in mock mode.
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            id: PLACEHOLDER_NOTE_ID.to_string(),
            title: PLACEHOLDER_TITLE.to_string(),
            body: PLACEHOLDER_BODY.to_string(),
            created_at: now,
        }
    }

    /// Materializes a draft as a local note with a fresh id.
    pub fn local(draft: &NoteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_local_id(),
            title: draft.resolved_title().to_string(),
            body: draft.body.clone(),
            created_at: now,
        }
    }
}

/// Add-form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Title to persist: [`UNTITLED`] when the input is empty.
    pub fn resolved_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            self.title.as_str()
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.body.clear();
    }
}

/// Generates a `mock-<hex>` identifier for a locally created note.
pub fn generate_local_id() -> NoteId {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{LOCAL_ID_PREFIX}{}", &hex[..LOCAL_ID_HEX_LEN])
}

/// Hosted tables may use integer keys; views only ever compare strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<NoteId, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "note id must be a string or number, got {other}"
        ))),
    }
}

/// Nullable text columns come back as `null`; views render them empty.
fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
