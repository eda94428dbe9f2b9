//! Auth and notes panel state.

use crate::model::note::{Note, NoteDraft};
use crate::view::busy::BusyFlag;

/// Sign-in form state.
#[derive(Debug, Clone, Default)]
pub struct AuthPanel {
    pub email: String,
    pub password: String,
    /// Display-only failure of the last auth action.
    pub error: Option<String>,
    /// Display-only confirmation, e.g. after a magic link was sent.
    pub notice: Option<String>,
    pub busy: BusyFlag,
}

impl AuthPanel {
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub(crate) fn clear_messages(&mut self) {
        self.error = None;
        self.notice = None;
    }
}

/// Notes list and add-form state.
#[derive(Debug, Clone, Default)]
pub struct NotesPanel {
    pub items: Vec<Note>,
    pub draft: NoteDraft,
    /// Display-only failure of the last notes operation.
    pub error: Option<String>,
    pub busy: BusyFlag,
}

impl NotesPanel {
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }
}
