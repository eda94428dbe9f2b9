//! Application view state and its reconciliation against the location.
//!
//! # Responsibility
//! - Wire the path store, route table, API client and optional gateway.
//! - Drive the health check and notes loading from location and session
//!   changes.
//! - Expose auth and notes actions with busy/error bookkeeping.
//!
//! # Invariants
//! - The gateway is fixed at mount and never reconstructed.
//! - Every location change re-enters the health panel into `loading`.
//! - On the notes route, a change of location or session user reloads notes.
//! - Busy flags are held only for the duration of remote calls.

use crate::api::{ApiClient, FetchError};
use crate::gateway::{AuthChange, Gateway, GatewayError};
use crate::model::note::NoteDraft;
use crate::model::session::Session;
use crate::model::wire::HelloPayload;
use crate::routing::history::History;
use crate::routing::path_store::PathStore;
use crate::routing::route_table::{Route, RouteTable, NOTES_PATH};
use crate::service::notes_backend::NotesBackend;
use crate::subscription::Subscription;
use crate::view::health::{HealthPanel, HealthState, HealthTicket};
use crate::view::page::PageView;
use crate::view::panels::{AuthPanel, NotesPanel};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;

pub const MAGIC_LINK_NOTICE: &str = "Magic link sent. Check your inbox.";

/// Collaborators handed to the view at mount.
pub struct AppContext {
    pub history: Arc<dyn History>,
    pub api: Arc<dyn ApiClient>,
    /// `None` runs the view in mock mode.
    pub gateway: Option<Arc<dyn Gateway>>,
    pub public_message: Option<String>,
}

/// Work scheduled by one location change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub health: HealthTicket,
    pub load_notes: bool,
}

pub struct App {
    routes: RouteTable,
    paths: PathStore,
    api: Arc<dyn ApiClient>,
    gateway: Option<Arc<dyn Gateway>>,
    auth_changes: Option<Subscription<AuthChange>>,
    session: Option<Session>,
    backend: NotesBackend,
    public_message: Option<String>,
    build_stamp: DateTime<Utc>,
    health: HealthPanel,
    auth: AuthPanel,
    notes: NotesPanel,
}

impl App {
    /// Mounts the view without running the initial location effects.
    pub async fn mount_idle(context: AppContext) -> (Self, Transition) {
        let paths = PathStore::mount(context.history);
        let auth_changes = context
            .gateway
            .as_ref()
            .map(|gateway| gateway.on_auth_state_change());
        let session = match &context.gateway {
            Some(gateway) => gateway.get_session().await.unwrap_or_else(|err| {
                warn!("event=session_restore module=view status=error error={err}");
                None
            }),
            None => None,
        };
        let backend = NotesBackend::select(context.gateway.as_ref(), session.as_ref());
        info!(
            "event=view_mount module=view status=ok mode={} notes={}",
            if context.gateway.is_some() {
                "gateway"
            } else {
                "mock"
            },
            backend.mode()
        );

        let mut app = Self {
            routes: RouteTable::standard(),
            paths,
            api: context.api,
            gateway: context.gateway,
            auth_changes,
            session,
            backend,
            public_message: context.public_message,
            build_stamp: Utc::now(),
            health: HealthPanel::default(),
            auth: AuthPanel::default(),
            notes: NotesPanel::default(),
        };
        let initial = app.enter_location();
        (app, initial)
    }

    /// Mounts the view and settles the initial location.
    pub async fn mount(context: AppContext) -> Self {
        let (mut app, initial) = Self::mount_idle(context).await;
        app.settle(initial).await;
        app
    }

    pub fn path(&self) -> &str {
        self.paths.current()
    }

    pub fn route(&self) -> Option<&Route> {
        self.routes.match_path(self.paths.current())
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn notes_backend(&self) -> &NotesBackend {
        &self.backend
    }

    pub fn health(&self) -> &HealthState {
        self.health.state()
    }

    pub fn auth(&self) -> &AuthPanel {
        &self.auth
    }

    pub fn notes(&self) -> &NotesPanel {
        &self.notes
    }

    pub fn public_message(&self) -> Option<&str> {
        self.public_message.as_deref()
    }

    pub fn build_stamp(&self) -> DateTime<Utc> {
        self.build_stamp
    }

    /// Moves to `target`. `None` when it already is the location.
    pub fn navigate(&mut self, target: &str) -> Option<Transition> {
        self.paths
            .navigate(target)
            .then(|| self.enter_location())
    }

    /// Applies pending back/forward events from the history environment.
    pub fn sync_history(&mut self) -> Option<Transition> {
        self.paths
            .sync_from_history()
            .then(|| self.enter_location())
    }

    /// Runs the effects of one location change to completion.
    pub async fn settle(&mut self, transition: Transition) {
        let outcome = self.api.hello().await;
        self.health.complete(&transition.health, outcome);
        if transition.load_notes {
            self.load_notes().await;
        }
    }

    /// Navigates and settles. Returns whether the location changed.
    pub async fn go(&mut self, target: &str) -> bool {
        match self.navigate(target) {
            Some(transition) => {
                self.settle(transition).await;
                true
            }
            None => false,
        }
    }

    /// Syncs back/forward events and settles the resulting change.
    pub async fn follow_history(&mut self) -> bool {
        match self.sync_history() {
            Some(transition) => {
                self.settle(transition).await;
                true
            }
            None => false,
        }
    }

    /// Starts a health check for the current location by hand.
    pub fn begin_health_check(&mut self) -> HealthTicket {
        self.health.begin(self.paths.current())
    }

    /// Completes a health check; stale tickets are ignored.
    pub fn finish_health_check(
        &mut self,
        ticket: &HealthTicket,
        outcome: Result<HelloPayload, FetchError>,
    ) -> bool {
        self.health.complete(ticket, outcome)
    }

    /// Applies the newest pending gateway auth change, if any.
    pub async fn sync_auth(&mut self) -> bool {
        let latest = self.auth_changes.as_mut().and_then(Subscription::latest);
        match latest {
            Some(change) => self.set_session(change.session).await,
            None => false,
        }
    }

    /// Replaces the session and reselects the notes backend.
    ///
    /// Returns whether the session user changed.
    pub async fn set_session(&mut self, session: Option<Session>) -> bool {
        let previous = self.session.as_ref().map(|s| s.user_id().to_string());
        let next = session.as_ref().map(|s| s.user_id().to_string());
        self.session = session;
        self.backend = NotesBackend::select(self.gateway.as_ref(), self.session.as_ref());

        let changed = previous != next;
        if changed {
            info!(
                "event=session_change module=view status=ok signed_in={} notes={}",
                self.session.is_some(),
                self.backend.mode()
            );
            if self.path() == NOTES_PATH {
                self.load_notes().await;
            }
        }
        changed
    }

    pub fn set_note_title(&mut self, title: impl Into<String>) {
        self.notes.draft.title = title.into();
    }

    pub fn set_note_body(&mut self, body: impl Into<String>) {
        self.notes.draft.body = body.into();
    }

    pub fn can_submit_note(&self) -> bool {
        !self.notes.is_busy()
    }

    pub async fn load_notes(&mut self) -> bool {
        self.notes.error = None;
        let _busy = self.backend.is_remote().then(|| self.notes.busy.hold());
        match self.backend.load(&mut self.notes.items).await {
            Ok(()) => true,
            Err(err) => {
                self.record_notes_error("load", err);
                false
            }
        }
    }

    /// Adds `draft` through the active backend.
    pub async fn add_note(&mut self, draft: NoteDraft) -> bool {
        self.notes.error = None;
        let _busy = self.backend.is_remote().then(|| self.notes.busy.hold());
        match self.backend.add(&mut self.notes.items, &draft).await {
            Ok(()) => true,
            Err(err) => {
                self.record_notes_error("add", err);
                false
            }
        }
    }

    /// Submits the add form; the form is cleared only on success.
    pub async fn submit_note(&mut self) -> bool {
        if !self.can_submit_note() {
            return false;
        }
        let draft = self.notes.draft.clone();
        let added = self.add_note(draft).await;
        if added {
            self.notes.draft.clear();
        }
        added
    }

    pub async fn delete_note(&mut self, id: &str) -> bool {
        self.notes.error = None;
        let _busy = self.backend.is_remote().then(|| self.notes.busy.hold());
        match self.backend.delete(&mut self.notes.items, id).await {
            Ok(()) => true,
            Err(err) => {
                self.record_notes_error("delete", err);
                false
            }
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.auth.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.auth.password = password.into();
    }

    pub fn can_send_magic_link(&self) -> bool {
        self.gateway.is_some() && !self.auth.is_busy() && !self.auth.email.is_empty()
    }

    pub fn can_sign_in_with_password(&self) -> bool {
        self.can_send_magic_link() && !self.auth.password.is_empty()
    }

    pub fn can_sign_out(&self) -> bool {
        self.gateway.is_some() && !self.auth.is_busy() && self.session.is_some()
    }

    /// Requests a passwordless sign-in link for the form email.
    pub async fn send_magic_link(&mut self) -> bool {
        let Some(gateway) = self.gateway.clone() else {
            return false;
        };
        if !self.can_send_magic_link() {
            return false;
        }
        self.auth.clear_messages();
        let _busy = self.auth.busy.hold();
        match gateway.sign_in_with_otp(&self.auth.email).await {
            Ok(()) => {
                self.auth.notice = Some(MAGIC_LINK_NOTICE.to_string());
                true
            }
            Err(err) => {
                self.record_auth_error("otp", err);
                false
            }
        }
    }

    pub async fn sign_in_with_password(&mut self) -> bool {
        let Some(gateway) = self.gateway.clone() else {
            return false;
        };
        if !self.can_sign_in_with_password() {
            return false;
        }
        self.auth.clear_messages();
        let outcome = {
            let _busy = self.auth.busy.hold();
            gateway
                .sign_in_with_password(&self.auth.email, &self.auth.password)
                .await
        };
        let signed_in = match outcome {
            Ok(session) => {
                self.set_session(Some(session)).await;
                true
            }
            Err(err) => {
                self.record_auth_error("password", err);
                false
            }
        };
        self.sync_auth().await;
        signed_in
    }

    pub async fn sign_out(&mut self) -> bool {
        let Some(gateway) = self.gateway.clone() else {
            return false;
        };
        if !self.can_sign_out() {
            return false;
        }
        self.auth.clear_messages();
        let outcome = {
            let _busy = self.auth.busy.hold();
            gateway.sign_out().await
        };
        let signed_out = match outcome {
            Ok(()) => {
                self.set_session(None).await;
                true
            }
            Err(err) => {
                self.record_auth_error("sign_out", err);
                false
            }
        };
        self.sync_auth().await;
        signed_out
    }

    /// Renderable snapshot of the whole page.
    pub fn page(&self) -> PageView {
        PageView::build(self)
    }

    fn enter_location(&mut self) -> Transition {
        let health = self.health.begin(self.paths.current());
        Transition {
            health,
            load_notes: self.paths.current() == NOTES_PATH,
        }
    }

    fn record_notes_error(&mut self, operation: &str, err: GatewayError) {
        warn!("event=notes_{operation} module=view status=error error={err}");
        self.notes.error = Some(err.to_string());
    }

    fn record_auth_error(&mut self, operation: &str, err: GatewayError) {
        warn!("event=auth_{operation} module=view status=error error={err}");
        self.auth.error = Some(err.to_string());
    }
}
