#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tfactory_core::view::busy::BusyFlag;
use tfactory_core::{
    ApiClient, App, AppContext, AuthChange, AuthEvent, FetchError, Gateway, GatewayError,
    GatewayResult, HelloPayload, ListenerRegistry, MemoryHistory, Note, NoteDeleteFilter,
    NoteInsert, NotesQuery, SecretPresence, Session, SessionUser, SortOrder, Subscription,
};

pub fn hello(route: &str) -> HelloPayload {
    HelloPayload {
        ok: true,
        platform: "vercel".to_string(),
        route: route.to_string(),
        secret_token: SecretPresence::Present,
        now: "2025-06-01T10:00:00.000Z".to_string(),
    }
}

/// API client answering every call with the same outcome.
pub struct StubApi {
    outcome: Result<HelloPayload, FetchError>,
    calls: AtomicUsize,
}

impl StubApi {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(hello("/api/hello")),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(FetchError::Transport(message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiClient for StubApi {
    async fn hello(&self) -> Result<HelloPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub fn session(user_id: &str, email: &str) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        refresh_token: None,
        expires_at: None,
        user: SessionUser {
            id: user_id.to_string(),
            email: Some(email.to_string()),
        },
    }
}

struct StoredRow {
    owner_id: String,
    note: Note,
}

/// In-memory gateway with failure injection and busy-flag sampling.
#[derive(Default)]
pub struct FakeGateway {
    rows: Mutex<Vec<StoredRow>>,
    session: Mutex<Option<Session>>,
    listeners: ListenerRegistry<AuthChange>,
    next_id: AtomicUsize,
    fail_next: Mutex<Option<GatewayError>>,
    watched: Mutex<Option<BusyFlag>>,
    busy_samples: Mutex<Vec<bool>>,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn signed_in(user_id: &str, email: &str) -> Arc<Self> {
        let gateway = Self::default();
        *gateway.session.lock().unwrap() = Some(session(user_id, email));
        Arc::new(gateway)
    }

    /// Seeds a row; `minutes` orders rows by creation time.
    pub fn seed(&self, owner_id: &str, title: &str, minutes: i64) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 100;
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        self.rows.lock().unwrap().push(StoredRow {
            owner_id: owner_id.to_string(),
            note: Note {
                id: id.to_string(),
                title: title.to_string(),
                body: String::new(),
                created_at: base + Duration::minutes(minutes),
            },
        });
    }

    pub fn fail_next(&self, err: GatewayError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn watch(&self, flag: BusyFlag) {
        *self.watched.lock().unwrap() = Some(flag);
    }

    pub fn busy_samples(&self) -> Vec<bool> {
        self.busy_samples.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Simulates an auth change pushed by the hosted service.
    pub fn push_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session.clone();
        let event = if session.is_some() {
            AuthEvent::SignedIn
        } else {
            AuthEvent::SignedOut
        };
        self.listeners.emit(AuthChange { event, session });
    }

    fn enter(&self, call: &str) -> GatewayResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if let Some(flag) = self.watched.lock().unwrap().as_ref() {
            self.busy_samples.lock().unwrap().push(flag.is_busy());
        }
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_created_at(&self) -> chrono::DateTime<Utc> {
        let n = self.next_id.load(Ordering::SeqCst) as i64;
        Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap() + Duration::minutes(n)
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn get_session(&self) -> GatewayResult<Option<Session>> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn on_auth_state_change(&self) -> Subscription<AuthChange> {
        self.listeners.subscribe()
    }

    async fn sign_in_with_otp(&self, _email: &str) -> GatewayResult<()> {
        self.enter("otp")
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> GatewayResult<Session> {
        self.enter("password")?;
        let signed_in = session("user-pw", email);
        self.push_session(Some(signed_in.clone()));
        Ok(signed_in)
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        self.enter("sign_out")?;
        self.push_session(None);
        Ok(())
    }

    async fn select_notes(&self, query: &NotesQuery) -> GatewayResult<Vec<Note>> {
        self.enter("select")?;
        let mut notes: Vec<Note> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.owner_id == query.owner_id)
            .map(|row| row.note.clone())
            .collect();
        notes.sort_by_key(|note| note.created_at);
        if query.created_at == SortOrder::Descending {
            notes.reverse();
        }
        Ok(notes)
    }

    async fn insert_note(&self, row: &NoteInsert) -> GatewayResult<()> {
        self.enter("insert")?;
        let created_at = self.next_created_at();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 100;
        self.rows.lock().unwrap().push(StoredRow {
            owner_id: row.user_id.clone(),
            note: Note {
                id: id.to_string(),
                title: row.title.clone(),
                body: row.body.clone(),
                created_at,
            },
        });
        Ok(())
    }

    async fn delete_note(&self, filter: &NoteDeleteFilter) -> GatewayResult<()> {
        self.enter("delete")?;
        self.rows
            .lock()
            .unwrap()
            .retain(|row| !(row.note.id == filter.id && row.owner_id == filter.owner_id));
        Ok(())
    }
}

pub async fn mount_at(
    path: &str,
    api: Arc<StubApi>,
    gateway: Option<Arc<FakeGateway>>,
) -> (App, Arc<MemoryHistory>) {
    let history = Arc::new(MemoryHistory::new(path));
    let app = App::mount(AppContext {
        history: history.clone(),
        api,
        gateway: gateway.map(|gateway| gateway as Arc<dyn Gateway>),
        public_message: Some("hello from build".to_string()),
    })
    .await;
    (app, history)
}
