//! Hosted gateway client over the Supabase REST surface.
//!
//! # Responsibility
//! - Map the [`Gateway`] contract onto `/auth/v1/*` and `/rest/v1/notes`.
//! - Keep the active session, optionally persisted to a [`SessionFile`], and
//!   broadcast auth changes.
//! - Refresh an expiring access token before table calls.
//!
//! # Invariants
//! - Every request carries the `apikey` header.
//! - Table requests carry the session bearer token; without a session they
//!   fail with [`GatewayError::NotSignedIn`] before any network call.
//! - Sign-out clears the local session even when the remote call fails.
//! - A refresh token the service rejects ends the session.

use super::session_file::SessionFile;
use super::{
    AuthChange, AuthEvent, Gateway, GatewayError, GatewayResult, NoteDeleteFilter, NoteInsert,
    NotesQuery, NOTES_COLUMNS, NOTES_TABLE,
};
use crate::config::GatewaySettings;
use crate::model::note::Note;
use crate::model::session::{Session, SessionUser};
use crate::subscription::{ListenerRegistry, Subscription};
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Mutex, MutexGuard};

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: SessionUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| Utc::now().timestamp() + secs));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

pub struct SupabaseGateway {
    settings: GatewaySettings,
    client: reqwest::Client,
    session: Mutex<Option<Session>>,
    session_file: Option<SessionFile>,
    auth_listeners: ListenerRegistry<AuthChange>,
}

impl SupabaseGateway {
    pub fn new(settings: GatewaySettings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    /// Restores a stored session when a session file is configured.
    pub fn with_client(settings: GatewaySettings, client: reqwest::Client) -> Self {
        let session_file = settings.session_file.clone().map(SessionFile::new);
        let session = session_file.as_ref().and_then(SessionFile::load);
        Self {
            settings,
            client,
            session: Mutex::new(session),
            session_file,
            auth_listeners: ListenerRegistry::new(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.settings.url)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{NOTES_TABLE}", self.settings.url)
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Access token for a table call, refreshed first when close to expiry.
    async fn access_token(&self) -> GatewayResult<String> {
        let session = self.lock_session().clone().ok_or(GatewayError::NotSignedIn)?;
        match &session.refresh_token {
            Some(refresh_token) if session.needs_refresh(Utc::now()) => {
                Ok(self.refresh(refresh_token).await?.access_token)
            }
            _ => Ok(session.access_token),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> GatewayResult<Session> {
        let request = self
            .with_api_key(self.client.post(self.auth_url("token")))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));
        let outcome = match send(request).await {
            Ok(response) => decode::<TokenResponse>(response).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(token) => {
                let session = token.into_session();
                self.replace_session(Some(session.clone()));
                info!("event=auth_refresh module=gateway status=ok");
                Ok(session)
            }
            Err(err) => {
                warn!("event=auth_refresh module=gateway status=error error={err}");
                if matches!(err, GatewayError::Rejected { .. }) {
                    self.replace_session(None);
                }
                Err(err)
            }
        }
    }

    fn replace_session(&self, session: Option<Session>) {
        let event = if session.is_some() {
            AuthEvent::SignedIn
        } else {
            AuthEvent::SignedOut
        };
        *self.lock_session() = session.clone();
        if let Some(file) = &self.session_file {
            if let Err(err) = file.store(session.as_ref()) {
                warn!("event=session_store module=gateway status=error error={err}");
            }
        }
        self.auth_listeners.emit(AuthChange { event, session });
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, self.settings.anon_key.as_str())
    }

    fn with_bearer(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        self.with_api_key(request)
            .header(AUTHORIZATION, format!("Bearer {token}"))
    }
}

#[async_trait]
impl Gateway for SupabaseGateway {
    async fn get_session(&self) -> GatewayResult<Option<Session>> {
        Ok(self.lock_session().clone())
    }

    fn on_auth_state_change(&self) -> Subscription<AuthChange> {
        self.auth_listeners.subscribe()
    }

    async fn sign_in_with_otp(&self, email: &str) -> GatewayResult<()> {
        let request = self
            .with_api_key(self.client.post(self.auth_url("otp")))
            .json(&json!({ "email": email, "create_user": true }));
        send(request).await?;
        info!("event=auth_otp module=gateway status=ok");
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> GatewayResult<Session> {
        let request = self
            .with_api_key(self.client.post(self.auth_url("token")))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let token: TokenResponse = decode(send(request).await?).await?;
        let session = token.into_session();
        self.replace_session(Some(session.clone()));
        info!("event=auth_password module=gateway status=ok");
        Ok(session)
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        let token = self.lock_session().as_ref().map(|s| s.access_token.clone());
        let outcome = match token {
            Some(token) => {
                let request = self.with_bearer(self.client.post(self.auth_url("logout")), &token);
                send(request).await.map(|_| ())
            }
            None => Ok(()),
        };
        if let Err(err) = &outcome {
            warn!("event=auth_sign_out module=gateway status=error error={err}");
        }
        self.replace_session(None);
        outcome
    }

    async fn select_notes(&self, query: &NotesQuery) -> GatewayResult<Vec<Note>> {
        let token = self.access_token().await?;
        let request = self
            .with_bearer(self.client.get(self.table_url()), &token)
            .query(&[
                ("select", NOTES_COLUMNS.to_string()),
                ("user_id", format!("eq.{}", query.owner_id)),
                ("order", format!("created_at.{}", query.created_at.as_str())),
            ]);
        decode(send(request).await?).await
    }

    async fn insert_note(&self, row: &NoteInsert) -> GatewayResult<()> {
        let token = self.access_token().await?;
        let request = self
            .with_bearer(self.client.post(self.table_url()), &token)
            .header(PREFER_HEADER, "return=minimal")
            .json(row);
        send(request).await?;
        Ok(())
    }

    async fn delete_note(&self, filter: &NoteDeleteFilter) -> GatewayResult<()> {
        let token = self.access_token().await?;
        let request = self
            .with_bearer(self.client.delete(self.table_url()), &token)
            .query(&[
                ("id", format!("eq.{}", filter.id)),
                ("user_id", format!("eq.{}", filter.owner_id)),
            ]);
        send(request).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> GatewayResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|err| GatewayError::Transport(err.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    response
        .json()
        .await
        .map_err(|err| GatewayError::Decode(err.to_string()))
}

/// Auth and table endpoints disagree on the error field name.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{error_message, SupabaseGateway};
    use crate::config::GatewaySettings;
    use crate::gateway::{Gateway, GatewayError, NotesQuery};

    fn gateway() -> SupabaseGateway {
        SupabaseGateway::new(GatewaySettings {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "anon".to_string(),
            session_file: None,
        })
    }

    #[test]
    fn error_message_reads_known_fields() {
        assert_eq!(error_message(r#"{"msg":"Invalid login"}"#), "Invalid login");
        assert_eq!(
            error_message(r#"{"message":"permission denied","code":"42501"}"#),
            "permission denied"
        );
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"bad creds"}"#),
            "bad creds"
        );
        assert_eq!(error_message("upstream timeout"), "upstream timeout");
        assert_eq!(error_message("{}"), "");
    }

    #[tokio::test]
    async fn table_calls_require_a_session() {
        let gateway = gateway();
        let err = gateway
            .select_notes(&NotesQuery::newest_first("u1"))
            .await
            .expect_err("no session");
        assert_eq!(err, GatewayError::NotSignedIn);
        assert!(gateway.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_out_without_session_still_broadcasts() {
        let gateway = gateway();
        let mut changes = gateway.on_auth_state_change();
        gateway.sign_out().await.expect("local sign-out");
        let change = changes.try_next().expect("auth change");
        assert!(change.session.is_none());
    }
}
