//! Authenticated session as handed out by the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Access tokens this close to expiry are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Opaque to views beyond presence, user id and display email.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// Long-lived token exchanged for a new access token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token expiry as unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    pub fn user_id(&self) -> &str {
        self.user.id.as_str()
    }

    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }

    /// Whether the access token should be refreshed before the next call.
    ///
    /// Sessions without an expiry or a refresh token never need it.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.refresh_token.is_some()
            && self
                .expires_at
                .is_some_and(|at| at <= now.timestamp() + REFRESH_MARGIN_SECS)
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionUser};
    use chrono::{TimeZone, Utc};

    fn session(refresh_token: Option<&str>, expires_at: Option<i64>) -> Session {
        Session {
            access_token: "secret-jwt".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at,
            user: SessionUser {
                id: "u1".to_string(),
                email: Some("a@b.c".to_string()),
            },
        }
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let rendered = format!("{:?}", session(Some("secret-refresh"), None));
        assert!(!rendered.contains("secret-jwt"));
        assert!(!rendered.contains("secret-refresh"));
        assert!(rendered.contains("u1"));
    }

    #[test]
    fn refresh_is_needed_only_near_expiry_with_refresh_token() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let soon = now.timestamp() + 30;
        let later = now.timestamp() + 3600;

        assert!(session(Some("r"), Some(soon)).needs_refresh(now));
        assert!(!session(Some("r"), Some(later)).needs_refresh(now));
        assert!(!session(None, Some(soon)).needs_refresh(now));
        assert!(!session(Some("r"), None).needs_refresh(now));
    }

    #[test]
    fn sessions_without_token_metadata_still_decode() {
        let session: Session = serde_json::from_str(
            r#"{"access_token":"t","user":{"id":"u1"}}"#,
        )
        .expect("minimal session");
        assert_eq!(session.refresh_token, None);
        assert_eq!(session.email(), None);
    }
}
