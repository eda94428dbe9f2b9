//! Renderable page snapshot.

use crate::api::HELLO_ENDPOINT;
use crate::model::note::{Note, NoteDraft};
use crate::model::wire::iso_timestamp;
use crate::routing::route_table::{ABOUT_PATH, NOTES_PATH, SETTINGS_PATH};
use crate::view::app::App;
use crate::view::health::HealthState;
use std::fmt::{Display, Formatter};

const BRAND_TITLE: &str = "Template Factory";
const BRAND_SUBTITLE: &str = "Build + SPA + API + Auth/DB";
const NOT_SET: &str = "(not set)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub title: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub gateway_ready: bool,
    pub email: String,
    pub session_email: Option<String>,
    pub signed_in: bool,
    pub can_send_magic_link: bool,
    pub can_sign_in_with_password: bool,
    pub can_sign_out: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesView {
    pub notes: Vec<Note>,
    pub draft: NoteDraft,
    pub busy: bool,
    pub error: Option<String>,
}

/// Page-specific section below the cards. Home has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePanel {
    About,
    Settings(SettingsView),
    Notes(NotesView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub nav: Vec<NavItem>,
    pub gateway_ready: bool,
    pub signed_in: bool,
    /// Raw current location, shown even when no route matches.
    pub path: String,
    pub route_title: Option<&'static str>,
    pub health: HealthState,
    pub public_message: Option<String>,
    pub panel: Option<PagePanel>,
    pub build_stamp: String,
}

impl PageView {
    pub(crate) fn build(app: &App) -> Self {
        let path = app.path().to_string();
        let nav = app
            .routes()
            .routes()
            .iter()
            .map(|route| NavItem {
                path: route.path,
                title: route.title,
                active: route.path == path,
            })
            .collect();

        let panel = match path.as_str() {
            ABOUT_PATH => Some(PagePanel::About),
            SETTINGS_PATH => Some(PagePanel::Settings(SettingsView {
                gateway_ready: app.has_gateway(),
                email: app.auth().email.clone(),
                session_email: app
                    .session()
                    .and_then(|session| session.email())
                    .map(str::to_string),
                signed_in: app.session().is_some(),
                can_send_magic_link: app.can_send_magic_link(),
                can_sign_in_with_password: app.can_sign_in_with_password(),
                can_sign_out: app.can_sign_out(),
                error: app.auth().error.clone(),
                notice: app.auth().notice.clone(),
            })),
            NOTES_PATH => Some(PagePanel::Notes(NotesView {
                notes: app.notes().items.clone(),
                draft: app.notes().draft.clone(),
                busy: app.notes().is_busy(),
                error: app.notes().error.clone(),
            })),
            _ => None,
        };

        Self {
            nav,
            gateway_ready: app.has_gateway(),
            signed_in: app.session().is_some(),
            route_title: app.route().map(|route| route.title),
            path,
            health: app.health().clone(),
            public_message: app.public_message().map(str::to_string),
            panel,
            build_stamp: iso_timestamp(app.build_stamp()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.route_title.is_some()
    }
}

impl Display for PageView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{BRAND_TITLE} | {BRAND_SUBTITLE}")?;
        let nav = self
            .nav
            .iter()
            .map(|item| {
                if item.active {
                    format!("[{}]", item.title)
                } else {
                    item.title.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(f, "{nav}")?;
        writeln!(
            f,
            "({}) ({})",
            if self.gateway_ready {
                "gateway ready"
            } else {
                "mock mode"
            },
            if self.signed_in {
                "signed in"
            } else {
                "signed out"
            }
        )?;

        writeln!(f)?;
        writeln!(f, "== SPA routing")?;
        if self.is_recognized() {
            writeln!(f, "Current route: {}", self.path)?;
        } else {
            writeln!(f, "Current route: {} (unrecognized)", self.path)?;
        }

        writeln!(f)?;
        writeln!(f, "== API")?;
        match &self.health {
            HealthState::Loading => writeln!(f, "Loading {HELLO_ENDPOINT}...")?,
            HealthState::Ok(payload) => {
                writeln!(f, "OK: API responds.")?;
                let pretty = serde_json::to_string_pretty(payload).map_err(|_| std::fmt::Error)?;
                writeln!(f, "{pretty}")?;
            }
            HealthState::Error(message) => {
                writeln!(f, "API error: {message}")?;
                writeln!(f, "Typical cause: a rewrite fallback swallows /api.")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "== Env")?;
        writeln!(
            f,
            "VITE_PUBLIC_MESSAGE = {}",
            self.public_message.as_deref().unwrap_or(NOT_SET)
        )?;

        if let Some(panel) = &self.panel {
            writeln!(f)?;
            write_panel(f, panel)?;
        }

        writeln!(f)?;
        write!(
            f,
            "Build: {} | Assets: /assets/* | API: {HELLO_ENDPOINT}",
            self.build_stamp
        )
    }
}

fn write_panel(f: &mut Formatter<'_>, panel: &PagePanel) -> std::fmt::Result {
    match panel {
        PagePanel::About => {
            writeln!(f, "== About")?;
            writeln!(
                f,
                "Production-like: build, routing, API, optional auth/DB, assets and cache headers."
            )
        }
        PagePanel::Settings(settings) => {
            writeln!(f, "== Settings")?;
            if !settings.gateway_ready {
                writeln!(f, "Auth is disabled without gateway env values (mock mode).")?;
            }
            writeln!(
                f,
                "Email: {}",
                if settings.email.is_empty() {
                    NOT_SET
                } else {
                    settings.email.as_str()
                }
            )?;
            writeln!(
                f,
                "Actions: magic link [{}]  password [{}]  logout [{}]",
                enabled(settings.can_send_magic_link),
                enabled(settings.can_sign_in_with_password),
                enabled(settings.can_sign_out)
            )?;
            match (&settings.session_email, settings.signed_in) {
                (Some(email), true) => writeln!(f, "Session: {email}")?,
                (None, true) => writeln!(f, "Session: signed in")?,
                _ => writeln!(f, "Session: not signed in.")?,
            }
            if let Some(notice) = &settings.notice {
                writeln!(f, "{notice}")?;
            }
            if let Some(error) = &settings.error {
                writeln!(f, "Auth error: {error}")?;
            }
            Ok(())
        }
        PagePanel::Notes(notes) => {
            writeln!(f, "== Notes{}", if notes.busy { " (busy)" } else { "" })?;
            if let Some(error) = &notes.error {
                writeln!(f, "Notes error: {error}")?;
            }
            if notes.notes.is_empty() {
                writeln!(f, "No notes.")?;
            }
            for note in &notes.notes {
                writeln!(f, "- {} [{}]", note.title, note.id)?;
                if !note.body.is_empty() {
                    writeln!(f, "  {}", note.body)?;
                }
                writeln!(f, "  {}", iso_timestamp(note.created_at))?;
            }
            Ok(())
        }
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
