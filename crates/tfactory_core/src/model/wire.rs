//! JSON payloads of `/api/hello` and `/api/notes`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Hint returned by the notes endpoint.
pub const NOTES_ENV_HINT: &str =
    "Set SUPABASE_SERVICE_ROLE_KEY + VITE_SUPABASE_URL to extend this to real server-side Supabase queries.";

/// Hosting platform a handler runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Node-based edge-function host.
    Vercel,
    /// Static-site host with embedded functions.
    Netlify,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vercel => "vercel",
            Self::Netlify => "netlify",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl Display for UnknownPlatform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform `{}`; expected vercel|netlify", self.0)
    }
}

impl Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vercel" => Ok(Self::Vercel),
            "netlify" => Ok(Self::Netlify),
            _ => Err(UnknownPlatform(value.to_string())),
        }
    }
}

/// Whether a secret environment value is configured. Never the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretPresence {
    Present,
    Missing,
}

impl SecretPresence {
    pub fn from_present(present: bool) -> Self {
        if present {
            Self::Present
        } else {
            Self::Missing
        }
    }
}

/// Body of `GET /api/hello`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    pub ok: bool,
    pub platform: String,
    pub route: String,
    pub secret_token: SecretPresence,
    pub now: String,
}

/// Environment presence flags reported by `GET /api/notes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvPresence {
    #[serde(rename = "VITE_SUPABASE_URL_present")]
    pub supabase_url_present: bool,
    #[serde(rename = "SUPABASE_SERVICE_ROLE_KEY_present")]
    pub service_role_key_present: bool,
}

/// Body of `GET /api/notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesEnvPayload {
    pub ok: bool,
    pub platform: String,
    pub hint: String,
    pub env: EnvPresence,
    pub now: String,
}

/// Millisecond-precision UTC timestamp, `2024-01-01T00:00:00.000Z` shape.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
