//! Environment-driven configuration.
//!
//! # Responsibility
//! - Decide at startup whether the gateway capability exists.
//! - Report environment presence to the serverless handlers.
//!
//! # Invariants
//! - Loading never panics; unset or invalid values fall back to defaults.
//! - Empty or whitespace-only values count as unset.
//! - Secret values are never logged, only their presence.

use log::{info, warn};
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_SUPABASE_URL: &str = "VITE_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "VITE_SUPABASE_ANON_KEY";
pub const ENV_PUBLIC_MESSAGE: &str = "VITE_PUBLIC_MESSAGE";
pub const ENV_API_BASE: &str = "TFACTORY_API_BASE";
pub const ENV_SECRET_TOKEN: &str = "SECRET_TOKEN";
pub const ENV_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const ENV_SESSION_FILE: &str = "TFACTORY_SESSION_FILE";

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8787";

/// Connection values for the hosted gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub url: String,
    pub anon_key: String,
    /// Where the signed-in session is kept between runs; memory only when unset.
    pub session_file: Option<PathBuf>,
}

impl Debug for GatewaySettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("session_file", &self.session_file)
            .finish()
    }
}

/// Client-side configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `Some` only when both the URL and the anonymous key are set.
    pub gateway: Option<GatewaySettings>,
    /// Build-time message shown verbatim in the env card.
    pub public_message: Option<String>,
    /// Origin the `/api/*` endpoints are fetched from.
    pub api_base: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = read_var(&lookup, ENV_SUPABASE_URL);
        let anon_key = read_var(&lookup, ENV_SUPABASE_ANON_KEY);
        let gateway = match (url, anon_key) {
            (Some(url), Some(anon_key)) => Some(GatewaySettings {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
                session_file: read_var(&lookup, ENV_SESSION_FILE).map(PathBuf::from),
            }),
            _ => None,
        };
        info!(
            "event=config_load module=config status=ok gateway={}",
            if gateway.is_some() {
                "configured"
            } else {
                "absent"
            }
        );

        Self {
            gateway,
            public_message: read_var(&lookup, ENV_PUBLIC_MESSAGE),
            api_base: read_var(&lookup, ENV_API_BASE)
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }
}

/// Presence flags consumed by the serverless handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionsEnv {
    pub secret_token_present: bool,
    pub supabase_url_present: bool,
    pub service_role_key_present: bool,
}

impl FunctionsEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            secret_token_present: read_var(&lookup, ENV_SECRET_TOKEN).is_some(),
            supabase_url_present: read_var(&lookup, ENV_SUPABASE_URL).is_some(),
            service_role_key_present: read_var(&lookup, ENV_SERVICE_ROLE_KEY).is_some(),
        }
    }
}

/// Process environment lookup.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Reads one value; empty or whitespace-only counts as unset.
pub fn read_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses one value, falling back to `default` when unset or invalid.
pub fn load_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match read_var(lookup, key) {
        None => {
            info!("event=config_default module=config key={key} value={default}");
            default
        }
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            warn!("event=config_invalid module=config status=error key={key} error={err}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_or, AppConfig, FunctionsEnv, DEFAULT_API_BASE};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn gateway_requires_both_url_and_key() {
        let only_url = AppConfig::from_lookup(lookup_from(&[(
            "VITE_SUPABASE_URL",
            "https://x.supabase.co",
        )]));
        assert!(only_url.gateway.is_none());

        let blank_key = AppConfig::from_lookup(lookup_from(&[
            ("VITE_SUPABASE_URL", "https://x.supabase.co"),
            ("VITE_SUPABASE_ANON_KEY", "   "),
        ]));
        assert!(blank_key.gateway.is_none());

        let both = AppConfig::from_lookup(lookup_from(&[
            ("VITE_SUPABASE_URL", "https://x.supabase.co/"),
            ("VITE_SUPABASE_ANON_KEY", "anon-key-value"),
        ]));
        let settings = both.gateway.expect("gateway settings");
        assert_eq!(settings.url, "https://x.supabase.co");
        assert_eq!(settings.session_file, None);
        assert!(!format!("{settings:?}").contains("anon-key-value"));
    }

    #[test]
    fn session_file_is_read_with_gateway_settings() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("VITE_SUPABASE_URL", "https://x.supabase.co"),
            ("VITE_SUPABASE_ANON_KEY", "anon"),
            ("TFACTORY_SESSION_FILE", "/tmp/tfactory/session.json"),
        ]));
        let settings = config.gateway.expect("gateway settings");
        assert_eq!(
            settings.session_file.as_deref(),
            Some(std::path::Path::new("/tmp/tfactory/session.json"))
        );
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.public_message, None);
    }

    #[test]
    fn functions_env_reports_presence_only() {
        let env = FunctionsEnv::from_lookup(lookup_from(&[
            ("SECRET_TOKEN", "s3cret"),
            ("SUPABASE_SERVICE_ROLE_KEY", ""),
        ]));
        assert!(env.secret_token_present);
        assert!(!env.supabase_url_present);
        assert!(!env.service_role_key_present);
    }

    #[test]
    fn load_or_falls_back_on_invalid_values() {
        let lookup = lookup_from(&[("PORT", "not-a-port")]);
        assert_eq!(load_or(&lookup, "PORT", 8787u16), 8787);
        let lookup = lookup_from(&[("PORT", "9000")]);
        assert_eq!(load_or(&lookup, "PORT", 8787u16), 9000);
    }
}
