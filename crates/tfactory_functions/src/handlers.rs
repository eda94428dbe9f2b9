//! Platform-neutral bodies of the serverless endpoints.
//!
//! # Invariants
//! - Handlers only report presence of secrets, never their values.
//! - `now` is rendered as ISO-8601 UTC with millisecond precision.
//! - The notes endpoint performs no data access.

use chrono::{DateTime, Utc};
use tfactory_core::config::FunctionsEnv;
use tfactory_core::model::wire::{
    iso_timestamp, EnvPresence, HelloPayload, NotesEnvPayload, Platform, SecretPresence,
    NOTES_ENV_HINT,
};

/// Cache policy of the hello endpoint. The notes endpoint sends none.
pub const HELLO_CACHE_CONTROL: &str = "public, max-age=10";

pub fn hello(
    platform: Platform,
    route: &str,
    env: &FunctionsEnv,
    now: DateTime<Utc>,
) -> HelloPayload {
    HelloPayload {
        ok: true,
        platform: platform.as_str().to_string(),
        route: route.to_string(),
        secret_token: SecretPresence::from_present(env.secret_token_present),
        now: iso_timestamp(now),
    }
}

pub fn notes_env(platform: Platform, env: &FunctionsEnv, now: DateTime<Utc>) -> NotesEnvPayload {
    NotesEnvPayload {
        ok: true,
        platform: platform.as_str().to_string(),
        hint: NOTES_ENV_HINT.to_string(),
        env: EnvPresence {
            supabase_url_present: env.supabase_url_present,
            service_role_key_present: env.service_role_key_present,
        },
        now: iso_timestamp(now),
    }
}
