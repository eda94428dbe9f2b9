//! Functions host configuration.
//!
//! # Invariants
//! - Loading never fails; invalid values are logged and replaced by defaults.

use tfactory_core::config::{load_or, process_env, read_var};
use tfactory_core::logging::default_log_level;
use tfactory_core::model::wire::Platform;

pub const ENV_PORT: &str = "TFACTORY_PORT";
pub const ENV_PLATFORM: &str = "TFACTORY_PLATFORM";
pub const ENV_LOG_LEVEL: &str = "TFACTORY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TFACTORY_LOG_DIR";

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_PLATFORM: Platform = Platform::Vercel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub platform: Platform,
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr when unset.
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: load_or(&lookup, ENV_PORT, DEFAULT_PORT),
            platform: load_or(&lookup, ENV_PLATFORM, DEFAULT_PLATFORM),
            log_level: read_var(&lookup, ENV_LOG_LEVEL)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read_var(&lookup, ENV_LOG_DIR),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
