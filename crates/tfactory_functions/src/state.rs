//! Shared router state.

use tfactory_core::config::FunctionsEnv;
use tfactory_core::model::wire::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionsState {
    /// Platform whose handlers answer under `/api/*`.
    pub platform: Platform,
    /// Presence flags read once at startup.
    pub env: FunctionsEnv,
}

impl FunctionsState {
    pub fn new(platform: Platform, env: FunctionsEnv) -> Self {
        Self { platform, env }
    }

    pub fn from_env(platform: Platform) -> Self {
        Self::new(platform, FunctionsEnv::from_env())
    }
}
