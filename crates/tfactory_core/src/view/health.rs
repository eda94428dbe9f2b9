//! API health panel: `loading -> ok(payload) | error(message)`.

use crate::api::FetchError;
use crate::model::wire::HelloPayload;
use log::{debug, info, warn};

/// Observable panel state. Exactly one variant at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthState {
    Loading,
    Ok(HelloPayload),
    Error(String),
}

/// Identifies the location change a fetch was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthTicket {
    generation: u64,
    path: String,
}

impl HealthTicket {
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone)]
pub struct HealthPanel {
    state: HealthState,
    generation: u64,
}

impl Default for HealthPanel {
    fn default() -> Self {
        Self {
            state: HealthState::Loading,
            generation: 0,
        }
    }
}

impl HealthPanel {
    pub fn state(&self) -> &HealthState {
        &self.state
    }

    /// Re-enters `loading` and supersedes every earlier ticket.
    pub fn begin(&mut self, path: &str) -> HealthTicket {
        self.generation += 1;
        self.state = HealthState::Loading;
        HealthTicket {
            generation: self.generation,
            path: path.to_string(),
        }
    }

    /// Applies a fetch outcome unless its ticket was superseded.
    ///
    /// Returns whether the outcome was applied.
    pub fn complete(
        &mut self,
        ticket: &HealthTicket,
        outcome: Result<HelloPayload, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "event=health_stale module=view status=dropped generation={} current={}",
                ticket.generation, self.generation
            );
            return false;
        }

        self.state = match outcome {
            Ok(payload) => {
                info!(
                    "event=health_check module=view status=ok platform={}",
                    payload.platform
                );
                HealthState::Ok(payload)
            }
            Err(err) => {
                warn!("event=health_check module=view status=error error={err}");
                HealthState::Error(err.to_string())
            }
        };
        true
    }
}
