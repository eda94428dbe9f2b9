//! View layer: transient UI state reconciled against the location.
//!
//! # Responsibility
//! - Own form inputs, busy flags and display-only error strings.
//! - Re-run the health check on every location change and load notes on
//!   the notes route.
//! - Produce a renderable [`page::PageView`] snapshot.
//!
//! # Invariants
//! - Failures are stored per panel (api, auth, notes) and never cross panels.
//! - A stale health result never overwrites a newer one.

pub mod app;
pub mod busy;
pub mod health;
pub mod page;
pub mod panels;
