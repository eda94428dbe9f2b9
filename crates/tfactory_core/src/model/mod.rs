//! Domain and wire model shared by the client core and the functions.
//!
//! # Responsibility
//! - Define notes, sessions and the JSON payloads of the two endpoints.
//! - Keep serialized field names identical to the hosted services.
//!
//! # Invariants
//! - Wire payloads always carry `ok: true` when produced by a handler.
//! - Timestamps are serialized as ISO-8601 in UTC.

pub mod note;
pub mod session;
pub mod wire;
