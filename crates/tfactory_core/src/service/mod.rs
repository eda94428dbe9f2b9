//! Notes use-case services.
//!
//! # Responsibility
//! - Run notes operations against the backend chosen for the session.
//! - Keep views decoupled from gateway query details.

pub mod notes_backend;
