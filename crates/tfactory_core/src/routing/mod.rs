//! Client-side routing.
//!
//! # Responsibility
//! - Hold the fixed route table and exact-match lookup.
//! - Track the current location against a history environment.
//!
//! # Invariants
//! - Route paths are unique and begin with `/`.
//! - The location changes only through navigation or back/forward events.

pub mod history;
pub mod path_store;
pub mod route_table;
