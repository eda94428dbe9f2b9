//! Current-location store synchronized with a history environment.
//!
//! # Invariants
//! - `navigate` to the current location is a no-op: no history entry, no
//!   change reported.
//! - `navigate` never pushes the path the environment already shows, even
//!   when a back/forward event has not been synced yet.
//! - The back/forward subscription lives exactly as long as the store.

use crate::routing::history::{History, PopState};
use crate::subscription::Subscription;
use log::debug;
use std::sync::Arc;

pub struct PathStore {
    history: Arc<dyn History>,
    current: String,
    pop_events: Subscription<PopState>,
}

impl PathStore {
    /// Reads the initial location and subscribes to back/forward events.
    pub fn mount(history: Arc<dyn History>) -> Self {
        let pop_events = history.subscribe_pop();
        let current = history.current_path();
        Self {
            history,
            current,
            pop_events,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Makes `target` current, pushing an entry unless the environment is
    /// already there. Returns whether the stored location changed.
    pub fn navigate(&mut self, target: &str) -> bool {
        if target != self.history.current_path() {
            self.history.push(target);
        }
        if target == self.current {
            return false;
        }
        self.current = target.to_string();
        debug!("event=navigate module=routing status=ok");
        true
    }

    /// Applies pending back/forward notifications.
    ///
    /// Returns whether the location changed as a result.
    pub fn sync_from_history(&mut self) -> bool {
        if self.pop_events.latest().is_none() {
            return false;
        }
        let path = self.history.current_path();
        if path == self.current {
            return false;
        }
        self.current = path;
        debug!("event=popstate module=routing status=ok");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::PathStore;
    use crate::routing::history::{History, MemoryHistory};
    use std::sync::Arc;

    #[test]
    fn navigate_to_current_path_is_a_noop() {
        let history = Arc::new(MemoryHistory::new("/about"));
        let mut store = PathStore::mount(history.clone());

        assert!(!store.navigate("/about"));
        assert_eq!(history.len(), 1);
        assert_eq!(store.current(), "/about");
    }

    #[test]
    fn navigate_pushes_a_new_entry() {
        let history = Arc::new(MemoryHistory::new("/"));
        let mut store = PathStore::mount(history.clone());

        assert!(store.navigate("/notes"));
        assert_eq!(store.current(), "/notes");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn back_event_rereads_environment_path() {
        let history = Arc::new(MemoryHistory::new("/"));
        let mut store = PathStore::mount(history.clone());
        store.navigate("/about");
        store.navigate("/settings");

        assert!(!store.sync_from_history());
        history.back();
        history.back();
        assert!(store.sync_from_history());
        assert_eq!(store.current(), "/");
    }

    #[test]
    fn navigate_after_unsynced_back_does_not_duplicate_entry() {
        let history = Arc::new(MemoryHistory::new("/"));
        let mut store = PathStore::mount(history.clone());
        store.navigate("/about");
        history.back();

        assert!(store.navigate("/"));
        assert_eq!(store.current(), "/");
        assert_eq!(history.len(), 2);
        assert_eq!(history.current_path(), "/");
        assert!(!store.sync_from_history());
    }

    #[test]
    fn dropping_store_releases_subscription() {
        let history = Arc::new(MemoryHistory::new("/"));
        let store = PathStore::mount(history.clone());
        assert_eq!(history.listener_count(), 1);
        drop(store);
        assert_eq!(history.listener_count(), 0);
    }
}
