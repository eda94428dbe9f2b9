//! History environment contract and an in-memory implementation.

use crate::subscription::{ListenerRegistry, Subscription};
use std::sync::{Mutex, MutexGuard};

/// Back/forward notification. Carries no state; listeners re-read the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopState;

/// Browser-history-like environment the path store runs against.
pub trait History: Send + Sync {
    /// Path of the active history entry.
    fn current_path(&self) -> String;
    /// Pushes a new entry; never fires a pop notification.
    fn push(&self, path: &str);
    /// Registers for back/forward notifications.
    fn subscribe_pop(&self) -> Subscription<PopState>;
}

struct Entries {
    stack: Vec<String>,
    index: usize,
}

/// Session history kept in memory, with browser push/back/forward rules.
pub struct MemoryHistory {
    entries: Mutex<Entries>,
    pop_listeners: ListenerRegistry<PopState>,
}

impl MemoryHistory {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![initial_path.into()],
                index: 0,
            }),
            pop_listeners: ListenerRegistry::new(),
        }
    }

    /// Moves one entry back; returns `false` at the oldest entry.
    pub fn back(&self) -> bool {
        let moved = {
            let mut entries = self.lock();
            if entries.index == 0 {
                false
            } else {
                entries.index -= 1;
                true
            }
        };
        if moved {
            self.pop_listeners.emit(PopState);
        }
        moved
    }

    /// Moves one entry forward; returns `false` at the newest entry.
    pub fn forward(&self) -> bool {
        let moved = {
            let mut entries = self.lock();
            if entries.index + 1 >= entries.stack.len() {
                false
            } else {
                entries.index += 1;
                true
            }
        };
        if moved {
            self.pop_listeners.emit(PopState);
        }
        moved
    }

    /// Number of entries retained, including forward entries.
    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().stack.is_empty()
    }

    /// Number of live back/forward listeners.
    pub fn listener_count(&self) -> usize {
        self.pop_listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        let entries = self.lock();
        entries.stack[entries.index].clone()
    }

    fn push(&self, path: &str) {
        let mut entries = self.lock();
        let keep = entries.index + 1;
        entries.stack.truncate(keep);
        entries.stack.push(path.to_string());
        entries.index = keep;
    }

    fn subscribe_pop(&self) -> Subscription<PopState> {
        self.pop_listeners.subscribe()
    }
}
