//! Scoped listener registrations.
//!
//! # Responsibility
//! - Fan out environment notifications (back/forward, auth changes) to
//!   every live subscriber.
//! - Tie each registration to the lifetime of a [`Subscription`] handle.
//!
//! # Invariants
//! - Dropping a `Subscription` deregisters it; no further values are queued
//!   for it.
//! - Emitting never blocks and never fails; closed receivers are pruned.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

struct RegistryInner<T> {
    next_id: u64,
    senders: BTreeMap<u64, UnboundedSender<T>>,
}

/// Shared registry of listeners for one notification kind.
pub struct ListenerRegistry<T> {
    inner: Arc<Mutex<RegistryInner<T>>>,
}

impl<T> Clone for ListenerRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                next_id: 0,
                senders: BTreeMap::new(),
            })),
        }
    }
}

impl<T: Clone> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one listener; it stays registered until the handle drops.
    pub fn subscribe(&self) -> Subscription<T> {
        let (sender, receiver) = unbounded_channel();
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.senders.insert(id, sender);

        Subscription {
            id,
            receiver,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers `value` to every live listener and returns how many got it.
    pub fn emit(&self, value: T) -> usize {
        let mut inner = lock(&self.inner);
        inner
            .senders
            .retain(|_, sender| sender.send(value.clone()).is_ok());
        inner.senders.len()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        lock(&self.inner).senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration handle returned by [`ListenerRegistry::subscribe`].
pub struct Subscription<T> {
    id: u64,
    receiver: UnboundedReceiver<T>,
    registry: Weak<Mutex<RegistryInner<T>>>,
}

impl<T> Subscription<T> {
    /// Returns the next queued value without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Drains the queue and returns only the most recent value.
    pub fn latest(&mut self) -> Option<T> {
        let mut last = None;
        while let Some(value) = self.try_next() {
            last = Some(value);
        }
        last
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            lock(&inner).senders.remove(&self.id);
        }
    }
}

fn lock<T>(inner: &Mutex<RegistryInner<T>>) -> MutexGuard<'_, RegistryInner<T>> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::ListenerRegistry;

    #[test]
    fn emit_reaches_every_live_subscriber() {
        let registry = ListenerRegistry::new();
        let mut first = registry.subscribe();
        let mut second = registry.subscribe();

        assert_eq!(registry.emit("popstate".to_string()), 2);
        assert_eq!(first.try_next().as_deref(), Some("popstate"));
        assert_eq!(second.try_next().as_deref(), Some("popstate"));
        assert!(first.try_next().is_none());
    }

    #[test]
    fn dropping_subscription_deregisters_it() {
        let registry = ListenerRegistry::<u32>::new();
        let kept = registry.subscribe();
        {
            let _scoped = registry.subscribe();
            assert_eq!(registry.len(), 2);
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.emit(7), 1);
        drop(kept);
        assert!(registry.is_empty());
    }

    #[test]
    fn latest_keeps_only_last_value() {
        let registry = ListenerRegistry::new();
        let mut sub = registry.subscribe();
        registry.emit(1);
        registry.emit(2);
        registry.emit(3);
        assert_eq!(sub.latest(), Some(3));
        assert_eq!(sub.latest(), None);
    }
}
