//! Typed observer registration for host notifications
//!
//! The host editor delivers change notifications (session changed, active
//! document changed, document text changed, configuration changed) through
//! explicit subscriptions rather than a global event bus. An [`EventEmitter`]
//! hands out a [`Subscription`] guard per handler; dropping the guard
//! unregisters the handler.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    handlers: HashMap<u64, Handler<T>>,
}

/// Multi-subscriber event channel with unsubscribe-on-drop semantics
pub struct EventEmitter<T> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: HashMap::new(),
            })),
        }
    }

    /// Register a handler; the returned guard unregisters it when dropped
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let mut registry = self.inner.lock().expect("event registry poisoned");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.insert(id, Arc::new(handler));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every live handler, in registration order.
    ///
    /// Handlers run outside the registry lock, so a handler may subscribe or
    /// drop subscriptions (its own included) without deadlocking. A handler
    /// unsubscribed mid-delivery can still see the in-flight event.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<(u64, Handler<T>)> = {
            let registry = self.inner.lock().expect("event registry poisoned");
            let mut handlers: Vec<_> = registry
                .handlers
                .iter()
                .map(|(id, handler)| (*id, Arc::clone(handler)))
                .collect();
            handlers.sort_unstable_by_key(|(id, _)| *id);
            handlers
        };
        for (_, handler) in snapshot {
            handler(event);
        }
    }

    /// Number of live handlers
    pub fn handler_count(&self) -> usize {
        self.inner
            .lock()
            .expect("event registry poisoned")
            .handlers
            .len()
    }
}

/// Guard for a registered handler; dropping it unsubscribes
pub struct Subscription<T> {
    id: u64,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> Subscription<T> {
    /// Explicitly unregister the handler
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.lock() {
                registry.handlers.remove(&self.id);
            }
        }
    }
}
