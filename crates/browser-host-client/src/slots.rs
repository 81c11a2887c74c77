//! Handler registration storage.
//!
//! Two shapes cover every category: [`HandlerSlot`] for the single-owner
//! categories and [`SubscriberList`] for lifecycle fan-out.

use std::sync::{Arc, Mutex, RwLock};

/// Single-owner registration point for one category's delegate.
///
/// First writer wins: registering into an occupied slot is a silent no-op
/// and the existing delegate stays active. Removal always empties the slot.
pub struct HandlerSlot<T: ?Sized> {
    inner: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> HandlerSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Register a delegate if the slot is empty.
    ///
    /// Returns true if the registration took effect, false if an earlier
    /// delegate was kept.
    pub fn register(&self, handler: Arc<T>) -> bool {
        let mut guard = self.inner.write().unwrap();
        if guard.is_none() {
            *guard = Some(handler);
            true
        } else {
            false
        }
    }

    /// Empty the slot, whatever it held.
    pub fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }

    /// The registered delegate, if any.
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.read().unwrap().clone()
    }

    /// Whether a delegate is registered.
    pub fn is_registered(&self) -> bool {
        self.inner.read().unwrap().is_some()
    }
}

impl<T: ?Sized> Default for HandlerSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered, multi-registration subscriber list for lifecycle events.
///
/// Delivery order is registration order. Duplicates are allowed; removal is
/// bulk-only. Iteration always happens over a snapshot so that a subscriber
/// may register or clear during delivery without corrupting the list.
pub struct SubscriberList<T: ?Sized> {
    inner: Mutex<Vec<Arc<T>>>,
}

impl<T: ?Sized> SubscriberList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Append a subscriber.
    pub fn add(&self, subscriber: Arc<T>) {
        self.inner.lock().unwrap().push(subscriber);
    }

    /// Remove every subscriber.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    /// Point-in-time copy of the subscriber list, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.inner.lock().unwrap().clone()
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

impl<T: ?Sized> Default for SubscriberList<T> {
    fn default() -> Self {
        Self::new()
    }
}
