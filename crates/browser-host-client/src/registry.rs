//! Concurrency-safe tracking of active sessions by identifier.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use browser_host_core::SessionId;

use crate::session::Session;

/// The store of active session entries.
///
/// An identifier is present exactly while its session has reported created
/// and has not yet reported closed. Mutations are serialized behind one
/// lock; [`SessionRegistry::all`] returns a copy because callers iterate
/// while triggering further registry mutations (closing a session leads to
/// its untrack).
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<dyn Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a session under its identifier.
    pub fn track(&self, id: SessionId, session: Arc<dyn Session>) {
        self.sessions.write().unwrap().insert(id, session);
    }

    /// Remove an entry. Removing an absent identifier is a no-op.
    pub fn untrack(&self, id: SessionId) {
        self.sessions.write().unwrap().remove(&id);
    }

    /// Look up a session by identifier.
    pub fn get(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.sessions.read().unwrap().get(&id).cloned()
    }

    /// Point-in-time copy of every tracked session.
    pub fn all(&self) -> Vec<Arc<dyn Session>> {
        self.sessions.read().unwrap().values().cloned().collect()
    }

    /// Point-in-time copy of every tracked identifier.
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.read().unwrap().keys().copied().collect()
    }

    /// Whether no sessions are tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }

    /// Number of tracked sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
