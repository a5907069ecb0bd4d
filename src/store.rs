//! Process-wide holder of the current [`AuthState`].
//!
//! SYSTEM CONTEXT
//! ==============
//! Created once at application start (`loading = true`, no session) and
//! handed explicitly to the gateway (the only writer) and to route guards
//! (readers). Clones share the same underlying state.
//!
//! Writes are serialized: each `set` finishes notifying before the next one
//! starts, so subscribers observe states in write order. A listener may read
//! the store but must not call `set` from inside a notification.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, Mutex};

use crate::listeners::{ListenerSet, Subscription, lock};
use crate::session::AuthState;

/// Reactive auth-state container with change notification.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<AuthState>>,
    writer: Arc<Mutex<()>>,
    listeners: Arc<ListenerSet<AuthState>>,
}

impl SessionStore {
    /// Store in the startup state: no session, bootstrap pending.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AuthState::bootstrapping())
    }

    #[must_use]
    pub fn with_state(state: AuthState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            writer: Arc::new(Mutex::new(())),
            listeners: Arc::new(ListenerSet::new()),
        }
    }

    /// Current state snapshot. Never blocks on in-flight auth operations.
    #[must_use]
    pub fn get(&self) -> AuthState {
        lock(&self.state).clone()
    }

    /// Replace the state wholesale and notify every subscriber.
    pub fn set(&self, next: AuthState) {
        let _writing = lock(&self.writer);
        *lock(&self.state) = next.clone();
        self.listeners.emit(&next);
    }

    /// Register a listener invoked with the new state on every `set`.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
