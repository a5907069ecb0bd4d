//! Auth gateway: the only writer of [`SessionStore`].
//!
//! ARCHITECTURE
//! ============
//! Wraps an [`IdentityProvider`]: bootstraps any existing session, performs
//! login / signup / logout, and mirrors provider change events into the
//! store. The change subscription is opened in [`AuthGateway::new`], before
//! bootstrap can run, and released once by [`AuthGateway::shutdown`] or drop.
//!
//! ORDERING
//! ========
//! Every operation and every provider event takes a ticket from a monotonic
//! counter when it is issued. Only writes that change the session claim
//! their ticket as the newest committed one: a successful login or signup,
//! a logout (claimed when it is issued) and provider events. A result is
//! written only if no newer ticket has been committed since it was issued,
//! so a slow login can not resurrect a session after a later logout, while a
//! failed login or a pending signup never cancels anything.
//!
//! `loading` is cleared by a committed write, or by the last outstanding
//! operation when it finishes without one. The ticket check and the store
//! write happen under a single lock; store listeners run inside it and must
//! not call back into the gateway's provider.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::sync::{Arc, Mutex};

use crate::error::AuthError;
use crate::listeners::{Subscription, lock};
use crate::provider::{IdentityProvider, SessionEvent};
use crate::session::{AuthState, Credentials, Session, SignupRequest};
use crate::store::SessionStore;

/// Ticket bookkeeping shared with the change-event listener.
#[derive(Debug, Default)]
struct Sequencer {
    /// Last ticket handed out.
    issued: u64,
    /// Ticket of the newest session-changing write.
    committed: u64,
    /// Bootstrap, login and signup calls still waiting on the provider.
    in_flight: usize,
}

impl Sequencer {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Issue a ticket and mark it committed immediately.
    fn claim(&mut self) -> u64 {
        let ticket = self.issue();
        self.committed = ticket;
        ticket
    }

    /// Commit `ticket` unless a newer session-changing write already landed.
    fn try_commit(&mut self, ticket: u64) -> bool {
        if ticket < self.committed {
            return false;
        }
        self.committed = ticket;
        true
    }
}

/// Mediates every call to and from the identity provider.
pub struct AuthGateway {
    provider: Arc<dyn IdentityProvider>,
    store: SessionStore,
    sequencer: Arc<Mutex<Sequencer>>,
    subscription: Option<Subscription>,
}

impl AuthGateway {
    /// Build a gateway and open the provider's change subscription.
    pub fn new(provider: Arc<dyn IdentityProvider>, store: SessionStore) -> Self {
        let sequencer = Arc::new(Mutex::new(Sequencer::default()));

        let listener_store = store.clone();
        let listener_sequencer = Arc::clone(&sequencer);
        let subscription = provider.on_session_change(Box::new(move |event: &SessionEvent| {
            let mut seq = lock(&listener_sequencer);
            seq.claim();
            tracing::debug!(kind = ?event.kind, signed_in = event.session.is_some(), "provider session change");
            listener_store.set(AuthState::resolved(event.session.clone()));
        }));
        tracing::debug!("session change subscription opened");

        Self { provider, store, sequencer, subscription: Some(subscription) }
    }

    /// Ask the provider for an existing session and settle `loading`.
    ///
    /// Provider failures are logged and treated as "no session"; bootstrap
    /// itself never fails.
    pub async fn bootstrap(&self) {
        let ticket = self.begin();
        let session = match self.provider.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session bootstrap failed; continuing signed out");
                None
            }
        };
        match &session {
            Some(s) => tracing::info!(user_id = %s.user_id, role = ?s.role, "restored existing session"),
            None => tracing::info!("no existing session"),
        }
        self.commit(ticket, "bootstrap", session);
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the classified [`AuthError`]; the current session is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let credentials = Credentials::new(email, password);
        let ticket = self.begin();
        match self.provider.sign_in_with_password(&credentials).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user_id, role = ?session.role, "signed in");
                self.commit(ticket, "login", Some(session));
                Ok(())
            }
            Err(e) => {
                let err = AuthError::from(e);
                tracing::warn!(kind = ?err.kind(), error = %err, "login failed");
                self.settle();
                Err(err)
            }
        }
    }

    /// Create an account with the request's profile fields as metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PendingConfirmation`] when the account was created
    /// but no session was issued, or the classified provider error.
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), AuthError> {
        let ticket = self.begin();
        match self.provider.sign_up(request).await {
            Ok(outcome) if outcome.session_issued => {
                tracing::info!(user_id = %outcome.user.user_id, "signed up");
                self.commit(ticket, "signup", Some(outcome.user));
                Ok(())
            }
            Ok(outcome) => {
                tracing::info!(user_id = %outcome.user.user_id, "signed up; email confirmation pending");
                self.settle();
                Err(AuthError::PendingConfirmation)
            }
            Err(e) => {
                let err = AuthError::from(e);
                tracing::warn!(kind = ?err.kind(), error = %err, "signup failed");
                self.settle();
                Err(err)
            }
        }
    }

    /// Sign out at the provider, then clear the local session even if that failed.
    pub async fn logout(&self) {
        let ticket = lock(&self.sequencer).claim();
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "provider sign-out failed; clearing local session anyway");
        }
        tracing::info!("signed out");

        let mut seq = lock(&self.sequencer);
        if seq.try_commit(ticket) {
            self.store.set(AuthState::signed_out());
        } else {
            tracing::debug!(op = "logout", ticket, "discarding superseded auth result");
        }
    }

    /// Current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.store.get().session
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store.get().loading
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Release the provider subscription.
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("session change subscription released");
        }
    }

    /// Issue a ticket and mark the store loading, keeping the current session.
    fn begin(&self) -> u64 {
        let mut seq = lock(&self.sequencer);
        seq.in_flight += 1;
        let current = self.store.get();
        if !current.loading {
            self.store.set(AuthState { session: current.session, loading: true });
        }
        seq.issue()
    }

    /// Finish an operation that produced a session value.
    fn commit(&self, ticket: u64, op: &'static str, session: Option<Session>) {
        let mut seq = lock(&self.sequencer);
        seq.in_flight = seq.in_flight.saturating_sub(1);
        if seq.try_commit(ticket) {
            self.store.set(AuthState::resolved(session));
        } else {
            tracing::debug!(op, ticket, "discarding superseded auth result");
            self.clear_loading_if_idle(&seq);
        }
    }

    /// Finish an operation that leaves the session as it is.
    fn settle(&self) {
        let mut seq = lock(&self.sequencer);
        seq.in_flight = seq.in_flight.saturating_sub(1);
        self.clear_loading_if_idle(&seq);
    }

    fn clear_loading_if_idle(&self, seq: &Sequencer) {
        if seq.in_flight > 0 {
            return;
        }
        let current = self.store.get();
        if current.loading {
            self.store.set(AuthState::resolved(current.session));
        }
    }
}

impl Drop for AuthGateway {
    fn drop(&mut self) {
        self.release();
    }
}
