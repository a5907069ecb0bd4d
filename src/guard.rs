//! Route gates evaluated against the current [`AuthState`].
//!
//! Both gates are pure functions of a state snapshot; they never call the
//! gateway. `AdminGate` is only meaningful nested inside `AuthGate`: it does
//! not handle the loading or signed-out cases itself and simply fails closed.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::session::AuthState;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Default page for authenticated visitors.
pub const LANDING_PATH: &str = "/dashboard";

/// What a gate decided for the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Auth state unresolved: show a neutral placeholder and nothing else.
    Pending,
    /// Replace the current location with this path.
    Redirect(&'static str),
    /// Render the guarded children.
    Allow,
}

/// A single route-level guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Auth,
    Admin,
}

impl Gate {
    #[must_use]
    pub fn check(self, state: &AuthState) -> GateDecision {
        match self {
            Self::Auth => auth_gate(state),
            Self::Admin => admin_gate(state),
        }
    }
}

/// Require a resolved session; redirect to the login page without one.
#[must_use]
pub fn auth_gate(state: &AuthState) -> GateDecision {
    if state.loading {
        GateDecision::Pending
    } else if state.session.is_none() {
        GateDecision::Redirect(LOGIN_PATH)
    } else {
        GateDecision::Allow
    }
}

/// Require the admin role; anyone else goes to the landing page.
#[must_use]
pub fn admin_gate(state: &AuthState) -> GateDecision {
    if state.is_admin() { GateDecision::Allow } else { GateDecision::Redirect(LANDING_PATH) }
}

/// Apply gates outermost first; the first one that does not allow decides.
#[must_use]
pub fn check_all(gates: &[Gate], state: &AuthState) -> GateDecision {
    gates
        .iter()
        .map(|gate| gate.check(state))
        .find(|decision| *decision != GateDecision::Allow)
        .unwrap_or(GateDecision::Allow)
}
