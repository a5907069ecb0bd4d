//! # folio
//!
//! Authentication lifecycle and route guarding for a gated portfolio site.
//! Visitors must sign in before reaching most pages; the admin role unlocks
//! one more.
//!
//! Data flows one way: [`gateway::AuthGateway`] talks to an
//! [`provider::IdentityProvider`] and writes every outcome into the
//! [`store::SessionStore`]; [`guard`] and [`routes`] read the store
//! synchronously to decide what each path renders.

pub mod config;
pub mod error;
pub mod gateway;
pub mod gotrue;
pub mod guard;
pub mod listeners;
pub mod provider;
pub mod routes;
pub mod session;
pub mod store;

pub use error::{AuthError, AuthErrorKind, ProviderError};
pub use gateway::AuthGateway;
pub use session::{AuthState, Role, Session, SignupRequest};
pub use store::SessionStore;
