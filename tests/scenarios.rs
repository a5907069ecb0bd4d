//! End-to-end navigation scenarios: provider -> gateway -> store -> routes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use folio::listeners::{ListenerSet, Subscription};
use folio::provider::{IdentityProvider, SessionEvent, SessionListener, SignupOutcome};
use folio::routes::{Navigation, Page, resolve};
use folio::session::Credentials;
use folio::{AuthErrorKind, AuthGateway, AuthState, ProviderError, Role, Session, SessionStore, SignupRequest};
use uuid::Uuid;

/// Provider stub holding one existing session and a queue of sign-in results.
#[derive(Default)]
struct StubProvider {
    existing: Option<Session>,
    sign_ins: Mutex<VecDeque<Result<Session, ProviderError>>>,
    listeners: ListenerSet<SessionEvent>,
}

#[async_trait::async_trait]
impl IdentityProvider for StubProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.existing.clone())
    }

    async fn sign_in_with_password(&self, _credentials: &Credentials) -> Result<Session, ProviderError> {
        self.sign_ins.lock().unwrap().pop_front().unwrap_or_else(|| Err(ProviderError::new("no script")))
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<SignupOutcome, ProviderError> {
        let user = Session::new(Uuid::new_v4(), request.email.clone());
        Ok(SignupOutcome { user, session_issued: false })
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(move |event| listener(event))
    }
}

fn session(role: Role) -> Session {
    Session::new(Uuid::new_v4(), "visitor@example.com").with_role(role)
}

async fn booted(stub: StubProvider) -> (Arc<StubProvider>, AuthGateway) {
    let stub = Arc::new(stub);
    let provider: Arc<dyn IdentityProvider> = stub.clone();
    let gateway = AuthGateway::new(provider, SessionStore::new());
    assert_eq!(resolve("/dashboard", &gateway.store().get()), Navigation::Pending);
    gateway.bootstrap().await;
    (stub, gateway)
}

#[tokio::test]
async fn admin_session_reaches_admin_page() {
    let (_, gateway) = booted(StubProvider { existing: Some(session(Role::Admin)), ..Default::default() }).await;
    assert_eq!(resolve("/admin", &gateway.store().get()), Navigation::Render(Page::Admin));
}

#[tokio::test]
async fn user_session_is_bounced_from_admin_to_dashboard() {
    let (_, gateway) = booted(StubProvider { existing: Some(session(Role::User)), ..Default::default() }).await;
    assert_eq!(resolve("/admin", &gateway.store().get()), Navigation::Redirect("/dashboard"));
}

#[tokio::test]
async fn no_session_redirects_dashboard_and_root_to_login() {
    let (_, gateway) = booted(StubProvider::default()).await;
    let state = gateway.store().get();
    assert_eq!(resolve("/dashboard", &state), Navigation::Redirect("/login"));
    assert_eq!(resolve("/", &state), Navigation::Redirect("/login"));
}

#[tokio::test]
async fn failed_then_successful_login_then_logout() {
    let stub = StubProvider::default();
    stub.sign_ins.lock().unwrap().push_back(Err(ProviderError::new("Invalid login credentials")));
    stub.sign_ins.lock().unwrap().push_back(Ok(session(Role::User)));
    let (_, gateway) = booted(stub).await;

    let err = gateway.login("a@b.com", "x").await.unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);
    assert_eq!(gateway.store().get(), AuthState::signed_out());

    gateway.login("a@b.com", "right").await.unwrap();
    assert_eq!(resolve("/projects", &gateway.store().get()), Navigation::Render(Page::Projects));
    assert_eq!(resolve("/login", &gateway.store().get()), Navigation::Redirect("/dashboard"));

    gateway.logout().await;
    assert_eq!(gateway.store().get(), AuthState::signed_out());
    assert_eq!(resolve("/projects", &gateway.store().get()), Navigation::Redirect("/login"));
}

#[tokio::test]
async fn signup_requiring_confirmation_stays_signed_out() {
    let (_, gateway) = booted(StubProvider::default()).await;
    let request = SignupRequest {
        name: "New".into(),
        email: "new@x.com".into(),
        password: "secret123".into(),
        ..Default::default()
    };

    let err = gateway.signup(&request).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::PendingConfirmation);
    assert_eq!(resolve("/dashboard", &gateway.store().get()), Navigation::Redirect("/login"));
}

#[tokio::test]
async fn external_role_change_updates_admin_access() {
    let user = session(Role::User);
    let (stub, gateway) = booted(StubProvider { existing: Some(user.clone()), ..Default::default() }).await;
    assert_eq!(resolve("/admin", &gateway.store().get()), Navigation::Redirect("/dashboard"));

    stub.listeners.emit(&SessionEvent::user_updated(user.with_role(Role::Admin)));
    assert_eq!(resolve("/admin", &gateway.store().get()), Navigation::Render(Page::Admin));

    stub.listeners.emit(&SessionEvent::signed_out());
    assert_eq!(resolve("/admin", &gateway.store().get()), Navigation::Redirect("/login"));
}

#[tokio::test]
async fn store_subscribers_observe_the_whole_lifecycle() {
    let store = SessionStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = store.subscribe(move |state| sink.lock().unwrap().push((state.loading, state.is_authenticated())));

    let stub = StubProvider::default();
    stub.sign_ins.lock().unwrap().push_back(Ok(session(Role::User)));
    let gateway = AuthGateway::new(Arc::new(stub), store);
    gateway.bootstrap().await;
    gateway.login("a@b.com", "pw").await.unwrap();
    gateway.logout().await;
    gateway.shutdown();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(false, false), (true, false), (false, true), (false, false)]
    );
}
