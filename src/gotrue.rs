//! GoTrue (Supabase Auth) identity provider over HTTP.
//!
//! Thin `reqwest` wrapper around the password, signup, logout and user
//! endpoints. The issued tokens are held in memory for the life of the
//! process. Response parsing lives in pure functions for testability.

#[cfg(test)]
#[path = "gotrue_test.rs"]
mod gotrue_test;

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::GoTrueConfig;
use crate::error::ProviderError;
use crate::listeners::{ListenerSet, Subscription, lock};
use crate::provider::{IdentityProvider, SessionEvent, SessionListener, SignupOutcome};
use crate::session::{Credentials, Role, Session, SignupRequest};

const TOKEN_PATH: &str = "/auth/v1/token";
const SIGNUP_PATH: &str = "/auth/v1/signup";
const LOGOUT_PATH: &str = "/auth/v1/logout";
const USER_PATH: &str = "/auth/v1/user";

// =============================================================================
// CLIENT
// =============================================================================

/// Tokens issued for the current session.
#[derive(Clone)]
struct IssuedSession {
    access_token: String,
    session: Session,
}

pub struct GoTrueProvider {
    http: reqwest::Client,
    config: GoTrueConfig,
    issued: Mutex<Option<IssuedSession>>,
    listeners: ListenerSet<SessionEvent>,
}

impl GoTrueProvider {
    /// Build a provider with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the HTTP client cannot be constructed.
    pub fn new(config: GoTrueConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ProviderError::new(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, config, issued: Mutex::new(None), listeners: ListenerSet::new() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str, bearer: Option<&str>) -> reqwest::RequestBuilder {
        let token = bearer.unwrap_or(&self.config.anon_key);
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {token}"))
    }

    /// Send a request, returning status and body. Only transport failures error here.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), ProviderError> {
        let response = request.send().await.map_err(|e| ProviderError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ProviderError::new(e.to_string()))?;
        Ok((status, text))
    }

    /// Send a request and return the body of a 2xx response.
    async fn send_ok(&self, request: reqwest::RequestBuilder) -> Result<String, ProviderError> {
        let (status, text) = self.send(request).await?;
        if (200..300).contains(&status) {
            Ok(text)
        } else {
            Err(ProviderError::new(error_message(status, &text)))
        }
    }

    fn store_issued(&self, issued: IssuedSession) -> Session {
        let session = issued.session.clone();
        *lock(&self.issued) = Some(issued);
        self.listeners.emit(&SessionEvent::signed_in(session.clone()));
        session
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoTrueProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        let held = lock(&self.issued).clone();
        let Some(held) = held else {
            return Ok(None);
        };

        let request = self.request(reqwest::Method::GET, USER_PATH, Some(&held.access_token));
        let (status, text) = self.send(request).await?;
        if matches!(status, 401 | 403) {
            tracing::info!(status, "stored session rejected; discarding");
            *lock(&self.issued) = None;
            return Ok(None);
        }
        if !(200..300).contains(&status) {
            return Err(ProviderError::new(error_message(status, &text)));
        }

        let session = parse_user(&text)?;
        if session != held.session {
            *lock(&self.issued) = Some(IssuedSession { access_token: held.access_token, session: session.clone() });
            self.listeners.emit(&SessionEvent::user_updated(session.clone()));
        }
        Ok(Some(session))
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, ProviderError> {
        let request = self
            .request(reqwest::Method::POST, TOKEN_PATH, None)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email: &credentials.email, password: &credentials.password });
        let text = self.send_ok(request).await?;
        let issued = parse_session_body(&text)?;
        Ok(self.store_issued(issued))
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<SignupOutcome, ProviderError> {
        let mut builder = self.request(reqwest::Method::POST, SIGNUP_PATH, None);
        if let Some(redirect) = self.config.email_redirect_to() {
            builder = builder.query(&[("redirect_to", redirect)]);
        }
        let body = SignupBody {
            email: &request.email,
            password: &request.password,
            data: ProfileData {
                name: &request.name,
                profession: request.profession.as_deref(),
                bio: request.bio.as_deref(),
            },
        };
        let text = self.send_ok(builder.json(&body)).await?;

        match parse_signup_body(&text)? {
            SignupResponse::Issued(issued) => {
                let user = self.store_issued(issued);
                Ok(SignupOutcome { user, session_issued: true })
            }
            SignupResponse::Pending(user) => Ok(SignupOutcome { user, session_issued: false }),
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let held = lock(&self.issued).take();
        let Some(held) = held else {
            return Ok(());
        };
        self.listeners.emit(&SessionEvent::signed_out());

        let request = self.request(reqwest::Method::POST, LOGOUT_PATH, Some(&held.access_token));
        self.send_ok(request).await.map(|_| ())
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(move |event| listener(event))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupBody<'a> {
    email: &'a str,
    password: &'a str,
    data: ProfileData<'a>,
}

#[derive(Serialize)]
struct ProfileData<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    profession: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<&'a str>,
}

#[derive(Deserialize)]
struct UserBody {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: Value,
    #[serde(default)]
    user_metadata: Value,
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
    user: UserBody,
}

/// Parsed signup response.
enum SignupResponse {
    Issued(IssuedSession),
    Pending(Session),
}

// =============================================================================
// PARSING
// =============================================================================

fn metadata_str(metadata: &Value, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn session_from_user(user: UserBody) -> Session {
    Session {
        user_id: user.id,
        email: user.email.unwrap_or_default(),
        name: metadata_str(&user.user_metadata, "name"),
        profession: metadata_str(&user.user_metadata, "profession"),
        bio: metadata_str(&user.user_metadata, "bio"),
        role: Role::from_tag(user.app_metadata.get("role").and_then(Value::as_str)),
    }
}

fn parse_error(what: &str, e: &serde_json::Error) -> ProviderError {
    ProviderError::new(format!("unexpected {what} response: {e}"))
}

/// Parse a `/user` response into a session snapshot.
fn parse_user(body: &str) -> Result<Session, ProviderError> {
    let user: UserBody = serde_json::from_str(body).map_err(|e| parse_error("user", &e))?;
    Ok(session_from_user(user))
}

/// Parse a token-grant response (access token plus user).
fn parse_session_body(body: &str) -> Result<IssuedSession, ProviderError> {
    let token: TokenBody = serde_json::from_str(body).map_err(|e| parse_error("token", &e))?;
    Ok(IssuedSession { access_token: token.access_token, session: session_from_user(token.user) })
}

/// A signup response carries a session when confirmation is off, else a bare user.
fn parse_signup_body(body: &str) -> Result<SignupResponse, ProviderError> {
    let value: Value = serde_json::from_str(body).map_err(|e| parse_error("signup", &e))?;
    if value.get("access_token").and_then(Value::as_str).is_some() {
        let token: TokenBody = serde_json::from_value(value).map_err(|e| parse_error("signup", &e))?;
        return Ok(SignupResponse::Issued(IssuedSession {
            access_token: token.access_token,
            session: session_from_user(token.user),
        }));
    }
    let user_value = value.get("user").cloned().unwrap_or(value);
    let user: UserBody = serde_json::from_value(user_value).map_err(|e| parse_error("signup", &e))?;
    Ok(SignupResponse::Pending(session_from_user(user)))
}

/// Extract the human-readable message from an error response.
fn error_message(status: u16, body: &str) -> String {
    const MESSAGE_KEYS: [&str; 4] = ["msg", "message", "error_description", "error"];

    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            MESSAGE_KEYS
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_owned))
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}
