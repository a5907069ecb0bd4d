//! Identity-provider configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set or empty.
    #[error("missing config: env var {var} not set")]
    Missing { var: &'static str },

    /// A value is present but malformed.
    #[error("invalid config value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Connection settings for a GoTrue (Supabase Auth) endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct GoTrueConfig {
    /// Project base URL without a trailing slash, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Public anon key sent as the `apikey` header.
    pub anon_key: String,
    /// Site origin used for the signup confirmation redirect.
    pub site_url: Option<String>,
    pub timeouts: Timeouts,
}

impl GoTrueConfig {
    /// Build config from explicit values, validating the URL shape.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL is not http(s) or the key is empty.
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url("SUPABASE_URL", base_url)?;
        if anon_key.trim().is_empty() {
            return Err(ConfigError::Missing { var: "SUPABASE_ANON_KEY" });
        }
        Ok(Self { base_url, anon_key: anon_key.trim().to_owned(), site_url: None, timeouts: Timeouts::default() })
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `FOLIO_SITE_URL`: origin for the signup confirmation redirect
    /// - `FOLIO_REQUEST_TIMEOUT_SECS`: default 30
    /// - `FOLIO_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = require_env("SUPABASE_URL")?;
        let anon_key = require_env("SUPABASE_ANON_KEY")?;
        let mut config = Self::new(&base_url, &anon_key)?;

        config.site_url = match non_empty_env("FOLIO_SITE_URL") {
            Some(raw) => Some(parse_base_url("FOLIO_SITE_URL", &raw)?),
            None => None,
        };
        config.timeouts = Timeouts {
            request_secs: env_parse_u64("FOLIO_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("FOLIO_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        Ok(config)
    }

    /// Where the confirmation email should send the user back to.
    #[must_use]
    pub fn email_redirect_to(&self) -> Option<String> {
        self.site_url.as_ref().map(|site| format!("{site}/"))
    }
}

impl std::fmt::Debug for GoTrueConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueConfig")
            .field("base_url", &self.base_url)
            .field("anon_key", &"<redacted>")
            .field("site_url", &self.site_url)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn require_env(key: &'static str) -> Result<String, ConfigError> {
    non_empty_env(key).ok_or(ConfigError::Missing { var: key })
}

fn env_parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match non_empty_env(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError::Invalid { var: key, reason: "must be greater than zero".into() }),
            Ok(v) => Ok(v),
            Err(e) => Err(ConfigError::Invalid { var: key, reason: e.to_string() }),
        },
    }
}

fn parse_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(ConfigError::Invalid { var, reason: format!("expected an http(s) URL, got '{raw}'") });
    }
    Ok(trimmed.to_owned())
}
