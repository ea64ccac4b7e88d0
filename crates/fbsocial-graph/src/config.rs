//! Client configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::classifier::RequestContext;

/// Default Graph API base URL
pub const GRAPH_DEFAULT_BASE: &str = "https://graph.facebook.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`crate::FacebookClient`]
///
/// `Debug` output redacts the access token.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    api_base: String,
    access_token: Option<SecretString>,
    timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            api_base: GRAPH_DEFAULT_BASE.to_string(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GraphConfig {
    /// Read configuration from the environment
    ///
    /// - `FACEBOOK_ACCESS_TOKEN`: token sent as `Authorization: OAuth <token>`
    /// - `FACEBOOK_GRAPH_URL`: API base (defaults to `https://graph.facebook.com`)
    /// - `FACEBOOK_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(token) = env_value("FACEBOOK_ACCESS_TOKEN") {
            config.access_token = Some(SecretString::from(token));
        }
        if let Some(base) = env_value("FACEBOOK_GRAPH_URL") {
            config.api_base = base;
        }
        if let Some(secs) = env_value("FACEBOOK_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Configuration without an access token, for public objects
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn without_access_token(mut self) -> Self {
        self.access_token = None;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Value for the `Authorization` header, if a token is configured
    pub(crate) fn authorization_header(&self) -> Option<String> {
        self.access_token
            .as_ref()
            .map(|token| format!("OAuth {}", token.expose_secret()))
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext {
            token_supplied: self.has_access_token(),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
