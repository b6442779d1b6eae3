//! Bearer token issued by the identity provider.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// An access token as issued, with its absolute expiry in Unix seconds.
///
/// Tokens are never cached; one is acquired per embed request and dropped
/// with it.
#[derive(Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: Option<u64>,
    pub token_type: Option<String>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

impl AccessToken {
    /// Create a new token with the given access token and `Bearer` type.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
            token_type: Some("Bearer".to_string()),
        }
    }

    /// Set the expiry to `expires_in_secs` seconds from now.
    #[must_use]
    pub fn with_expiry(mut self, expires_in_secs: u64) -> Self {
        self.expires_at = Some(now_secs() + expires_in_secs);
        self
    }

    /// Override the token type reported by the issuer.
    #[must_use]
    pub fn with_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> String {
        let scheme = self.token_type.as_deref().unwrap_or("Bearer");
        format!("{scheme} {}", self.access_token)
    }
}
