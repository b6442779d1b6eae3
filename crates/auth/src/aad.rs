//! Azure AD resource-owner password grant.
//!
//! Exchanges the service account's username and password for an access token
//! against the v1 token endpoint of the configured authority.

use async_trait::async_trait;
use pbiembed_types::{
    AccessToken, EmbedError, IdentityProvider, TokenRequest,
    error::Result,
};
use rquest::Client;
use secrecy::ExposeSecret as _;
use serde_json::Value;

/// OAuth grant type for username/password credentials.
pub const GRANT_TYPE: &str = "password";

/// Scope sent alongside the resource so an id token is issued too.
pub const SCOPE: &str = "openid";

/// Derive the token endpoint from an authority URL.
///
/// Accepts either the authority root (`https://login.windows.net/common`) or
/// one of its OAuth endpoints (`…/oauth2/authorize/`).
#[must_use]
pub fn token_endpoint(authority_url: &str) -> String {
    let mut root = authority_url.trim().trim_end_matches('/');
    for suffix in ["/oauth2/authorize", "/oauth2/token", "/oauth2"] {
        if let Some(stripped) = root.strip_suffix(suffix) {
            root = stripped;
            break;
        }
    }
    format!("{root}/oauth2/token")
}

/// Build the form parameters for the password grant.
#[must_use]
pub fn build_token_params(request: &TokenRequest) -> Vec<(String, String)> {
    vec![
        ("grant_type".into(), GRANT_TYPE.into()),
        ("resource".into(), request.resource.clone()),
        ("client_id".into(), request.client_id.clone()),
        ("username".into(), request.credential.username.clone()),
        (
            "password".into(),
            request.credential.password.expose_secret().to_string(),
        ),
        ("scope".into(), SCOPE.into()),
    ]
}

/// v1 endpoints send `expires_in` as a numeric string.
fn expires_in(json: &Value) -> Option<u64> {
    let v = json.get("expires_in")?;
    v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

/// Parse the token endpoint JSON response into an [`AccessToken`].
///
/// # Errors
///
/// Returns an error if the response is missing the `access_token` field.
pub fn parse_token_response(json: &Value) -> Result<AccessToken> {
    let access_token = json
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| EmbedError::Auth("missing access_token in response".into()))?;

    let mut token = AccessToken::new(access_token);
    if let Some(kind) = json.get("token_type").and_then(Value::as_str) {
        token = token.with_type(kind);
    }
    if let Some(secs) = expires_in(json) {
        token = token.with_expiry(secs);
    }
    Ok(token)
}

/// Identity provider backed by an Azure AD authority.
pub struct AadPasswordProvider {
    http: Client,
}

impl AadPasswordProvider {
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl IdentityProvider for AadPasswordProvider {
    async fn acquire_token(&self, request: &TokenRequest) -> Result<Option<AccessToken>> {
        let url = token_endpoint(&request.authority_url);
        let body = serde_urlencoded::to_string(build_token_params(request))
            .map_err(|e| EmbedError::Auth(format!("failed to encode token request: {e}")))?;

        tracing::debug!(%url, client_id = %request.client_id, "requesting access token");
        let resp = self
            .http
            .post(&url)
            .header("content-type", "application/x-www-form-urlencoded")
            .header("accept", "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;

        if (200..300).contains(&status) {
            let json: Value = serde_json::from_str(&text)?;
            return match parse_token_response(&json) {
                Ok(token) => Ok(Some(token)),
                Err(e) => {
                    tracing::warn!(error = %e, "token endpoint returned no access token");
                    Ok(None)
                }
            };
        }

        if matches!(status, 400 | 401)
            && let Ok(json) = serde_json::from_str::<Value>(&text)
            && let Some(code) = json.get("error").and_then(Value::as_str)
        {
            let description = json
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            tracing::warn!(status, error = code, description, "access token request rejected");
            return Err(EmbedError::Auth(format!("{code}: {description}")));
        }

        Err(EmbedError::Upstream { status, body: text })
    }
}
