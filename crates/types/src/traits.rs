//! Async traits for the remote collaborators of the embed pipeline.
//!
//! Higher layers depend only on these traits so that the pipeline can be
//! exercised against in-process fakes.

use crate::{AccessToken, Dataset, EmbedToken, GenerateTokenRequest, Report, error::Result};
use async_trait::async_trait;
use secrecy::SecretString;

/// Username/password pair of the service account.
#[derive(Debug)]
pub struct PasswordCredential {
    pub username: String,
    pub password: SecretString,
}

impl PasswordCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Everything the identity provider needs to issue an access token.
#[derive(Debug)]
pub struct TokenRequest {
    /// Authority the token is requested from.
    pub authority_url: String,
    /// Resource (audience) the token is for.
    pub resource: String,
    /// Registered application (client) id.
    pub client_id: String,
    pub credential: PasswordCredential,
}

/// Issues access tokens for the service account.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Acquire a token, or `None` if the provider declined to issue one.
    async fn acquire_token(&self, request: &TokenRequest) -> Result<Option<AccessToken>>;
}

/// Read/generate operations of the analytics hosting API.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// List the reports in a workspace.
    async fn list_reports(&self, workspace_id: &str) -> Result<Vec<Report>>;

    /// Fetch a dataset by id.
    async fn get_dataset(&self, workspace_id: &str, dataset_id: &str) -> Result<Dataset>;

    /// Generate an embed token for a report, or `None` if none was issued.
    async fn generate_token(
        &self,
        workspace_id: &str,
        report_id: &str,
        request: &GenerateTokenRequest,
    ) -> Result<Option<EmbedToken>>;
}

/// Opens an [`AnalyticsApi`] client bound to one bearer token.
///
/// The returned client is scoped to a single embed request.
pub trait AnalyticsConnector: Send + Sync {
    fn connect(&self, api_url: &str, token: AccessToken) -> Box<dyn AnalyticsApi>;
}
