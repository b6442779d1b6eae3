//! Unified error type for the pbiembed workspace.

use thiserror::Error;

/// A static configuration problem detected before any network call.
///
/// The `Display` output is the diagnostic handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error(
        "ApplicationId is empty. Please register your application as a Native app in https://dev.powerbi.com/apps and set identity.application_id in the configuration."
    )]
    ApplicationIdMissing,

    #[error(
        "ApplicationId must be a Guid object. Please register your application as a Native app in https://dev.powerbi.com/apps and set identity.application_id in the configuration."
    )]
    ApplicationIdNotUuid,

    #[error(
        "WorkspaceId is empty. Please select a workspace you own and set powerbi.workspace_id in the configuration."
    )]
    WorkspaceIdMissing,

    #[error(
        "WorkspaceId must be a Guid object. Please select a workspace you own and set powerbi.workspace_id in the configuration."
    )]
    WorkspaceIdNotUuid,

    #[error("Username is empty. Please set the Power BI username in identity.username.")]
    UsernameMissing,

    #[error("Password is empty. Please set the password of the Power BI user in identity.password.")]
    PasswordMissing,
}

/// Client-facing message for every failure that has no specific diagnostic.
pub const GENERIC_FAILURE: &str = "Error Occured";

/// Enumerates all error kinds that can occur while producing an embed configuration.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Static configuration is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigIssue),

    /// The identity provider returned no token.
    #[error("Authentication Failed.")]
    AuthenticationFailed,

    /// The workspace contains no reports.
    #[error("No reports were found in the workspace")]
    NoReports,

    /// The configured report id is not in the workspace.
    #[error("No report with the given ID was found in the workspace. Make sure ReportId is valid.")]
    ReportNotFound,

    /// The analytics API returned no embed token.
    #[error("Failed to generate embed token.")]
    TokenGenerationFailed,

    /// Identity provider protocol failure.
    #[error("authentication error: {0}")]
    Auth(String),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A remote payload lacks a field the pipeline needs.
    #[error("malformed response: missing {0}")]
    MissingField(&'static str),

    /// A remote service returned a non-success status.
    #[error("upstream error: status={status}, body={body}")]
    Upstream { status: u16, body: String },
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "rquest")]
impl From<rquest::Error> for EmbedError {
    fn from(e: rquest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl EmbedError {
    /// Returns `true` if the error carries its own client-facing diagnostic.
    #[must_use]
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::AuthenticationFailed
                | Self::NoReports
                | Self::ReportNotFound
                | Self::TokenGenerationFailed
        )
    }

    /// The message reported in-band to the caller.
    ///
    /// Unclassified failures collapse to [`GENERIC_FAILURE`].
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.is_classified() {
            self.to_string()
        } else {
            GENERIC_FAILURE.to_string()
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, EmbedError>;
