//! Power BI REST models used by the embed pipeline.
//!
//! Field names follow the REST API's camelCase wire format.

use serde::{Deserialize, Serialize};

/// A report in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub dataset_id: Option<String>,
}

/// A dataset backing one or more reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_effective_identity_required: Option<bool>,
    #[serde(default)]
    pub is_effective_identity_roles_required: Option<bool>,
}

/// Row-level-security identity attached to a token request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveIdentity {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    pub datasets: Vec<String>,
}

impl EffectiveIdentity {
    /// Identity for `username` scoped to the given datasets, without roles.
    pub fn new(username: impl Into<String>, datasets: Vec<String>) -> Self {
        Self {
            username: username.into(),
            roles: None,
            datasets,
        }
    }

    /// Attach the roles from a comma-separated list.
    ///
    /// Pieces are kept verbatim and in order.
    #[must_use]
    pub fn with_roles_csv(mut self, roles: &str) -> Self {
        self.roles = Some(roles.split(',').map(str::to_string).collect());
        self
    }
}

/// Access level requested for every embed token.
pub const VIEW_ACCESS: &str = "view";

/// Body of the `GenerateToken` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenRequest {
    pub access_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identities: Option<Vec<EffectiveIdentity>>,
}

impl GenerateTokenRequest {
    /// A read-only request without identity scoping.
    #[must_use]
    pub fn view() -> Self {
        Self {
            access_level: VIEW_ACCESS.to_string(),
            identities: None,
        }
    }

    /// A read-only request scoped to one effective identity.
    #[must_use]
    pub fn view_as(identity: EffectiveIdentity) -> Self {
        Self {
            access_level: VIEW_ACCESS.to_string(),
            identities: Some(vec![identity]),
        }
    }
}

/// Embed token returned by `GenerateToken`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedToken {
    pub token: String,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub expiration: Option<String>,
}
