//! The per-request embed configuration returned to callers.

use serde::{Deserialize, Serialize};

/// Everything a client needs to embed a report, or the reason it can't.
///
/// Absent caller values and unset results serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    pub username: Option<String>,
    /// Comma-separated role list as supplied by the caller.
    pub roles: Option<String>,
    pub embed_token: Option<String>,
    pub embed_url: Option<String>,
    pub report_id: Option<String>,
    pub dataset_requires_identity: bool,
    pub dataset_requires_roles: bool,
    pub error_message: Option<String>,
}

impl EmbedConfig {
    /// Fresh result echoing the caller's identity and roles.
    #[must_use]
    pub fn new(username: Option<String>, roles: Option<String>) -> Self {
        Self {
            username,
            roles,
            ..Self::default()
        }
    }
}
