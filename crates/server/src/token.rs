//! `GET /api/token` handler.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use pbiembed_types::{EmbedConfig, ResponseEnvelope};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;

/// Optional caller identity for row-level security.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub username: Option<String>,
    /// Comma-separated role names.
    pub roles: Option<String>,
}

/// Handles `GET /api/token?username=..&roles=..`.
///
/// Always answers HTTP 200; failures are reported in `data.errorMessage`,
/// including a query string that cannot be read.
pub async fn embed_token(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TokenQuery>, QueryRejection>,
) -> Json<ResponseEnvelope<EmbedConfig>> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            let reason = rejection.body_text();
            tracing::warn!(%reason, "unreadable token query");
            let result = EmbedConfig {
                error_message: Some(reason),
                ..EmbedConfig::default()
            };
            return Json(ResponseEnvelope::success(result));
        }
    };

    let config = state.config.load_full();
    let result = state
        .embed
        .get_embed_config(&config, query.username, query.roles)
        .await;
    Json(ResponseEnvelope::success(result))
}
