//! HTTP layer: the embed token pipeline, axum router and route handler.
//!
//! Exposes `GET /api/token`, which mints a Power BI embed token for the
//! configured report and wraps the result in a [`ResponseEnvelope`].
//!
//! [`ResponseEnvelope`]: pbiembed_types::ResponseEnvelope

mod embed;
#[cfg(test)]
mod testing;
mod token;

pub use embed::{EmbedService, build_token_request};
pub use token::TokenQuery;

use arc_swap::ArcSwap;
use axum::{Router, routing::get};
use pbiembed_auth::AadPasswordProvider;
use pbiembed_config::Config;
use pbiembed_powerbi::PowerBiConnector;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state passed to all route handlers.
pub struct AppState {
    /// Server configuration, atomically swappable for hot-reloading.
    pub config: Arc<ArcSwap<Config>>,
    /// The embed token pipeline.
    pub embed: EmbedService,
}

impl AppState {
    /// Creates the state with the Azure AD and Power BI collaborators.
    ///
    /// If the config specifies a `proxy_url`, the HTTP client is built with that proxy.
    /// The client outlives config reloads, so a changed proxy needs a restart.
    pub fn new(config: Arc<ArcSwap<Config>>) -> Arc<Self> {
        let http = build_http_client(config.load().proxy_url.as_deref());
        let embed = EmbedService::new(
            Arc::new(AadPasswordProvider::new(http.clone())),
            Arc::new(PowerBiConnector::new(http)),
        );
        Self::with_service(config, embed)
    }

    /// Creates the state around an existing pipeline.
    pub fn with_service(config: Arc<ArcSwap<Config>>, embed: EmbedService) -> Arc<Self> {
        Arc::new(Self { config, embed })
    }
}

/// Build an HTTP client, optionally configured with a proxy URL.
fn build_http_client(proxy_url: Option<&str>) -> rquest::Client {
    if let Some(url) = proxy_url {
        match rquest::Proxy::all(url) {
            Ok(proxy) => {
                return rquest::Client::builder()
                    .proxy(proxy)
                    .build()
                    .unwrap_or_else(|_| rquest::Client::new());
            }
            Err(e) => {
                tracing::warn!(url = url, error = %e, "invalid proxy_url, using direct connection");
            }
        }
    }
    rquest::Client::new()
}

/// Build the full axum router.
///
/// Routes:
/// - GET /api/token?username={username}&roles={roles}
pub fn make_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/token", get(token::embed_token))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
