//! The embed token pipeline.
//!
//! Validate configuration → acquire an access token → list reports → pick
//! the report → read its dataset → generate an embed token. Each step runs
//! once, in order, and the first failure ends the pipeline.

use pbiembed_config::Config;
use pbiembed_types::{
    AnalyticsConnector, EffectiveIdentity, EmbedConfig, EmbedError, GenerateTokenRequest,
    IdentityProvider, Report, error::Result,
};
use std::sync::Arc;

/// Produces [`EmbedConfig`]s against a pair of remote collaborators.
#[derive(Clone)]
pub struct EmbedService {
    identity: Arc<dyn IdentityProvider>,
    analytics: Arc<dyn AnalyticsConnector>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Pick the configured report, or the first one when no id is configured.
fn select_report<'a>(reports: &'a [Report], report_id: Option<&str>) -> Option<&'a Report> {
    match report_id {
        Some(id) => reports.iter().find(|r| r.id == id),
        None => reports.first(),
    }
}

/// Build the read-only token request, scoped to the caller when a username
/// is supplied.
#[must_use]
pub fn build_token_request(
    username: Option<&str>,
    roles: Option<&str>,
    dataset_id: &str,
) -> GenerateTokenRequest {
    let Some(username) = non_blank(username) else {
        return GenerateTokenRequest::view();
    };
    let mut identity = EffectiveIdentity::new(username, vec![dataset_id.to_string()]);
    if let Some(roles) = non_blank(roles) {
        identity = identity.with_roles_csv(roles);
    }
    GenerateTokenRequest::view_as(identity)
}

impl EmbedService {
    pub fn new(identity: Arc<dyn IdentityProvider>, analytics: Arc<dyn AnalyticsConnector>) -> Self {
        Self {
            identity,
            analytics,
        }
    }

    /// Runs the pipeline for one caller.
    ///
    /// Never fails: problems are reported through
    /// [`EmbedConfig::error_message`]. Failures without a specific diagnostic
    /// are logged with their cause and reported as a generic message.
    pub async fn get_embed_config(
        &self,
        config: &Config,
        username: Option<String>,
        roles: Option<String>,
    ) -> EmbedConfig {
        let mut result = EmbedConfig::new(username, roles);
        match self.populate(config, &mut result).await {
            Ok(()) => {
                tracing::info!(
                    report_id = result.report_id.as_deref().unwrap_or_default(),
                    scoped = non_blank(result.username.as_deref()).is_some(),
                    "embed token issued"
                );
            }
            Err(e) if e.is_classified() => {
                tracing::warn!(reason = %e, "embed configuration not produced");
                result.error_message = Some(e.client_message());
            }
            Err(e) => {
                tracing::error!(error = %e, "embed token pipeline failed");
                result.error_message = Some(e.client_message());
            }
        }
        result
    }

    async fn populate(&self, config: &Config, result: &mut EmbedConfig) -> Result<()> {
        config.validate()?;

        let token = self
            .identity
            .acquire_token(&config.identity.token_request())
            .await?
            .ok_or(EmbedError::AuthenticationFailed)?;

        // Client lives for this call only.
        let client = self.analytics.connect(&config.powerbi.api_url, token);
        let workspace_id = config.powerbi.workspace_id.trim();

        let reports = client.list_reports(workspace_id).await?;
        if reports.is_empty() {
            return Err(EmbedError::NoReports);
        }

        let report = select_report(&reports, config.powerbi.report_id())
            .ok_or(EmbedError::ReportNotFound)?;
        let dataset_id = report
            .dataset_id
            .as_deref()
            .ok_or(EmbedError::MissingField("datasetId"))?;

        let dataset = client.get_dataset(workspace_id, dataset_id).await?;
        result.dataset_requires_identity = dataset.is_effective_identity_required.unwrap_or(false);
        result.dataset_requires_roles = dataset
            .is_effective_identity_roles_required
            .unwrap_or(false);

        let request =
            build_token_request(result.username.as_deref(), result.roles.as_deref(), dataset_id);
        let embed = client
            .generate_token(workspace_id, &report.id, &request)
            .await?
            .ok_or(EmbedError::TokenGenerationFailed)?;

        result.embed_token = Some(embed.token);
        result.embed_url.clone_from(&report.embed_url);
        result.report_id = Some(report.id.clone());
        Ok(())
    }
}
