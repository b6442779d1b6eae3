//! Power BI REST client bound to one bearer token.

use crate::http_util::PowerBiHttp;
use async_trait::async_trait;
use pbiembed_types::{
    AccessToken, AnalyticsApi, AnalyticsConnector, Dataset, EmbedToken, GenerateTokenRequest,
    Report, error::Result,
};
use rquest::Client;
use serde::Deserialize;
use serde_json::Value;

/// OData collection wrapper used by list endpoints.
#[derive(Debug, Deserialize)]
struct ODataCollection<T> {
    #[serde(default)]
    value: Vec<T>,
}

/// Client for the workspace-scoped Power BI REST endpoints.
pub struct PowerBiClient {
    ph: PowerBiHttp,
    base_url: String,
    token: AccessToken,
}

impl PowerBiClient {
    /// Creates a client for `api_url` (e.g. `https://api.powerbi.com/`).
    #[must_use]
    pub fn new(http: Client, api_url: &str, token: AccessToken) -> Self {
        Self {
            ph: PowerBiHttp::new(http),
            base_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn group_url(&self, workspace_id: &str, path: &str) -> String {
        format!("{}/v1.0/myorg/groups/{workspace_id}/{path}", self.base_url)
    }

    fn get(&self, url: &str) -> rquest::RequestBuilder {
        self.ph
            .client()
            .get(url)
            .header("authorization", self.token.authorization())
            .header("accept", "application/json")
    }
}

/// `GenerateToken` may answer with an empty or `null` body.
fn parse_embed_token(body: &str) -> Result<Option<EmbedToken>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let json: Value = serde_json::from_str(body)?;
    if json.get("token").and_then(Value::as_str).is_none() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(json)?))
}

#[async_trait]
impl AnalyticsApi for PowerBiClient {
    async fn list_reports(&self, workspace_id: &str) -> Result<Vec<Report>> {
        let url = self.group_url(workspace_id, "reports");
        let reports: ODataCollection<Report> = self.ph.send_json(self.get(&url)).await?;
        tracing::debug!(workspace_id, count = reports.value.len(), "listed reports");
        Ok(reports.value)
    }

    async fn get_dataset(&self, workspace_id: &str, dataset_id: &str) -> Result<Dataset> {
        let url = self.group_url(workspace_id, &format!("datasets/{dataset_id}"));
        self.ph.send_json(self.get(&url)).await
    }

    async fn generate_token(
        &self,
        workspace_id: &str,
        report_id: &str,
        request: &GenerateTokenRequest,
    ) -> Result<Option<EmbedToken>> {
        let url = self.group_url(workspace_id, &format!("reports/{report_id}/GenerateToken"));
        let builder = self
            .ph
            .client()
            .post(&url)
            .header("authorization", self.token.authorization())
            .header("accept", "application/json")
            .json(request);
        let body = self.ph.send_text(builder).await?;
        parse_embed_token(&body)
    }
}

/// Opens a [`PowerBiClient`] per embed request, sharing one connection pool.
#[derive(Clone)]
pub struct PowerBiConnector {
    http: Client,
}

impl PowerBiConnector {
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

impl AnalyticsConnector for PowerBiConnector {
    fn connect(&self, api_url: &str, token: AccessToken) -> Box<dyn AnalyticsApi> {
        Box::new(PowerBiClient::new(self.http.clone(), api_url, token))
    }
}
