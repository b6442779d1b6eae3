//! In-process fakes for the identity provider and the analytics API.

use crate::EmbedService;
use async_trait::async_trait;
use pbiembed_config::Config;
use pbiembed_types::{
    AccessToken, AnalyticsApi, AnalyticsConnector, Dataset, EmbedError, EmbedToken,
    GenerateTokenRequest, IdentityProvider, Report, TokenRequest, error::Result,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

pub(crate) fn valid_config() -> Config {
    let mut config = Config::default();
    config.identity.application_id = "225bc539-a3da-49c5-901f-9738ebcd89e9".into();
    config.identity.username = "embed@contoso.com".into();
    config.identity.password = "hunter2".into();
    config.powerbi.workspace_id = "d8207756-c2e0-496e-9e89-bbdd168af87d".into();
    config
}

pub(crate) fn report(id: &str) -> Report {
    Report {
        id: id.to_string(),
        name: Some(format!("report {id}")),
        embed_url: Some(format!("https://embed/{id}")),
        web_url: None,
        dataset_id: Some(format!("D-{id}")),
    }
}

pub(crate) struct FakeIdentity {
    token: Option<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn acquire_token(&self, _request: &TokenRequest) -> Result<Option<AccessToken>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbedError::Http("connection reset".into()));
        }
        Ok(self.token.as_deref().map(AccessToken::new))
    }
}

#[derive(Default)]
pub(crate) struct FakeAnalytics {
    reports: Vec<Report>,
    dataset: Dataset,
    embed_token: Option<String>,
    fail_listing: bool,
    connects: AtomicUsize,
    list_calls: AtomicUsize,
    dataset_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    last_bearer: Mutex<Option<String>>,
    last_api_url: Mutex<Option<String>>,
    last_dataset: Mutex<Option<String>>,
    last_report: Mutex<Option<String>>,
    last_request: Mutex<Option<GenerateTokenRequest>>,
}

impl FakeAnalytics {
    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
    pub(crate) fn dataset_calls(&self) -> usize {
        self.dataset_calls.load(Ordering::SeqCst)
    }
    pub(crate) fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
    pub(crate) fn total_calls(&self) -> usize {
        self.connects()
            + self.list_calls.load(Ordering::SeqCst)
            + self.dataset_calls()
            + self.generate_calls()
    }
    pub(crate) fn last_bearer(&self) -> Option<String> {
        self.last_bearer.lock().unwrap().clone()
    }
    pub(crate) fn last_api_url(&self) -> Option<String> {
        self.last_api_url.lock().unwrap().clone()
    }
    pub(crate) fn last_dataset(&self) -> Option<String> {
        self.last_dataset.lock().unwrap().clone()
    }
    pub(crate) fn last_report(&self) -> Option<String> {
        self.last_report.lock().unwrap().clone()
    }
    pub(crate) fn last_request(&self) -> Option<GenerateTokenRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

struct FakeConnector(Arc<FakeAnalytics>);

struct FakeClient(Arc<FakeAnalytics>);

impl AnalyticsConnector for FakeConnector {
    fn connect(&self, api_url: &str, token: AccessToken) -> Box<dyn AnalyticsApi> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        *self.0.last_bearer.lock().unwrap() = Some(token.access_token);
        *self.0.last_api_url.lock().unwrap() = Some(api_url.to_string());
        Box::new(FakeClient(Arc::clone(&self.0)))
    }
}

#[async_trait]
impl AnalyticsApi for FakeClient {
    async fn list_reports(&self, _workspace_id: &str) -> Result<Vec<Report>> {
        self.0.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_listing {
            return Err(EmbedError::Upstream {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        Ok(self.0.reports.clone())
    }

    async fn get_dataset(&self, _workspace_id: &str, dataset_id: &str) -> Result<Dataset> {
        self.0.dataset_calls.fetch_add(1, Ordering::SeqCst);
        *self.0.last_dataset.lock().unwrap() = Some(dataset_id.to_string());
        Ok(self.0.dataset.clone())
    }

    async fn generate_token(
        &self,
        _workspace_id: &str,
        report_id: &str,
        request: &GenerateTokenRequest,
    ) -> Result<Option<EmbedToken>> {
        self.0.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.0.last_report.lock().unwrap() = Some(report_id.to_string());
        *self.0.last_request.lock().unwrap() = Some(request.clone());
        Ok(self.0.embed_token.clone().map(|token| EmbedToken {
            token,
            token_id: None,
            expiration: None,
        }))
    }
}

/// A service wired to fakes, plus handles to inspect what they saw.
pub(crate) struct Fixture {
    pub(crate) identity: Arc<FakeIdentity>,
    pub(crate) analytics: Arc<FakeAnalytics>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            identity: Arc::new(FakeIdentity {
                token: Some("aad-token".into()),
                fail: false,
                calls: AtomicUsize::new(0),
            }),
            analytics: Arc::new(FakeAnalytics {
                reports: vec![report("R1")],
                embed_token: Some("T1".into()),
                ..FakeAnalytics::default()
            }),
        }
    }

    fn identity_mut(&mut self) -> &mut FakeIdentity {
        Arc::get_mut(&mut self.identity).expect("fixture configured after use")
    }

    fn analytics_mut(&mut self) -> &mut FakeAnalytics {
        Arc::get_mut(&mut self.analytics).expect("fixture configured after use")
    }

    pub(crate) fn without_access_token(mut self) -> Self {
        self.identity_mut().token = None;
        self
    }

    pub(crate) fn failing_identity(mut self) -> Self {
        self.identity_mut().fail = true;
        self
    }

    pub(crate) fn with_reports(mut self, reports: Vec<Report>) -> Self {
        self.analytics_mut().reports = reports;
        self
    }

    pub(crate) fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.analytics_mut().dataset = dataset;
        self
    }

    pub(crate) fn with_embed_token(mut self, token: &str) -> Self {
        self.analytics_mut().embed_token = Some(token.to_string());
        self
    }

    pub(crate) fn without_embed_token(mut self) -> Self {
        self.analytics_mut().embed_token = None;
        self
    }

    pub(crate) fn failing_listing(mut self) -> Self {
        self.analytics_mut().fail_listing = true;
        self
    }

    pub(crate) fn service(&self) -> EmbedService {
        self.service_with_identity(Arc::clone(&self.identity) as Arc<dyn IdentityProvider>)
    }

    /// Real identity provider in front of the fake analytics API.
    pub(crate) fn service_with_identity(&self, identity: Arc<dyn IdentityProvider>) -> EmbedService {
        EmbedService::new(identity, Arc::new(FakeConnector(Arc::clone(&self.analytics))))
    }
}
