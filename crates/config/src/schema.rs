use pbiembed_types::{ConfigIssue, PasswordCredential, TokenRequest};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix; nested keys are separated by `__`
/// (e.g. `PBIEMBED_IDENTITY__PASSWORD`).
pub const ENV_PREFIX: &str = "PBIEMBED_";

fn default_port() -> u16 {
    8018
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_authority_url() -> String {
    "https://login.windows.net/common/oauth2/authorize/".to_string()
}
fn default_resource_url() -> String {
    "https://analysis.windows.net/powerbi/api".to_string()
}
fn default_api_url() -> String {
    "https://api.powerbi.com/".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Service account and identity provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
    /// Resource (audience) the access token is requested for.
    #[serde(default = "default_resource_url")]
    pub resource_url: String,
    /// Registered application (client) id, a UUID.
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            authority_url: default_authority_url(),
            resource_url: default_resource_url(),
            application_id: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("IdentityConfig")
            .field("authority_url", &self.authority_url)
            .field("resource_url", &self.resource_url)
            .field("application_id", &self.application_id)
            .field("username", &self.username)
            .field("password", &password)
            .finish()
    }
}

impl IdentityConfig {
    /// Builds the token request for the configured service account.
    #[must_use]
    pub fn token_request(&self) -> TokenRequest {
        TokenRequest {
            authority_url: self.authority_url.clone(),
            resource: self.resource_url.clone(),
            client_id: self.application_id.trim().to_string(),
            credential: PasswordCredential::new(self.username.clone(), self.password.clone()),
        }
    }
}

/// Analytics hosting API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerBiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Workspace (group) id, a UUID.
    #[serde(default)]
    pub workspace_id: String,
    /// Report to embed; blank selects the first report in the workspace.
    #[serde(default)]
    pub report_id: String,
}

impl Default for PowerBiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            workspace_id: String::new(),
            report_id: String::new(),
        }
    }
}

impl PowerBiConfig {
    /// The configured report id, if one is set.
    #[must_use]
    pub fn report_id(&self) -> Option<&str> {
        let id = self.report_id.trim();
        (!id.is_empty()).then_some(id)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen port (defaults to 8018).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listen address (defaults to `127.0.0.1`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Outbound proxy for identity and Power BI requests.
    ///
    /// Read once when the HTTP client is built; a reload does not apply it.
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub powerbi: PowerBiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            proxy_url: None,
            log: LogConfig::default(),
            identity: IdentityConfig::default(),
            powerbi: PowerBiConfig::default(),
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn is_uuid(s: &str) -> bool {
    uuid::Uuid::parse_str(s.trim()).is_ok()
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults and
    /// overridden by `PBIEMBED_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        Self::load(Some(path))
    }

    /// Loads configuration from defaults and `PBIEMBED_*` environment
    /// variables, with an optional YAML file in between.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or a value
    /// has the wrong type.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Checks the settings the embed pipeline needs before any network call.
    ///
    /// Fields are checked in a fixed order and the first problem wins.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigIssue`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        let app_id = &self.identity.application_id;
        if is_blank(app_id) {
            return Err(ConfigIssue::ApplicationIdMissing);
        }
        if !is_uuid(app_id) {
            return Err(ConfigIssue::ApplicationIdNotUuid);
        }

        let workspace_id = &self.powerbi.workspace_id;
        if is_blank(workspace_id) {
            return Err(ConfigIssue::WorkspaceIdMissing);
        }
        if !is_uuid(workspace_id) {
            return Err(ConfigIssue::WorkspaceIdNotUuid);
        }

        if is_blank(&self.identity.username) {
            return Err(ConfigIssue::UsernameMissing);
        }
        if is_blank(&self.identity.password) {
            return Err(ConfigIssue::PasswordMissing);
        }
        Ok(())
    }

    /// Names the changed settings that only take effect after a restart.
    #[must_use]
    pub fn startup_only_changes(&self, next: &Config) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.host != next.host {
            changed.push("host");
        }
        if self.port != next.port {
            changed.push("port");
        }
        if self.proxy_url != next.proxy_url {
            changed.push("proxy_url");
        }
        if self.log.level != next.log.level || self.log.format != next.log.format {
            changed.push("log");
        }
        changed
    }
}
