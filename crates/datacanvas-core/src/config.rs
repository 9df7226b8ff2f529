//! SDK configuration.
//!
//! All four connection settings are required; construction fails with a
//! [`ConfigError`] before any network activity if one is missing or invalid.

use std::fmt;
use std::time::Duration;
use url::Url;

/// Default request timeout (connect + read).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable names read by [`SdkConfig::from_env`].
pub mod env {
    /// Client access key ID
    pub const ACCESS_KEY_CLIENT: &str = "DATACANVAS_ACCESS_KEY_CLIENT";
    /// Secret access key
    pub const ACCESS_KEY_SECRET: &str = "DATACANVAS_ACCESS_KEY_SECRET";
    /// Project ID scoping every request
    pub const PROJECT_ID: &str = "DATACANVAS_PROJECT_ID";
    /// API base URL
    pub const BASE_URL: &str = "DATACANVAS_BASE_URL";
    /// Optional request timeout in whole seconds
    pub const TIMEOUT_SECS: &str = "DATACANVAS_TIMEOUT_SECS";
}

fn default_user_agent() -> String {
    format!("datacanvas-sdk-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Immutable, validated configuration shared by the client and its transport.
#[derive(Clone, PartialEq, Eq)]
pub struct SdkConfig {
    access_key_client: String,
    access_key_secret: String,
    project_id: u64,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl SdkConfig {
    /// Create a configuration with the default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns error if any field is empty, `project_id` is not positive, or
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(
        access_key_client: impl Into<String>,
        access_key_secret: impl Into<String>,
        project_id: i64,
        base_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::builder()
            .access_key_client(access_key_client)
            .access_key_secret(access_key_secret)
            .project_id(project_id)
            .base_url(base_url)
            .build()
    }

    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> SdkConfigBuilder {
        SdkConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATACANVAS_ACCESS_KEY_CLIENT`: client access key ID (required)
    /// - `DATACANVAS_ACCESS_KEY_SECRET`: secret access key (required)
    /// - `DATACANVAS_PROJECT_ID`: positive project ID (required)
    /// - `DATACANVAS_BASE_URL`: API base URL (required)
    /// - `DATACANVAS_TIMEOUT_SECS`: request timeout in seconds (optional)
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or any value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
        };

        let project_raw = required(env::PROJECT_ID)?;
        let project_id = project_raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidEnv {
                name: env::PROJECT_ID,
                value: project_raw.clone(),
            })?;

        let mut builder = Self::builder()
            .access_key_client(required(env::ACCESS_KEY_CLIENT)?)
            .access_key_secret(required(env::ACCESS_KEY_SECRET)?)
            .project_id(project_id)
            .base_url(required(env::BASE_URL)?);

        if let Ok(raw) = std::env::var(env::TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    name: env::TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Client access key ID.
    #[must_use]
    pub fn access_key_client(&self) -> &str {
        &self.access_key_client
    }

    /// Secret access key.
    #[must_use]
    pub fn access_key_secret(&self) -> &str {
        &self.access_key_secret
    }

    /// Project every request is scoped to.
    #[must_use]
    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("access_key_client", &self.access_key_client)
            .field("access_key_secret", &"***")
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for [`SdkConfig`].
#[derive(Debug, Clone, Default)]
pub struct SdkConfigBuilder {
    access_key_client: Option<String>,
    access_key_secret: Option<String>,
    project_id: Option<i64>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SdkConfigBuilder {
    /// Set the client access key ID.
    #[must_use]
    pub fn access_key_client(mut self, value: impl Into<String>) -> Self {
        self.access_key_client = Some(value.into());
        self
    }

    /// Set the secret access key.
    #[must_use]
    pub fn access_key_secret(mut self, value: impl Into<String>) -> Self {
        self.access_key_secret = Some(value.into());
        self
    }

    /// Set the project ID.
    #[must_use]
    pub fn project_id(mut self, value: i64) -> Self {
        self.project_id = Some(value);
        self
    }

    /// Set the API base URL.
    #[must_use]
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.user_agent = Some(value.into());
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, naming the offending field.
    pub fn build(self) -> Result<SdkConfig, ConfigError> {
        let access_key_client = non_empty(self.access_key_client, "access_key_client")?;
        let access_key_secret = non_empty(self.access_key_secret, "access_key_secret")?;

        let project_id = self.project_id.ok_or(ConfigError::Missing("project_id"))?;
        let project_id = u64::try_from(project_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ConfigError::InvalidProjectId(project_id))?;

        let base_url = non_empty(self.base_url, "base_url")?;
        let base_url = normalize_base_url(&base_url)?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(SdkConfig {
            access_key_client,
            access_key_secret,
            project_id,
            base_url,
            timeout,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        })
    }
}

fn non_empty(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(field))
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("must not contain a query or fragment".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Errors raised while constructing a configuration or client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required field is missing or blank
    #[error("invalid configuration: {0} is required and must be a non-empty string")]
    Missing(&'static str),
    /// Project ID is zero or negative
    #[error("invalid configuration: project_id must be a positive integer, got {0}")]
    InvalidProjectId(i64),
    /// Base URL is not an absolute http(s) URL
    #[error("invalid configuration: base_url {url:?} is invalid: {reason}")]
    InvalidBaseUrl {
        /// The rejected value
        url: String,
        /// Why it was rejected
        reason: String,
    },
    /// Timeout of zero would fail every request
    #[error("invalid configuration: timeout must be greater than zero")]
    ZeroTimeout,
    /// Required environment variable is not set
    #[error("invalid configuration: environment variable {0} is not set")]
    MissingEnv(&'static str),
    /// Environment variable could not be parsed
    #[error("invalid configuration: {name} has invalid value {value:?}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// The rejected value
        value: String,
    },
    /// A credential cannot be sent as an HTTP header value
    #[error("invalid configuration: {0} contains characters not allowed in an HTTP header")]
    InvalidHeader(&'static str),
    /// HTTP client initialization failed
    #[error("client init error: {0}")]
    Init(String),
}
