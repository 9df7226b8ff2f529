//! Credential-bearing HTTP transport.
//!
//! [`Transport`] is the seam between the resource facades and the network;
//! [`HttpTransport`] is the production implementation over a single reused
//! blocking `reqwest` client.

use datacanvas_core::{classify, ConfigError, DataCanvasError, SdkConfig};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Instant;

/// Header carrying the client access key ID.
pub const ACCESS_KEY_CLIENT_HEADER: &str = "X-Access-Key-Client";

/// Header carrying the secret access key.
pub const ACCESS_KEY_SECRET_HEADER: &str = "X-Access-Key-Secret";

/// Query parameter scoping every request to the configured project.
pub const PROJECT_ID_PARAM: &str = "project_id";

/// Executes authenticated GET requests against the API.
pub trait Transport {
    /// GET `path` with the given query parameters and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Non-2xx responses are classified into the matching error kind;
    /// connectivity failures and undecodable bodies are `Network` errors.
    fn execute(&self, path: &str, query: &[(&str, String)]) -> Result<Value, DataCanvasError>;

    /// Release the underlying connection. Must tolerate repeated calls.
    fn close(&mut self) {}
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    client: Option<Client>,
    base_url: String,
    project_id: u64,
}

impl HttpTransport {
    /// Create a transport with credentials and timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if a credential cannot be encoded as a header value or
    /// the HTTP client cannot be created.
    pub fn new(config: &SdkConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, header_value(config.user_agent(), "user_agent")?);
        headers.insert(
            ACCESS_KEY_CLIENT_HEADER,
            header_value(config.access_key_client(), "access_key_client")?,
        );
        let mut secret = header_value(config.access_key_secret(), "access_key_secret")?;
        secret.set_sensitive(true);
        headers.insert(ACCESS_KEY_SECRET_HEADER, secret);

        let client = Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Init(e.to_string()))?;

        tracing::debug!(
            base_url = config.base_url(),
            timeout = ?config.timeout(),
            "HTTP transport ready"
        );

        Ok(Self {
            client: Some(client),
            base_url: config.base_url().to_string(),
            project_id: config.project_id(),
        })
    }

    /// Whether [`Transport::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, path: &str, query: &[(&str, String)]) -> Result<Value, DataCanvasError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| DataCanvasError::network("transport is closed"))?;

        let url = format!("{}{}", self.base_url, path);
        let project_id = self.project_id.to_string();

        tracing::debug!(url = %url, params = query.len(), "GET");
        let started = Instant::now();

        let response = client
            .get(&url)
            .query(&[(PROJECT_ID_PARAM, project_id.as_str())])
            .query(query)
            .send()
            .map_err(|e| request_error(&e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| request_error(&e))?;

        tracing::debug!(url = %url, status, elapsed = ?started.elapsed(), "Response received");

        if !(200..300).contains(&status) {
            let err = classify(status, Some(&body));
            tracing::warn!(url = %url, status, kind = %err.kind(), message = err.message(), "Request failed");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| DataCanvasError::undecodable(status, &body, e))
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!(base_url = %self.base_url, "HTTP transport closed");
        }
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn header_value(value: &str, field: &'static str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(field))
}

fn request_error(err: &reqwest::Error) -> DataCanvasError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("network request failed: {err}")
    };
    tracing::warn!(error = %err, "Transport error");
    DataCanvasError::network(message)
}
