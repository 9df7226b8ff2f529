//! Top-level client.

use datacanvas_core::{ConfigError, SdkConfig};
use std::fmt;

use crate::resources::{DataResource, DevicesResource};
use crate::transport::{HttpTransport, Transport};

/// Entry point to the DataCanvas API.
///
/// Owns the configuration and the transport. The connection is acquired on
/// construction and released exactly once, either by [`close`](Self::close)
/// or when the client is dropped.
pub struct DataCanvas<T: Transport = HttpTransport> {
    config: SdkConfig,
    transport: T,
    closed: bool,
}

impl DataCanvas<HttpTransport> {
    /// Create a client backed by an HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP transport cannot be created from `config`.
    pub fn new(config: SdkConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client from `DATACANVAS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if the environment does not hold a valid configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(SdkConfig::from_env()?)
    }
}

impl<T: Transport> DataCanvas<T> {
    /// Create a client over an existing transport.
    pub fn with_transport(config: SdkConfig, transport: T) -> Self {
        tracing::debug!(
            base_url = config.base_url(),
            project_id = config.project_id(),
            "DataCanvas client initialized"
        );
        Self {
            config,
            transport,
            closed: false,
        }
    }

    /// Device operations.
    #[must_use]
    pub fn devices(&self) -> DevicesResource<'_, T> {
        DevicesResource::new(&self.transport)
    }

    /// Datatable operations.
    #[must_use]
    pub fn data(&self) -> DataResource<'_, T> {
        DataResource::new(&self.transport)
    }

    /// Configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the connection now instead of at end of scope.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.transport.close();
        tracing::debug!(base_url = self.config.base_url(), "DataCanvas client closed");
    }
}

impl<T: Transport> Drop for DataCanvas<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Transport> fmt::Debug for DataCanvas<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCanvas")
            .field("base_url", &self.config.base_url())
            .field("project_id", &self.config.project_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SdkConfig {
        SdkConfig::new("k", "s", 1, "https://custom.example.com/api").unwrap()
    }

    #[test]
    fn client_creation() {
        let client = DataCanvas::new(config()).unwrap();
        assert_eq!(client.config().project_id(), 1);
        assert!(!client.transport().is_closed());
    }

    #[test]
    fn debug_shows_base_url_only() {
        let client = DataCanvas::new(config()).unwrap();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("custom.example.com"));
        assert!(!rendered.contains("\"s\""));
    }
}
