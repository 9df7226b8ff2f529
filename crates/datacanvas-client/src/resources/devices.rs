use datacanvas_core::types::decode;
use datacanvas_core::{endpoints, DataCanvasError, DeviceResponse};

use crate::transport::Transport;

/// Device operations.
#[derive(Debug)]
pub struct DevicesResource<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> DevicesResource<'a, T> {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// List every device in the configured project, in server order.
    ///
    /// The endpoint is not paginated.
    ///
    /// # Errors
    ///
    /// Returns the classified error on a non-2xx response, or `Network` on
    /// connectivity failure or an unexpected response body.
    pub fn list(&self) -> Result<DeviceResponse, DataCanvasError> {
        let raw = self.transport.execute(endpoints::DEVICES, &[])?;
        let response: DeviceResponse = decode(&raw)?;

        tracing::info!(
            devices = response.devices.len(),
            success = response.success,
            "Fetched devices"
        );
        Ok(response)
    }
}
