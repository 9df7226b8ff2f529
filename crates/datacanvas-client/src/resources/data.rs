use datacanvas_core::types::decode;
use datacanvas_core::{endpoints, validate, DataCanvasError, DataQuery, DataResponse};

use crate::transport::Transport;

/// Datatable query operations.
#[derive(Debug)]
pub struct DataResource<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> DataResource<'a, T> {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch one page of datatable rows, grouped by device.
    ///
    /// Parameters are validated first; an invalid query fails without any
    /// request being sent.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an invalid query, the classified error on a
    /// non-2xx response, or `Network` on connectivity failure or an
    /// unexpected response body.
    pub fn list(&self, query: &DataQuery) -> Result<DataResponse, DataCanvasError> {
        let params = validate(query).map_err(|err| {
            tracing::debug!(error = %err, "Rejected data query");
            err
        })?;

        tracing::debug!(
            table = %params.table_name,
            devices = params.devices.len(),
            page = params.page,
            limit = params.limit,
            order = %params.order,
            "Querying datatable"
        );

        let raw = self
            .transport
            .execute(endpoints::DATA, &params.to_query_pairs())?;
        let response: DataResponse = decode(&raw)?;

        tracing::info!(
            table = %params.table_name,
            count = response.count,
            groups = response.data.len(),
            points = response.data.point_count(),
            "Fetched datatable page"
        );
        Ok(response)
    }
}
