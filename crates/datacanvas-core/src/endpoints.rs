//! API routes, relative to the configured base URL.

/// Devices registered in the project.
pub const DEVICES: &str = "/access-keys/external/devices";

/// Paginated datatable rows, grouped by device.
pub const DATA: &str = "/access-keys/external/data";
