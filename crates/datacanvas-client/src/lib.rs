//! # DataCanvas Client
//!
//! Typed, blocking client for the DataCanvas IoT platform.
//!
//! ```no_run
//! use datacanvas_client::{DataCanvas, DataQuery, SdkConfig, SortOrder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SdkConfig::new("access-key-id", "secret", 123, "https://api.example.com")?;
//! let client = DataCanvas::new(config)?;
//!
//! let devices = client.devices().list()?;
//! let data = client.data().list(
//!     &DataQuery::new("temperature_sensors")
//!         .devices([1, 2, 3])
//!         .limit(50)
//!         .order(SortOrder::Desc),
//! )?;
//! println!("{} devices, {} records", devices.devices.len(), data.count);
//!
//! client.close();
//! # Ok(())
//! # }
//! ```
//!
//! Every call issues exactly one request and blocks until it completes; the
//! SDK never retries. Failures are [`DataCanvasError`]s.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod resources;
pub mod transport;

pub use client::DataCanvas;
pub use resources::{DataResource, DevicesResource};
pub use transport::{HttpTransport, Transport};

pub use datacanvas_core::{
    ConfigError, DataCanvasError, DataPoint, DataQuery, DataResponse, Device, DeviceGroups,
    DeviceResponse, ErrorKind, GetDataParams, SdkConfig, SortOrder,
};
