//! # DataCanvas Core
//!
//! I/O-free building blocks of the DataCanvas SDK.
//!
//! This crate provides:
//! - [`SdkConfig`]: validated client configuration
//! - [`DataCanvasError`]: the error taxonomy and the status [`classify`]er
//! - [`DataQuery`] / [`GetDataParams`]: raw and validated data-query parameters
//! - Response entities for the devices and data endpoints

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod endpoints;
pub mod error;
pub mod params;
pub mod types;

pub use config::{ConfigError, SdkConfig, SdkConfigBuilder};
pub use error::{classify, DataCanvasError, ErrorDetails, ErrorKind};
pub use params::{
    parse_devices, validate, DataQuery, GetDataParams, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE,
    MAX_LIMIT,
};
pub use types::{DataPoint, DataResponse, Device, DeviceGroups, DeviceResponse};
