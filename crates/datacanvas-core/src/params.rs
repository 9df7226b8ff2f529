//! Data-query parameters and their client-side validation.
//!
//! [`DataQuery`] holds what the caller asked for; [`validate`] turns it into a
//! [`GetDataParams`] with defaults applied, or rejects it before any request
//! is made. Out-of-range values are rejected, never clamped.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DataCanvasError;

/// Default page (0-indexed).
pub const DEFAULT_PAGE: u64 = 0;

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 1000;

/// Sort order of returned records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DataCanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(DataCanvasError::validation(format!(
                "order must be one of ASC, DESC; got {s:?}"
            )))
        }
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.as_str().to_string()
    }
}

/// Raw parameters for a data query, as supplied by the caller.
///
/// ```
/// use datacanvas_core::{validate, DataQuery, SortOrder};
///
/// let query = DataQuery::new("temperature_sensors")
///     .devices([3, 1, 3])
///     .limit(50)
///     .order(SortOrder::Asc);
/// let params = validate(&query).unwrap();
/// assert_eq!(params.devices.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataQuery {
    /// Datatable to query
    pub table_name: String,
    /// Device IDs to filter on; empty means all devices
    pub devices: Vec<i64>,
    /// Page number (0-indexed)
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
    /// Sort order, matched case-insensitively against `ASC` / `DESC`
    pub order: Option<String>,
}

impl DataQuery {
    /// Query a datatable with default paging and ordering.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Restrict results to these devices.
    #[must_use]
    pub fn devices(mut self, devices: impl IntoIterator<Item = i64>) -> Self {
        self.devices = devices.into_iter().collect();
        self
    }

    /// Select a page.
    #[must_use]
    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the sort order, either a [`SortOrder`] or its text form.
    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

/// Validated, normalized parameters for a data query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDataParams {
    /// Datatable to query (non-blank)
    pub table_name: String,
    /// Device filter, deduplicated; empty means all devices
    pub devices: BTreeSet<u64>,
    /// Page number
    pub page: u64,
    /// Page size, in `1..=MAX_LIMIT`
    pub limit: u32,
    /// Sort order
    pub order: SortOrder,
}

impl GetDataParams {
    /// Serialize to query-string pairs.
    ///
    /// The device filter is sent as a single comma-joined `devices` value in
    /// ascending order and omitted when empty.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("datatable_name", self.table_name.clone())];
        if !self.devices.is_empty() {
            let joined = self
                .devices
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("devices", joined));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("order", self.order.as_str().to_string()));
        pairs
    }
}

impl From<&GetDataParams> for DataQuery {
    fn from(params: &GetDataParams) -> Self {
        Self {
            table_name: params.table_name.clone(),
            // Validated IDs are positive and came from i64 input
            devices: params
                .devices
                .iter()
                .filter_map(|d| i64::try_from(*d).ok())
                .collect(),
            page: i64::try_from(params.page).ok(),
            limit: Some(i64::from(params.limit)),
            order: Some(params.order.into()),
        }
    }
}

/// Validate a raw query and apply defaults.
///
/// # Errors
///
/// Returns a `Validation` error, naming the offending field, if the table
/// name is blank, `page` is negative, `limit` is outside `1..=1000`, a device
/// ID is not positive, or `order` is not `ASC`/`DESC`.
pub fn validate(query: &DataQuery) -> Result<GetDataParams, DataCanvasError> {
    if query.table_name.trim().is_empty() {
        return Err(DataCanvasError::validation(
            "table_name is required and cannot be empty",
        ));
    }

    let page = match query.page {
        None => DEFAULT_PAGE,
        Some(p) => u64::try_from(p).map_err(|_| {
            DataCanvasError::validation(format!("page must be a non-negative integer; got {p}"))
        })?,
    };

    let limit = match query.limit {
        None => DEFAULT_LIMIT,
        Some(l) => u32::try_from(l)
            .ok()
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(|| {
                DataCanvasError::validation(format!(
                    "limit must be between 1 and {MAX_LIMIT}; got {l}"
                ))
            })?,
    };

    let devices = query
        .devices
        .iter()
        .map(|d| {
            u64::try_from(*d).ok().filter(|d| *d > 0).ok_or_else(|| {
                DataCanvasError::validation(format!(
                    "devices must be positive integers; got {d}"
                ))
            })
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    let order = match &query.order {
        None => SortOrder::default(),
        Some(o) => o.trim().parse()?,
    };

    Ok(GetDataParams {
        table_name: query.table_name.clone(),
        devices,
        page,
        limit,
        order,
    })
}

/// Parse a comma-separated device list such as `"1, 2,3"`.
///
/// Blank input yields an empty list (no filter).
///
/// # Errors
///
/// Returns a `Validation` error naming the first entry that is not an integer.
pub fn parse_devices(raw: &str) -> Result<Vec<i64>, DataCanvasError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                DataCanvasError::validation(format!("devices must be integers; got {s:?}"))
            })
        })
        .collect()
}
