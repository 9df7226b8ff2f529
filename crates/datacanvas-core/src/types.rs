//! Response entities for the devices and data endpoints.

use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{DataCanvasError, ErrorDetails};

/// An IoT device registered in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier
    pub device_id: i64,
    /// Human-readable name
    pub device_name: String,
}

/// Response of the devices listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResponse {
    /// Whether the server reported success
    #[serde(default)]
    pub success: bool,
    /// Devices, in server order
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// A single datatable row.
///
/// `id` and `device` are always present; every other column lands in
/// `extra` with its original JSON type and column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Row identifier
    #[serde(default)]
    pub id: i64,
    /// Device that produced the row
    #[serde(default)]
    pub device: i64,
    /// Schema-dependent columns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataPoint {
    /// Look up a schema-dependent column.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Data points grouped by device ID, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceGroups(Vec<(String, Vec<DataPoint>)>);

impl DeviceGroups {
    /// Points reported for a device.
    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<&[DataPoint]> {
        self.0
            .iter()
            .find(|(k, _)| k == device_id)
            .map(|(_, points)| points.as_slice())
    }

    /// Number of device groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Device IDs in server order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Groups in server order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DataPoint])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of points across all groups.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.0.iter().map(|(_, v)| v.len()).sum()
    }

    fn insert(&mut self, device_id: String, points: Vec<DataPoint>) {
        match self.0.iter_mut().find(|(k, _)| *k == device_id) {
            Some(slot) => slot.1 = points,
            None => self.0.push((device_id, points)),
        }
    }
}

impl FromIterator<(String, Vec<DataPoint>)> for DeviceGroups {
    fn from_iter<I: IntoIterator<Item = (String, Vec<DataPoint>)>>(iter: I) -> Self {
        let mut groups = Self::default();
        for (k, v) in iter {
            groups.insert(k, v);
        }
        groups
    }
}

impl IntoIterator for DeviceGroups {
    type Item = (String, Vec<DataPoint>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for DeviceGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct DeviceGroupsVisitor;

impl<'de> Visitor<'de> for DeviceGroupsVisitor {
    type Value = DeviceGroups;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping device IDs to arrays of data points")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DeviceGroups::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut groups = DeviceGroups(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        // JSON object keys arrive unique from `serde_json::Value`
        while let Some(entry) = access.next_entry::<String, Vec<DataPoint>>()? {
            groups.0.push(entry);
        }
        Ok(groups)
    }
}

impl<'de> Deserialize<'de> for DeviceGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DeviceGroupsVisitor)
    }
}

/// Response of a data query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    /// Total records matching the query, not the page size
    #[serde(default)]
    pub count: u64,
    /// Points grouped by device ID as reported by the server
    #[serde(default)]
    pub data: DeviceGroups,
}

/// Decode a successful JSON payload into a typed response.
///
/// # Errors
///
/// A payload that does not match the expected shape is a `Network` error:
/// the server answered 2xx but with something the caller cannot use.
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, DataCanvasError> {
    T::deserialize(value).map_err(|e| {
        DataCanvasError::Network(ErrorDetails {
            message: format!("unexpected response shape: {e}"),
            http_status: None,
            raw_body: Some(value.to_string()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn device_response_decodes() {
        let value = json!({"success": true, "devices": [{"device_id": 1, "device_name": "A"}]});
        let resp: DeviceResponse = decode(&value).unwrap();
        assert!(resp.success);
        assert_eq!(
            resp.devices,
            vec![Device {
                device_id: 1,
                device_name: "A".to_string()
            }]
        );
    }

    #[test]
    fn device_response_defaults() {
        let resp: DeviceResponse = decode(&json!({})).unwrap();
        assert!(!resp.success);
        assert!(resp.devices.is_empty());
    }

    #[test]
    fn device_order_preserved() {
        let value = json!({"success": true, "devices": [
            {"device_id": 9, "device_name": "z"},
            {"device_id": 2, "device_name": "b"},
            {"device_id": 5, "device_name": "m"}
        ]});
        let resp: DeviceResponse = decode(&value).unwrap();
        let ids: Vec<_> = resp.devices.iter().map(|d| d.device_id).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[test]
    fn malformed_device_is_network_error() {
        let value = json!({"success": true, "devices": [{"device_id": "one"}]});
        let err = decode::<DeviceResponse>(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.message().contains("unexpected response shape"));
        assert!(err.raw_body().is_some());
    }

    #[test]
    fn data_response_groups_and_order() {
        let value = json!({
            "count": 2,
            "data": {
                "1": [{"id": 10, "device": 1, "x": "a"}],
                "2": [{"id": 11, "device": 2, "x": "b"}]
            }
        });
        let resp: DataResponse = decode(&value).unwrap();
        assert_eq!(resp.count, 2);
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data.keys().collect::<Vec<_>>(), vec!["1", "2"]);

        let first = resp.data.get("1").unwrap();
        assert_eq!(first[0].id, 10);
        assert_eq!(first[0].device, 1);
        assert_eq!(first[0].field("x"), Some(&json!("a")));
        assert_eq!(resp.data.get("2").unwrap()[0].field("x"), Some(&json!("b")));
    }

    #[test]
    fn group_order_follows_server_not_numeric() {
        let value = json!({
            "count": 3,
            "data": {
                "10": [{"id": 1, "device": 10}],
                "2": [{"id": 2, "device": 2}, {"id": 3, "device": 2}]
            }
        });
        let resp: DataResponse = decode(&value).unwrap();
        assert_eq!(resp.data.keys().collect::<Vec<_>>(), vec!["10", "2"]);
        let ids: Vec<_> = resp.data.get("2").unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(resp.data.point_count(), 3);
    }

    #[test]
    fn many_groups_decode_in_order() {
        let mut data = Map::new();
        for id in (1..=5000).rev() {
            data.insert(id.to_string(), json!([]));
        }
        let value = json!({"count": 0, "data": Value::Object(data)});
        let resp: DataResponse = decode(&value).unwrap();
        assert_eq!(resp.data.len(), 5000);
        assert_eq!(resp.data.keys().next(), Some("5000"));
        assert_eq!(resp.data.keys().last(), Some("1"));
    }

    #[test]
    fn extra_fields_keep_types_and_order() {
        let value = json!({
            "id": 1,
            "device": 4,
            "temp": 21.5,
            "ok": true,
            "note": null,
            "tags": ["a", "b"],
            "meta": {"unit": "C"}
        });
        let point: DataPoint = decode(&value).unwrap();
        let keys: Vec<_> = point.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["temp", "ok", "note", "tags", "meta"]);
        assert_eq!(point.field("temp"), Some(&json!(21.5)));
        assert_eq!(point.field("note"), Some(&Value::Null));
        assert_eq!(point.field("meta"), Some(&json!({"unit": "C"})));
        assert!(point.field("id").is_none());
    }

    #[test]
    fn data_response_defaults() {
        let resp: DataResponse = decode(&json!({"data": null})).unwrap();
        assert_eq!(resp.count, 0);
        assert!(resp.data.is_empty());
    }

    #[test]
    fn data_response_serializes_back_in_order() {
        let value = json!({
            "count": 1,
            "data": {"7": [{"id": 1, "device": 7, "v": 3}], "3": []}
        });
        let resp: DataResponse = decode(&value).unwrap();
        let rendered = serde_json::to_string(&resp).unwrap();
        assert_eq!(
            rendered,
            r#"{"count":1,"data":{"7":[{"id":1,"device":7,"v":3}],"3":[]}}"#
        );
    }
}
