//! Device records as reported by the cloud's device list.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Device list keyed by device id.
pub type DeviceList = BTreeMap<String, Device>;

/// An air quality meter registered to a cloud account.
///
/// Field names follow the cloud's JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "deviceid")]
    pub id: String,
    #[serde(rename = "brandname", default)]
    pub brand: String,
    #[serde(rename = "pt_model", default)]
    pub model: String,
    /// Display name chosen by the owner in the vendor app.
    #[serde(rename = "pt_name")]
    pub name: String,
}

impl Device {
    pub fn new(
        id: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            name: name.into(),
        }
    }
}

/// Parse the cloud's device list payload (a JSON array of device records).
pub fn parse_device_list(json: &str) -> Result<DeviceList> {
    let devices: Vec<Device> = serde_json::from_str(json)?;
    Ok(devices.into_iter().map(|d| (d.id.clone(), d)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    #[test]
    fn test_parse_device_list() {
        let json = r#"[
            {"deviceid": "D1", "brandname": "JQ", "pt_model": "JQ-300", "pt_name": "Bedroom"},
            {"deviceid": "D2", "pt_name": "Office"}
        ]"#;

        let devices = parse_device_list(json).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(
            devices["D1"],
            Device::new("D1", "JQ", "JQ-300", "Bedroom")
        );
        assert_eq!(devices["D2"].name, "Office");
        assert_eq!(devices["D2"].brand, "");
    }

    #[test]
    fn test_parse_device_list_rejects_garbage() {
        let err = parse_device_list("{not json").unwrap_err();
        assert!(matches!(err, BridgeError::SerdeJsonError(_)));
    }
}
