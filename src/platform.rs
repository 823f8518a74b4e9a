//! Sensor platform setup.
//!
//! Turns a discovered device into one [`JqSensor`] per known sensor kind
//! and hands the whole batch to the host.

use crate::controller::Controller;
use crate::error::{BridgeError, Result};
use crate::host::EntityHost;
use crate::sensors::{JqSensor, SensorKind};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Discovery payload identifying one device of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryInfo {
    pub username: String,
    pub device_id: String,
}

impl DiscoveryInfo {
    pub fn new(username: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            device_id: device_id.into(),
        }
    }
}

/// Controllers of the running integration, keyed by account.
///
/// Built once when the integration starts and passed to every setup call.
#[derive(Default, Clone)]
pub struct IntegrationContext {
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl IntegrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, account_id: impl Into<String>, controller: Arc<dyn Controller>) {
        self.controllers.insert(account_id.into(), controller);
    }

    pub fn controller(&self, account_id: &str) -> Option<Arc<dyn Controller>> {
        self.controllers.get(account_id).cloned()
    }
}

/// Set up sensor entities for a discovered device.
///
/// Does nothing without a discovery payload. Any failure to read the
/// controller's device or sensor lists is logged and no entities are
/// registered; errors never reach the caller.
pub fn setup_platform<H: EntityHost>(
    ctx: &IntegrationContext,
    host: &mut H,
    discovery: Option<&DiscoveryInfo>,
) {
    let Some(discovery) = discovery else {
        return;
    };

    debug!("[Setup] Setup sensors for device {}", discovery.device_id);

    match build_entities(ctx, host, discovery) {
        Ok(entities) => host.add_entities(entities),
        Err(e) => error!("[Setup] {}", e),
    }
}

fn build_entities<H: EntityHost>(
    ctx: &IntegrationContext,
    host: &mut H,
    discovery: &DiscoveryInfo,
) -> Result<Vec<Arc<JqSensor>>> {
    let controller = ctx
        .controller(&discovery.username)
        .ok_or_else(|| BridgeError::UnknownAccount(discovery.username.clone()))?;

    let devices = controller
        .get_devices_list()
        .map_err(|e| {
            debug!("[Setup] Devices list error: {}", e);
            BridgeError::DevicesUnavailable
        })?;
    if devices.is_empty() {
        return Err(BridgeError::DevicesUnavailable);
    }
    let device = devices
        .get(&discovery.device_id)
        .ok_or_else(|| BridgeError::UnknownDevice(discovery.device_id.clone()))?;

    let unavailable = || BridgeError::SensorsUnavailable(device.name.clone());
    let readings = controller.get_sensors(&discovery.device_id).map_err(|e| {
        debug!("[Setup] Sensors error for {}: {}", discovery.device_id, e);
        unavailable()
    })?;
    if readings.is_empty() {
        return Err(unavailable());
    }

    let mut entities = Vec::new();
    for (&sensor_id, &value) in &readings {
        let Some(kind) = SensorKind::from_id(sensor_id) else {
            continue;
        };
        let entity_id =
            host.generate_entity_id(&format!("{}_{}", device.name, kind.entity_name()));
        debug!(
            "[Setup] Initialize {} for account {}",
            entity_id, discovery.username
        );
        entities.push(Arc::new(JqSensor::new(
            controller.clone(),
            device,
            kind,
            value,
            entity_id,
        )));
    }

    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{CachedController, SensorReadings};
    use crate::device::{Device, DeviceList};
    use crate::host::EntityRegistry;

    fn context(controller: Arc<CachedController>) -> IntegrationContext {
        let mut ctx = IntegrationContext::new();
        ctx.register("user@example.com", controller);
        ctx
    }

    fn controller_with_device() -> Arc<CachedController> {
        let controller = Arc::new(CachedController::new("acc"));
        controller.update_devices(DeviceList::from([(
            "D1".to_string(),
            Device::new("D1", "JQ", "JQ-300", "Bedroom"),
        )]));
        controller
    }

    #[test]
    fn test_no_discovery_is_noop() {
        let ctx = context(controller_with_device());
        let mut registry = EntityRegistry::new();
        setup_platform(&ctx, &mut registry, None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_kinds_are_skipped() {
        let controller = controller_with_device();
        controller.update_sensors(
            "D1",
            SensorReadings::from([(6, 12.0), (7, 0.03), (42, 5.0)]),
            SensorReadings::from([(6, 12.0), (7, 0.03), (42, 5.0)]),
        );
        let ctx = context(controller);
        let mut registry = EntityRegistry::new();

        setup_platform(
            &ctx,
            &mut registry,
            Some(&DiscoveryInfo::new("user@example.com", "D1")),
        );

        assert_eq!(registry.len(), 2);
        let pm25 = registry.get("sensor.bedroom_pm25").unwrap();
        assert_eq!(pm25.unique_id(), "acc-D1-6");
        assert_eq!(pm25.state(), 12.0);
        let hcho = registry.get("sensor.bedroom_hcho").unwrap();
        assert_eq!(hcho.unique_id(), "acc-D1-7");
        assert_eq!(hcho.name(), "Bedroom Formaldehyde");
    }

    #[test]
    fn test_empty_devices_list_aborts() {
        let controller = Arc::new(CachedController::new("acc"));
        controller.update_sensors(
            "D1",
            SensorReadings::from([(6, 12.0)]),
            SensorReadings::from([(6, 12.0)]),
        );
        let ctx = context(controller);
        let mut registry = EntityRegistry::new();

        setup_platform(
            &ctx,
            &mut registry,
            Some(&DiscoveryInfo::new("user@example.com", "D1")),
        );

        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_sensors_aborts() {
        let ctx = context(controller_with_device());
        let mut registry = EntityRegistry::new();

        setup_platform(
            &ctx,
            &mut registry,
            Some(&DiscoveryInfo::new("user@example.com", "D1")),
        );

        assert!(registry.is_empty());
    }

    #[test]
    fn test_sensors_fetched_by_discovery_id() {
        let controller = Arc::new(CachedController::new("acc"));
        controller.update_devices(DeviceList::from([(
            "D1".to_string(),
            Device::new("jq-0001", "JQ", "JQ-300", "Bedroom"),
        )]));
        controller.update_sensors(
            "D1",
            SensorReadings::from([(6, 12.0)]),
            SensorReadings::from([(6, 12.0)]),
        );
        let ctx = context(controller);
        let mut registry = EntityRegistry::new();

        setup_platform(
            &ctx,
            &mut registry,
            Some(&DiscoveryInfo::new("user@example.com", "D1")),
        );

        assert_eq!(registry.len(), 1);
        let pm25 = registry.get("sensor.bedroom_pm25").unwrap();
        assert_eq!(pm25.unique_id(), "acc-jq-0001-6");
    }

    #[test]
    fn test_unknown_account_and_device_abort() {
        let controller = controller_with_device();
        controller.update_sensors(
            "D1",
            SensorReadings::from([(6, 12.0)]),
            SensorReadings::from([(6, 12.0)]),
        );
        let ctx = context(controller);
        let mut registry = EntityRegistry::new();

        setup_platform(
            &ctx,
            &mut registry,
            Some(&DiscoveryInfo::new("other@example.com", "D1")),
        );
        setup_platform(
            &ctx,
            &mut registry,
            Some(&DiscoveryInfo::new("user@example.com", "D9")),
        );

        assert!(registry.is_empty());
    }

    #[test]
    fn test_discovery_info_field_names() {
        let info: DiscoveryInfo =
            serde_json::from_str(r#"{"username": "user@example.com", "device_id": "D1"}"#)
                .unwrap();
        assert_eq!(info, DiscoveryInfo::new("user@example.com", "D1"));
    }
}
