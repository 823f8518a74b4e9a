//! Polling sensor entity for one (device, sensor kind) pair.
//!
//! The entity never computes values itself. Each poll copies the latest
//! mapped and raw readings for its kind out of the controller's cache.

use super::Sensor;
use super::catalog::{DeviceClass, SensorKind};
use crate::controller::{Controller, SensorReadings};
use crate::device::Device;
use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

pub const ATTR_DEVICE_BRAND: &str = "device_brand";
pub const ATTR_DEVICE_MODEL: &str = "device_model";
pub const ATTR_DEVICE_ID: &str = "device_id";
pub const ATTR_RAW_STATE: &str = "raw_state";

#[derive(Debug, Clone, Copy)]
struct SensorState {
    value: f64,
    raw: f64,
    last_updated: DateTime<Utc>,
}

/// Serialisable view of an entity, for hosts that publish state as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct EntityState {
    pub entity_id: String,
    pub unique_id: String,
    pub name: String,
    pub state: f64,
    pub available: bool,
    pub unit_of_measurement: String,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    pub attributes: Map<String, Value>,
    pub last_updated: DateTime<Utc>,
}

/// Sensor entity for a JQ air quality meter reading.
///
/// Identity fields are fixed at construction. Only [`poll`](Self::poll)
/// changes the mapped/raw state pair, and it keeps the last known values
/// whenever the controller has no data.
pub struct JqSensor {
    controller: Arc<dyn Controller>,
    entity_id: String,
    unique_id: String,
    name: String,
    device_id: String,
    device_brand: String,
    device_model: String,
    kind: SensorKind,
    unit: String,
    state: RwLock<SensorState>,
    version: AtomicU32,
}

impl JqSensor {
    /// Create an entity seeded with `initial` as both mapped and raw state.
    pub fn new(
        controller: Arc<dyn Controller>,
        device: &Device,
        kind: SensorKind,
        initial: f64,
        entity_id: impl Into<String>,
    ) -> Self {
        let description = kind.description();
        let unit = controller
            .unit(kind)
            .unwrap_or_else(|| description.unit.to_string());
        let unique_id = format!("{}-{}-{}", controller.unique_id(), device.id, kind.id());

        Self {
            entity_id: entity_id.into(),
            unique_id,
            name: format!("{} {}", device.name, description.label),
            device_id: device.id.clone(),
            device_brand: device.brand.clone(),
            device_model: device.model.clone(),
            kind,
            unit,
            state: RwLock::new(SensorState {
                value: initial,
                raw: initial,
                last_updated: Utc::now(),
            }),
            version: AtomicU32::new(0),
            controller,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Availability follows the controller's cloud session.
    pub fn available(&self) -> bool {
        self.controller.available()
    }

    /// Current mapped (display) value.
    pub fn state(&self) -> f64 {
        self.state.read().value
    }

    /// Current raw value as reported by the device.
    pub fn raw_state(&self) -> f64 {
        self.state.read().raw
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.state.read().last_updated
    }

    pub fn device_class(&self) -> Option<DeviceClass> {
        self.kind.description().device_class
    }

    pub fn icon(&self) -> &'static str {
        self.kind.description().icon
    }

    pub fn unit_of_measurement(&self) -> &str {
        &self.unit
    }

    /// Always true: the cloud never pushes updates.
    pub fn should_poll(&self) -> bool {
        true
    }

    pub fn extra_state_attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert(ATTR_DEVICE_BRAND.to_string(), json!(self.device_brand));
        attrs.insert(ATTR_DEVICE_MODEL.to_string(), json!(self.device_model));
        attrs.insert(ATTR_DEVICE_ID.to_string(), json!(self.device_id));
        attrs.insert(ATTR_RAW_STATE.to_string(), json!(self.raw_state()));
        attrs
    }

    pub fn snapshot(&self) -> EntityState {
        let state = *self.state.read();
        EntityState {
            entity_id: self.entity_id.clone(),
            unique_id: self.unique_id.clone(),
            name: self.name.clone(),
            state: state.value,
            available: self.available(),
            unit_of_measurement: self.unit.clone(),
            icon: self.icon(),
            device_class: self.device_class(),
            attributes: self.extra_state_attributes(),
            last_updated: state.last_updated,
        }
    }

    /// Refresh state from the controller's cache.
    ///
    /// Mapped and raw values are read in two separate calls, so they may
    /// come from different controller refreshes.
    pub fn poll(&self) {
        let mapped = match self.controller.get_sensors(&self.device_id) {
            Ok(readings) if !readings.is_empty() => readings,
            Ok(_) => {
                debug!("[Poll] No data for {}, keeping last state", self.entity_id);
                return;
            }
            Err(e) => {
                debug!("[Poll] {} keeps last state: {}", self.entity_id, e);
                return;
            }
        };
        let raw = match self.controller.get_sensors_raw(&self.device_id) {
            Ok(readings) => readings,
            Err(e) => {
                debug!("[Poll] No raw data for {}: {}", self.entity_id, e);
                SensorReadings::new()
            }
        };

        let id = self.kind.id();
        let (changed, value, raw_value) = {
            let mut state = self.state.write();
            let old = *state;
            if let Some(value) = mapped.get(&id) {
                state.value = *value;
            }
            if let Some(raw_value) = raw.get(&id) {
                state.raw = *raw_value;
            }
            state.last_updated = Utc::now();
            (
                old.value != state.value || old.raw != state.raw,
                state.value,
                state.raw,
            )
        };

        if changed {
            self.version.fetch_add(1, Ordering::SeqCst);
        }
        debug!(
            "[Poll] Update state: {} = {} ({})",
            self.entity_id, value, raw_value
        );
    }
}

impl Sensor for JqSensor {
    fn version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }
}
