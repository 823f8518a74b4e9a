//! In-memory controller whose snapshots are pushed in by an owner task.

use super::{Controller, SensorReadings};
use crate::device::DeviceList;
use crate::error::Result;
use crate::sensors::SensorKind;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use strum::IntoEnumIterator;

#[derive(Debug, Default, Clone)]
struct DeviceSnapshot {
    mapped: SensorReadings,
    raw: SensorReadings,
}

/// Thread-safe controller backed by cached snapshots.
///
/// Whoever owns the cloud session (or a simulation) refreshes the cache via
/// [`update_devices`](Self::update_devices) and
/// [`update_sensors`](Self::update_sensors); entities read it through the
/// [`Controller`] trait. Units default to the catalog's units.
pub struct CachedController {
    unique_id: String,
    available: AtomicBool,
    devices: RwLock<DeviceList>,
    sensors: RwLock<HashMap<String, DeviceSnapshot>>,
    units: RwLock<HashMap<SensorKind, String>>,
}

impl CachedController {
    pub fn new(unique_id: impl Into<String>) -> Self {
        let units = SensorKind::iter()
            .map(|kind| (kind, kind.description().unit.to_string()))
            .collect();

        Self {
            unique_id: unique_id.into(),
            available: AtomicBool::new(true),
            devices: RwLock::new(DeviceList::new()),
            sensors: RwLock::new(HashMap::new()),
            units: RwLock::new(units),
        }
    }

    pub fn set_available(&self, available: bool) {
        let old = self.available.swap(available, Ordering::SeqCst);
        if old != available {
            debug!("[Controller] {} availability: {}", self.unique_id, available);
        }
    }

    /// Override the unit reported for a sensor kind.
    pub fn set_unit(&self, kind: SensorKind, unit: impl Into<String>) {
        self.units.write().insert(kind, unit.into());
    }

    pub fn update_devices(&self, devices: DeviceList) {
        *self.devices.write() = devices;
    }

    /// Replace both snapshots for a device.
    pub fn update_sensors(&self, device_id: &str, mapped: SensorReadings, raw: SensorReadings) {
        self.sensors
            .write()
            .insert(device_id.to_string(), DeviceSnapshot { mapped, raw });
    }

    /// Drop the cached readings for a device, as after a failed cloud fetch.
    pub fn clear_sensors(&self, device_id: &str) {
        self.sensors.write().remove(device_id);
    }
}

impl Controller for CachedController {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn get_devices_list(&self) -> Result<DeviceList> {
        Ok(self.devices.read().clone())
    }

    fn get_sensors(&self, device_id: &str) -> Result<SensorReadings> {
        Ok(self
            .sensors
            .read()
            .get(device_id)
            .map(|s| s.mapped.clone())
            .unwrap_or_default())
    }

    fn get_sensors_raw(&self, device_id: &str) -> Result<SensorReadings> {
        Ok(self
            .sensors
            .read()
            .get(device_id)
            .map(|s| s.raw.clone())
            .unwrap_or_default())
    }

    fn unit(&self, kind: SensorKind) -> Option<String> {
        self.units.read().get(&kind).cloned()
    }
}
