//! Cloud account controller interface.
//!
//! A controller owns the cloud session for one account and keeps cached
//! snapshots of the account's devices and their latest readings. Entities
//! only ever read from it.

mod cached;

pub use cached::CachedController;

use crate::device::DeviceList;
use crate::error::Result;
use crate::sensors::SensorKind;
use std::collections::BTreeMap;

/// Readings for one device keyed by the cloud's numeric sensor id.
///
/// Keys are raw ids rather than [`SensorKind`] because the cloud may report
/// kinds the catalog does not know about.
pub type SensorReadings = BTreeMap<u16, f64>;

/// Read access to a cloud account's cached device and sensor data.
///
/// An empty list or snapshot means the data is unavailable, same as an error.
pub trait Controller: Send + Sync {
    /// Stable identifier of the account, used as the unique id prefix.
    fn unique_id(&self) -> &str;

    /// Whether the cloud session is currently usable.
    fn available(&self) -> bool;

    fn get_devices_list(&self) -> Result<DeviceList>;

    /// Latest readings normalised for display.
    fn get_sensors(&self, device_id: &str) -> Result<SensorReadings>;

    /// Latest readings as reported by the device.
    fn get_sensors_raw(&self, device_id: &str) -> Result<SensorReadings>;

    /// Unit the controller reports values of `kind` in.
    fn unit(&self, kind: SensorKind) -> Option<String>;
}
