//! Sensor entities exposed to the home-automation host.
//!
//! Each entity mirrors one sensor kind of one air quality meter and is
//! refreshed by the host's polling loop.

pub mod catalog;
pub mod jq_sensor;

pub use catalog::{DeviceClass, SensorDescription, SensorKind};
pub use jq_sensor::{EntityState, JqSensor};

/// Trait for entities with change detection.
///
/// The version number is incremented each time the entity's value changes,
/// so hosts can skip publishing unchanged entities.
pub trait Sensor: Send + Sync {
    /// Get the current version number.
    fn version(&self) -> u32;
}
