//! Sensor simulation for testing.
//!
//! Fills a [`CachedController`] with plausible air quality readings, the
//! way the cloud session would after each refresh.

use crate::controller::{CachedController, SensorReadings};
use crate::device::{Device, DeviceList};
use crate::sensors::SensorKind;
use log::{info, warn};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use tokio::task::JoinHandle;
use tokio::time::interval;

/// Sensor id the cloud reports that has no catalog entry.
const UNCATALOGUED_SENSOR_ID: u16 = 1;

/// Chance that a refresh loses a device's readings, as a failed cloud call would.
const DROP_PROBABILITY: f64 = 0.05;

/// Typical reading and jitter amplitude for a sensor kind.
fn baseline(kind: SensorKind) -> (f64, f64) {
    match kind {
        SensorKind::Temperature => (22.0, 1.5),
        SensorKind::Humidity => (45.0, 5.0),
        SensorKind::Pm25 => (12.0, 6.0),
        SensorKind::Hcho => (0.03, 0.02),
        SensorKind::Tvoc => (0.2, 0.1),
        SensorKind::Eco2 => (600.0, 150.0),
        SensorKind::Pm10 => (18.0, 8.0),
    }
}

/// Decimal places of the mapped value.
fn precision(kind: SensorKind) -> i32 {
    match kind {
        SensorKind::Temperature => 1,
        SensorKind::Hcho | SensorKind::Tvoc => 3,
        _ => 0,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Built-in device used when no device list is configured.
pub fn default_devices() -> DeviceList {
    let device = Device::new("sim-0001", "JQ", "JQ-300", "Living Room");
    DeviceList::from([(device.id.clone(), device)])
}

/// Generate one refresh worth of (mapped, raw) readings.
///
/// Raw values keep full precision; mapped values are rounded for display.
pub fn simulated_readings<R: Rng>(rng: &mut R) -> (SensorReadings, SensorReadings) {
    let mut mapped = SensorReadings::new();
    let mut raw = SensorReadings::new();

    for kind in SensorKind::iter() {
        let (center, spread) = baseline(kind);
        let value = (center + rng.gen_range(-spread..=spread)).max(0.0);
        raw.insert(kind.id(), value);
        mapped.insert(kind.id(), round_to(value, precision(kind)));
    }

    let status = f64::from(rng.gen_range(0u8..=3));
    mapped.insert(UNCATALOGUED_SENSOR_ID, status);
    raw.insert(UNCATALOGUED_SENSOR_ID, status);

    (mapped, raw)
}

/// Refresh every device's readings once, occasionally dropping a device.
pub fn refresh_readings(controller: &CachedController, devices: &DeviceList) {
    let mut rng = rand::thread_rng();
    for device in devices.values() {
        if rng.gen_bool(DROP_PROBABILITY) {
            warn!("[Sim] Dropping readings for {}", device.name);
            controller.clear_sensors(&device.id);
            continue;
        }
        let (mapped, raw) = simulated_readings(&mut rng);
        controller.update_sensors(&device.id, mapped, raw);
    }
}

/// Spawn a task that periodically refreshes the controller's cache.
///
/// # Returns
///
/// A `JoinHandle` that can be used to abort the simulation task.
pub fn run_sensor_simulation(
    controller: Arc<CachedController>,
    devices: DeviceList,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval(every);
        loop {
            interval.tick().await;
            refresh_readings(&controller, &devices);
            info!("[Sim] Refreshed readings for {} device(s)", devices.len());
        }
    })
}
