//! Simulated cloud session for development and testing.

mod sensors;

pub use sensors::{default_devices, refresh_readings, run_sensor_simulation, simulated_readings};
