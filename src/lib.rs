//! JQ-300 sensor bridge library.
//!
//! This library republishes indoor air quality readings held by a cloud
//! account controller as individually addressable sensor entities.

pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod host;
pub mod input;
pub mod platform;
pub mod sensors;
