//! Input sources that feed controller caches.
//!
//! Current input sources:
//! - `simulation`: jittered readings standing in for the cloud session

pub mod simulation;
