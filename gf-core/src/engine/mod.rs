//! Cooling policy and control loop

pub mod controller;
pub mod policy;

pub use controller::{Controller, Tick};
pub use policy::{decide, CoolingDecision, CoolingPolicy, CoolingRegime, SpeedLevels, Thresholds};
