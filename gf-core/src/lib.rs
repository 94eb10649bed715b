//! gpufan core library
//!
//! Keeps an AMD GPU's junction temperature in a safe band by driving its
//! hwmon PWM fan output.
//!
//! # Module Structure
//!
//! - `hw/` - attribute access, hwmon root discovery, sensor and PWM operations
//! - `engine/` - hysteresis cooling policy and the control loop
//! - `config` - validated runtime configuration
//! - `constants` - thresholds, levels, paths and timings
//!
//! # Example
//!
//! ```no_run
//! use gf_core::{ControlConfig, Controller, SysfsStore};
//!
//! let config = ControlConfig::default();
//! let store = SysfsStore::new();
//! let root = config.discovery().find_root(&store).unwrap();
//! let controller = Controller::start(store, root, config.policy, config.poll_interval).unwrap();
//! let _ = controller.run();
//! ```

pub mod config;
pub mod constants;
pub mod engine;
pub mod hw;

pub use config::ControlConfig;
pub use engine::{decide, Controller, CoolingDecision, CoolingPolicy, CoolingRegime, SpeedLevels, Thresholds, Tick};
pub use gf_error::{GpufanError, Result};
pub use hw::{
    current_temperature, enable_manual_control, find_single_attribute, read_unsigned, set_speed,
    AttributeStore, Discovery, SensorRoot, SpeedChange, SysfsStore,
};
