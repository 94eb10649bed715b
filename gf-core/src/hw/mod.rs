//! Hardware interaction modules
//!
//! - `attributes` - attribute store abstraction and the sysfs implementation
//! - `discovery` - locating the hwmon root of the target driver
//! - `control` - temperature, fan mode and PWM operations on that root

pub mod attributes;
pub mod control;
pub mod discovery;

pub use attributes::{pattern_in, read_unsigned, AttributeStore, SysfsStore};
#[cfg(test)]
pub use attributes::MockAttributeStore;
pub use control::{current_temperature, enable_manual_control, find_single_attribute, set_speed, SpeedChange};
pub use discovery::{Discovery, SensorRoot};
