//! Constants and configuration values for gpufan
//!
//! Centralizes every threshold, level, path and timing used by the daemon.
//! Other modules refer to these by name; `ControlConfig::default()` is built
//! from them.

use std::time::Duration;

/// System paths
pub mod paths {
    /// Glob matching the hwmon instances enumerated during discovery
    pub const HWMON_ROOT_PATTERN: &str = "/sys/class/hwmon/hwmon?";

    /// Driver identity the `name` attribute must report
    pub const TARGET_DRIVER: &str = "amdgpu";
}

/// Attribute file names and masks inside a hwmon root
pub mod attributes {
    /// Driver identity attribute
    pub const NAME: &str = "name";

    /// Temperature label files (`temp1_label`, `temp2_label`, ...)
    pub const TEMP_LABEL_MASK: &str = "temp?_label";

    pub const TEMP_LABEL_SUFFIX: &str = "_label";
    pub const TEMP_INPUT_SUFFIX: &str = "_input";

    /// Label of the die hot-spot sensor
    pub const JUNCTION_LABEL: &str = "junction";

    /// Fan mode attribute
    pub const PWM_ENABLE_MASK: &str = "pwm?_enable";

    /// Duty cycle attribute
    pub const PWM_MASK: &str = "pwm?";
}

/// Temperature thresholds in degrees Celsius
pub mod temperature {
    /// Raw hwmon readings are millidegrees
    pub const MILLIDEGREE_DIVISOR: u32 = 1000;

    /// At or above: full speed, force cooling engaged
    pub const MAX_SPEED_TEMP: u32 = 80;

    /// Above, while force cooling is engaged: stay at full speed
    pub const FORCE_COOLING_TEMP: u32 = 70;

    /// At or above: moderate speed
    pub const SLOW_COOLING_TEMP: u32 = 65;

    /// At or above: minimal speed; below: fan off
    pub const STOP_COOLING_TEMP: u32 = 57;
}

/// PWM duty cycle values (0-255)
pub mod pwm {
    /// ~3600 RPM
    pub const MAX_LEVEL: u8 = 255;

    /// ~2000 RPM
    pub const MODERATE_LEVEL: u8 = 127;

    /// ~800 RPM
    pub const MINIMAL_LEVEL: u8 = 64;

    pub const OFF_LEVEL: u8 = 0;

    /// `pwmN_enable` mode codes
    pub mod enable {
        /// Userspace sets the duty cycle directly
        pub const MANUAL: u64 = 1;
    }
}

/// Timing
pub mod timing {
    use super::Duration;

    /// Discovery attempts before giving up (~2 minutes at the default interval)
    pub const DISCOVERY_ATTEMPTS: u32 = 120;

    /// Pause between discovery attempts
    pub const DISCOVERY_INTERVAL: Duration = Duration::from_secs(1);

    /// Pause between control loop iterations
    pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
}
