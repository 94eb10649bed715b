//! Runtime configuration
//!
//! There is no config file: the daemon runs with `ControlConfig::default()`,
//! which is assembled from `constants`. The struct exists so tests and the
//! daemon share one validated view of those values.

use std::time::Duration;

use gf_error::{GpufanError, Result};

use crate::constants::{paths, timing};
use crate::engine::CoolingPolicy;
use crate::hw::Discovery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlConfig {
    /// Driver reported by the hwmon `name` attribute
    pub driver: String,
    /// Glob enumerating candidate hwmon roots
    pub root_pattern: String,
    pub discovery_attempts: u32,
    pub discovery_interval: Duration,
    pub poll_interval: Duration,
    pub policy: CoolingPolicy,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            driver: paths::TARGET_DRIVER.to_string(),
            root_pattern: paths::HWMON_ROOT_PATTERN.to_string(),
            discovery_attempts: timing::DISCOVERY_ATTEMPTS,
            discovery_interval: timing::DISCOVERY_INTERVAL,
            poll_interval: timing::POLL_INTERVAL,
            policy: CoolingPolicy::default(),
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<()> {
        if self.driver.trim().is_empty() {
            return Err(GpufanError::invalid_config("driver", "must not be empty"));
        }
        if self.root_pattern.trim().is_empty() {
            return Err(GpufanError::invalid_config("root_pattern", "must not be empty"));
        }
        if self.discovery_attempts == 0 {
            return Err(GpufanError::invalid_config("discovery_attempts", "must be at least 1"));
        }
        if self.poll_interval.is_zero() {
            return Err(GpufanError::invalid_config("poll_interval", "must be greater than zero"));
        }
        self.policy.thresholds.validate()
    }

    /// Discovery configured from these settings
    pub fn discovery(&self) -> Discovery {
        Discovery::new(self.driver.as_str())
            .with_pattern(self.root_pattern.as_str())
            .with_max_attempts(self.discovery_attempts)
            .with_retry_interval(self.discovery_interval)
    }
}
