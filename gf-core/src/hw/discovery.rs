//! Hwmon root discovery
//!
//! The GPU driver may register its hwmon node some time after the daemon
//! starts (early boot, module loaded on demand), so discovery polls on a
//! fixed interval before giving up.

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use gf_error::{GpufanError, Result};
use tracing::{debug, info, warn};

use super::attributes::AttributeStore;
use crate::constants::{attributes, paths, timing};

/// Directory holding the sensor and actuator attributes of one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRoot(PathBuf);

impl SensorRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SensorRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Locates the hwmon instance registered by a given driver
#[derive(Debug, Clone)]
pub struct Discovery {
    driver: String,
    pattern: String,
    max_attempts: u32,
    retry_interval: Duration,
}

impl Discovery {
    /// Discovery for `driver` with the default pattern, ceiling and interval
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            pattern: paths::HWMON_ROOT_PATTERN.to_string(),
            max_attempts: timing::DISCOVERY_ATTEMPTS,
            retry_interval: timing::DISCOVERY_INTERVAL,
        }
    }

    /// Glob enumerating candidate roots
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Total attempts before giving up (at least one)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Poll until a matching root appears or the attempt ceiling is reached
    pub fn find_root<S: AttributeStore + ?Sized>(&self, store: &S) -> Result<SensorRoot> {
        info!(
            driver = %self.driver,
            pattern = %self.pattern,
            attempts = self.max_attempts,
            "Searching for hwmon device"
        );

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                thread::sleep(self.retry_interval);
            }

            match self.probe(store) {
                Ok(Some(root)) => {
                    info!(root = %root, attempt, "Found '{}' hwmon device", self.driver);
                    return Ok(root);
                }
                Ok(None) => {
                    debug!(attempt, "No '{}' hwmon device yet", self.driver);
                }
                Err(e) if e.is_transient() => {
                    warn!(attempt, error = %e, "Hwmon enumeration failed, will retry");
                }
                Err(e) => return Err(e),
            }
        }

        Err(GpufanError::HardwareNotFound {
            driver: self.driver.clone(),
            attempts: self.max_attempts,
        })
    }

    /// Single pass over the candidates; first match in enumeration order wins
    pub fn probe<S: AttributeStore + ?Sized>(&self, store: &S) -> Result<Option<SensorRoot>> {
        let mut unreadable = None;

        for candidate in store.matching(&self.pattern)? {
            match store.read(&candidate.join(attributes::NAME)) {
                Ok(name) if name == self.driver => return Ok(Some(SensorRoot::new(candidate))),
                Ok(name) => {
                    debug!(candidate = %candidate.display(), name = %name, "Skipping hwmon device");
                }
                Err(e) => unreadable = Some(e),
            }
        }

        // An unreadable candidate with no match elsewhere is an enumeration failure.
        match unreadable {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}
