//! Unified error handling for gpufan
//!
//! A single error type shared by the core library and the daemon.
//! Every hardware variant carries the path it was working on so that the
//! fatal message printed by the daemon names the file and the cause.

use std::io;
use std::path::PathBuf;

/// Result type alias using GpufanError
pub type Result<T> = std::result::Result<T, GpufanError>;

/// Error type for all gpufan operations
#[derive(thiserror::Error, Debug)]
pub enum GpufanError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: String,
    },

    // ============================================================================
    // Hardware Access Errors
    // ============================================================================
    #[error("No hwmon device with driver '{driver}' found after {attempts} attempts")]
    HardwareNotFound {
        driver: String,
        attempts: u32,
    },

    #[error("No '{label}' temperature sensor in {root}")]
    SensorNotFound {
        root: PathBuf,
        label: String,
    },

    #[error("No file matching '{mask}' in {root}")]
    AttributeNotFound {
        root: PathBuf,
        mask: String,
    },

    #[error("More than one file matches '{mask}' in {root}: {matches:?}")]
    AmbiguousAttribute {
        root: PathBuf,
        mask: String,
        matches: Vec<PathBuf>,
    },

    #[error("Invalid value '{value}' in {path}: {reason}")]
    InvalidValue {
        path: PathBuf,
        value: String,
        reason: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Process Errors
    // ============================================================================
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl GpufanError {
    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error for an attribute file
    pub fn invalid_value(
        path: impl Into<PathBuf>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidValue {
            path: path.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether discovery may retry after this error.
    ///
    /// Only enumeration problems qualify; anything found after a device has
    /// been selected is final.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::FileRead { .. } | Self::InvalidPattern { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = GpufanError::FileWrite {
            path: PathBuf::from("/sys/class/hwmon/hwmon2/pwm1"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let msg = err.to_string();
        assert!(msg.contains("/sys/class/hwmon/hwmon2/pwm1"));
        assert!(msg.starts_with("Failed to write file"));
    }

    #[test]
    fn test_ambiguous_lists_matches() {
        let err = GpufanError::AmbiguousAttribute {
            root: PathBuf::from("/sys/class/hwmon/hwmon0"),
            mask: "pwm?".to_string(),
            matches: vec![PathBuf::from("pwm1"), PathBuf::from("pwm2")],
        };
        let msg = err.to_string();
        assert!(msg.contains("pwm?"));
        assert!(msg.contains("pwm1"));
        assert!(msg.contains("pwm2"));
    }

    #[test]
    fn test_invalid_value_helper() {
        let err = GpufanError::invalid_value("/tmp/temp2_input", "abc", "not a number");
        assert_eq!(err.to_string(), "Invalid value 'abc' in /tmp/temp2_input: not a number");
    }

    #[test]
    fn test_transient_classification() {
        assert!(GpufanError::Io(io::Error::from(io::ErrorKind::NotFound)).is_transient());
        assert!(GpufanError::FileRead {
            path: PathBuf::from("name"),
            source: io::Error::from(io::ErrorKind::NotFound),
        }
        .is_transient());
        assert!(!GpufanError::SensorNotFound {
            root: PathBuf::from("/"),
            label: "junction".to_string(),
        }
        .is_transient());
        assert!(!GpufanError::invalid_config("poll_interval", "zero").is_transient());
    }
}
