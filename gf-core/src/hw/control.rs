//! Sensor and PWM control functions
//!
//! Low-level operations against one hwmon root.
//!
//! # PWM Values
//!
//! PWM duty cycle values range from 0 (fan off) to 255 (full speed).
//!
//! # Temperature Values
//!
//! Linux hwmon reports temperatures in millidegrees Celsius. They are
//! converted to whole degrees with integer division.

use std::path::PathBuf;

use gf_error::{GpufanError, Result};
use tracing::{debug, info};

use super::attributes::{pattern_in, read_unsigned, AttributeStore};
use super::discovery::SensorRoot;
use crate::constants::{attributes, pwm, temperature};

/// Outcome of a PWM update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedChange {
    /// The new level was written
    Applied,
    /// The attribute already held the level; nothing was written
    Unchanged,
}

/// Find the single attribute matching `mask` under the root.
///
/// Zero or several matches mean an unsupported device layout.
pub fn find_single_attribute<S: AttributeStore + ?Sized>(
    store: &S,
    root: &SensorRoot,
    mask: &str,
) -> Result<PathBuf> {
    let mut matches = store.matching(&pattern_in(root.path(), mask))?;
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(GpufanError::AttributeNotFound {
            root: root.path().to_path_buf(),
            mask: mask.to_string(),
        }),
        _ => Err(GpufanError::AmbiguousAttribute {
            root: root.path().to_path_buf(),
            mask: mask.to_string(),
            matches,
        }),
    }
}

/// Read the junction temperature in whole degrees Celsius
pub fn current_temperature<S: AttributeStore + ?Sized>(store: &S, root: &SensorRoot) -> Result<u32> {
    let labels = store.matching(&pattern_in(root.path(), attributes::TEMP_LABEL_MASK))?;

    for label_path in labels {
        if store.read(&label_path)? != attributes::JUNCTION_LABEL {
            continue;
        }

        let input_path = paired_input(&label_path);
        let raw = read_unsigned(store, &input_path)?;
        let millidegrees = u32::try_from(raw)
            .map_err(|e| GpufanError::invalid_value(&input_path, raw.to_string(), e))?;

        return Ok(millidegrees / temperature::MILLIDEGREE_DIVISOR);
    }

    Err(GpufanError::SensorNotFound {
        root: root.path().to_path_buf(),
        label: attributes::JUNCTION_LABEL.to_string(),
    })
}

/// `tempN_label` -> `tempN_input`
fn paired_input(label_path: &std::path::Path) -> PathBuf {
    let file_name = label_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(attributes::TEMP_LABEL_SUFFIX)
        .unwrap_or(&file_name);
    label_path.with_file_name(format!("{}{}", stem, attributes::TEMP_INPUT_SUFFIX))
}

/// Switch the fan to manual (userspace) control
///
/// PWM enable modes:
/// - 0 = disabled (full speed on most hardware)
/// - 1 = manual (software control)
/// - 2 = automatic (firmware control)
pub fn enable_manual_control<S: AttributeStore + ?Sized>(store: &S, root: &SensorRoot) -> Result<()> {
    let enable_path = find_single_attribute(store, root, attributes::PWM_ENABLE_MASK)?;
    store.write(&enable_path, pwm::enable::MANUAL)?;
    info!(path = %enable_path.display(), "Enabled manual fan control");
    Ok(())
}

/// Set the PWM duty cycle, skipping the write when it is already current
pub fn set_speed<S: AttributeStore + ?Sized>(
    store: &S,
    root: &SensorRoot,
    level: u8,
) -> Result<SpeedChange> {
    let pwm_path = find_single_attribute(store, root, attributes::PWM_MASK)?;
    let current = read_unsigned(store, &pwm_path)?;

    if current == u64::from(level) {
        return Ok(SpeedChange::Unchanged);
    }

    store.write(&pwm_path, u64::from(level))?;
    debug!(path = %pwm_path.display(), from = current, to = level, "PWM updated");
    Ok(SpeedChange::Applied)
}
