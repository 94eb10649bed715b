//! Cooling decision policy
//!
//! Maps a junction temperature to a PWM level using four thresholds and one
//! bit of memory. Once the fan has been driven to full speed, the
//! force-cooling flag keeps it there until the temperature falls to the
//! force-cooling threshold, well below the threshold that engaged it. This
//! stops the fan from bouncing between full and moderate speed around the
//! upper threshold.

use std::fmt;

use gf_error::{GpufanError, Result};

use crate::constants::{pwm, temperature};

/// Temperature thresholds in degrees Celsius, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub max_speed: u32,
    pub force_cooling: u32,
    pub slow_cooling: u32,
    pub stop_cooling: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_speed: temperature::MAX_SPEED_TEMP,
            force_cooling: temperature::FORCE_COOLING_TEMP,
            slow_cooling: temperature::SLOW_COOLING_TEMP,
            stop_cooling: temperature::STOP_COOLING_TEMP,
        }
    }
}

impl Thresholds {
    /// Thresholds must strictly descend for every branch to be reachable
    pub fn validate(&self) -> Result<()> {
        let ordered = [
            ("max_speed", self.max_speed),
            ("force_cooling", self.force_cooling),
            ("slow_cooling", self.slow_cooling),
            ("stop_cooling", self.stop_cooling),
        ];

        for pair in ordered.windows(2) {
            let (upper_name, upper) = pair[0];
            let (lower_name, lower) = pair[1];
            if upper <= lower {
                return Err(GpufanError::invalid_config(
                    format!("thresholds.{}", upper_name),
                    format!("{}°C must be above {} ({}°C)", upper, lower_name, lower),
                ));
            }
        }
        Ok(())
    }
}

/// PWM level applied in each regime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedLevels {
    pub max: u8,
    pub moderate: u8,
    pub minimal: u8,
    pub off: u8,
}

impl Default for SpeedLevels {
    fn default() -> Self {
        Self {
            max: pwm::MAX_LEVEL,
            moderate: pwm::MODERATE_LEVEL,
            minimal: pwm::MINIMAL_LEVEL,
            off: pwm::OFF_LEVEL,
        }
    }
}

/// Which branch of the policy produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoolingRegime {
    MaxCooling,
    SustainedCooling,
    ModerateCooling,
    MinimalCooling,
    Off,
}

impl fmt::Display for CoolingRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MaxCooling => "max",
            Self::SustainedCooling => "sustained",
            Self::ModerateCooling => "moderate",
            Self::MinimalCooling => "minimal",
            Self::Off => "off",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoolingDecision {
    pub level: u8,
    pub force_cooling: bool,
    pub regime: CoolingRegime,
}

/// Hysteresis policy: thresholds plus the level for each regime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoolingPolicy {
    pub thresholds: Thresholds,
    pub levels: SpeedLevels,
}

impl CoolingPolicy {
    pub fn new(thresholds: Thresholds, levels: SpeedLevels) -> Self {
        Self { thresholds, levels }
    }

    /// Flag value before the first iteration, from a single sample
    pub fn initial_force_cooling(&self, temp: u32) -> bool {
        temp > self.thresholds.force_cooling
    }

    /// Decide the PWM level and the next flag value.
    ///
    /// Branches are checked from the hottest down; the first match wins.
    pub fn decide(&self, temp: u32, force_cooling: bool) -> CoolingDecision {
        let t = &self.thresholds;
        let (regime, level, force_cooling) = if temp >= t.max_speed {
            (CoolingRegime::MaxCooling, self.levels.max, true)
        } else if temp > t.force_cooling && force_cooling {
            (CoolingRegime::SustainedCooling, self.levels.max, true)
        } else if temp >= t.slow_cooling {
            (CoolingRegime::ModerateCooling, self.levels.moderate, false)
        } else if temp >= t.stop_cooling {
            (CoolingRegime::MinimalCooling, self.levels.minimal, false)
        } else {
            (CoolingRegime::Off, self.levels.off, false)
        };

        CoolingDecision {
            level,
            force_cooling,
            regime,
        }
    }
}

/// Apply the default policy
pub fn decide(temp: u32, force_cooling: bool) -> CoolingDecision {
    CoolingPolicy::default().decide(temp, force_cooling)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(temp: u32, force: bool) -> (u8, bool) {
        let d = decide(temp, force);
        (d.level, d.force_cooling)
    }

    #[test]
    fn test_max_speed_regardless_of_flag() {
        for temp in [80, 81, 95, 120, u32::MAX] {
            assert_eq!(outcome(temp, false), (255, true), "temp {}", temp);
            assert_eq!(outcome(temp, true), (255, true), "temp {}", temp);
        }
    }

    #[test]
    fn test_hysteresis_holds_above_force_threshold() {
        for temp in 71..80 {
            assert_eq!(outcome(temp, true), (255, true), "temp {}", temp);
            assert_eq!(decide(temp, true).regime, CoolingRegime::SustainedCooling);
        }
    }

    #[test]
    fn test_no_force_cooling_means_moderate() {
        for temp in 71..80 {
            assert_eq!(outcome(temp, false), (127, false), "temp {}", temp);
        }
    }

    #[test]
    fn test_moderate_band_clears_flag() {
        for temp in 65..=70 {
            assert_eq!(outcome(temp, true), (127, false), "temp {}", temp);
            assert_eq!(outcome(temp, false), (127, false), "temp {}", temp);
        }
    }

    #[test]
    fn test_minimal_band() {
        for temp in 57..65 {
            assert_eq!(outcome(temp, true), (64, false), "temp {}", temp);
            assert_eq!(outcome(temp, false), (64, false), "temp {}", temp);
        }
    }

    #[test]
    fn test_fan_off_below_stop_threshold() {
        for temp in 0..57 {
            assert_eq!(outcome(temp, true), (0, false), "temp {}", temp);
            assert_eq!(outcome(temp, false), (0, false), "temp {}", temp);
        }
        assert_eq!(decide(56, false).regime, CoolingRegime::Off);
    }

    #[test]
    fn test_boundaries() {
        assert_ne!(outcome(79, false), outcome(80, false));

        assert_eq!(outcome(69, false), (127, false));
        assert_eq!(outcome(70, false), (127, false));
        assert_eq!(outcome(71, false), (127, false));

        assert_eq!(outcome(69, true), (127, false));
        assert_eq!(outcome(70, true), (127, false));
        assert_eq!(outcome(71, true), (255, true));

        assert_eq!(outcome(64, false), (64, false));
        assert_eq!(outcome(65, false), (127, false));
        assert_eq!(outcome(56, false), (0, false));
        assert_eq!(outcome(57, false), (64, false));
    }

    #[test]
    fn test_initial_flag() {
        let policy = CoolingPolicy::default();
        assert!(!policy.initial_force_cooling(70));
        assert!(policy.initial_force_cooling(71));
        assert!(policy.initial_force_cooling(75));
    }

    #[test]
    fn test_custom_levels() {
        let policy = CoolingPolicy::new(
            Thresholds::default(),
            SpeedLevels {
                max: 230,
                moderate: 150,
                minimal: 90,
                off: 30,
            },
        );
        assert_eq!(policy.decide(85, false).level, 230);
        assert_eq!(policy.decide(66, false).level, 150);
        assert_eq!(policy.decide(60, false).level, 90);
        assert_eq!(policy.decide(20, false).level, 30);
    }

    #[test]
    fn test_thresholds_validate() {
        assert!(Thresholds::default().validate().is_ok());

        let flat = Thresholds {
            slow_cooling: 70,
            ..Thresholds::default()
        };
        let err = flat.validate().unwrap_err();
        assert!(matches!(err, GpufanError::InvalidConfig { ref field, .. } if field == "thresholds.force_cooling"));

        let inverted = Thresholds {
            max_speed: 60,
            ..Thresholds::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_regime_display() {
        assert_eq!(CoolingRegime::SustainedCooling.to_string(), "sustained");
        assert_eq!(CoolingRegime::Off.to_string(), "off");
    }
}
