// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tuning and state of the runtime quality feedback loop.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tier::PerformanceTier;

/// A tuning value that cannot produce a sane feedback loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// The offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl ConfigError {
    /// Creates a new error for `field`.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for '{}': {}", self.field, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Tuning of the adaptive quality controller.
///
/// The FPS ratio band `[lower_ratio, upper_ratio]` is a hysteresis band:
/// inside it the level never moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// The frame rate the host wants to sustain.
    pub target_fps: f64,
    /// Lowest allowed quality level.
    pub min_level: f64,
    /// Highest allowed quality level.
    pub max_level: f64,
    /// Below this `fps / target` ratio the level is lowered.
    pub lower_ratio: f64,
    /// Above this `fps / target` ratio the level is raised.
    pub upper_ratio: f64,
    /// Multiplier applied when lowering.
    pub decrease_factor: f64,
    /// Multiplier applied when raising.
    pub increase_factor: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            min_level: 0.1,
            max_level: 1.0,
            lower_ratio: 0.8,
            upper_ratio: 1.2,
            decrease_factor: 0.9,
            increase_factor: 1.05,
        }
    }
}

impl QualityConfig {
    /// Checks that the tuning describes a bounded, non-oscillating loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(ConfigError::new("target_fps", "must be a positive number"));
        }
        if !(self.min_level > 0.0 && self.min_level <= self.max_level && self.max_level <= 1.0) {
            return Err(ConfigError::new(
                "min_level",
                format!(
                    "expected 0 < min_level <= max_level <= 1, got [{}, {}]",
                    self.min_level, self.max_level
                ),
            ));
        }
        if !(self.lower_ratio > 0.0 && self.lower_ratio < self.upper_ratio) {
            return Err(ConfigError::new(
                "lower_ratio",
                format!(
                    "expected 0 < lower_ratio < upper_ratio, got {} / {}",
                    self.lower_ratio, self.upper_ratio
                ),
            ));
        }
        if !(self.decrease_factor > 0.0 && self.decrease_factor < 1.0) {
            return Err(ConfigError::new("decrease_factor", "must be in (0, 1)"));
        }
        if !(self.increase_factor > 1.0) {
            return Err(ConfigError::new("increase_factor", "must be greater than 1"));
        }
        Ok(())
    }

    /// Clamps a level into `[min_level, max_level]`.
    pub fn clamp(&self, level: f64) -> f64 {
        // Not `f64::clamp`: an inverted or NaN range must not panic.
        level.max(self.min_level).min(self.max_level)
    }

    /// The clamped starting level for a tier.
    pub fn seed_level(&self, tier: PerformanceTier) -> f64 {
        self.clamp(tier.seed_quality_level())
    }
}

/// The live output of the feedback loop.
///
/// Written only by the quality monitor; everyone else reads a copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityState {
    /// Current quality scalar in `[min_level, max_level]`.
    pub quality_level: f64,
    /// FPS measured over the last completed window, `0` before the first one.
    pub current_fps: f64,
    /// Rolling mean of recent FPS samples.
    pub average_fps: f64,
    /// Worst recent FPS sample, `0` before the first one.
    pub min_fps: f64,
    /// The configured target.
    pub target_fps: f64,
    /// Number of times the level actually moved.
    pub adjustments: u64,
}

impl QualityState {
    /// A fresh state starting at `level`.
    pub fn seeded(level: f64, target_fps: f64) -> Self {
        Self {
            quality_level: level,
            current_fps: 0.0,
            average_fps: 0.0,
            min_fps: 0.0,
            target_fps,
            adjustments: 0,
        }
    }

    /// Scales a full-quality amount, e.g. a particle budget: `floor(base * level)`.
    pub fn scale(&self, base: u32) -> u32 {
        (base as f64 * self.quality_level).floor() as u32
    }
}

impl Default for QualityState {
    fn default() -> Self {
        Self::seeded(1.0, QualityConfig::default().target_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(QualityConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_band_is_rejected() {
        let config = QualityConfig {
            lower_ratio: 1.3,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "lower_ratio");
    }

    #[test]
    fn test_bad_factors_are_rejected() {
        let shrinking_increase = QualityConfig {
            increase_factor: 0.95,
            ..Default::default()
        };
        assert_eq!(shrinking_increase.validate().unwrap_err().field, "increase_factor");

        let growing_decrease = QualityConfig {
            decrease_factor: 1.1,
            ..Default::default()
        };
        assert_eq!(growing_decrease.validate().unwrap_err().field, "decrease_factor");
    }

    #[test]
    fn test_zero_target_is_rejected() {
        let config = QualityConfig {
            target_fps: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "target_fps");
    }

    #[test]
    fn test_scale_floors() {
        let state = QualityState::seeded(0.525, 60.0);
        assert_eq!(state.scale(1000), 525);
        let state = QualityState::seeded(0.1, 60.0);
        assert_eq!(state.scale(15), 1);
    }

    #[test]
    fn test_seed_level_is_clamped() {
        let config = QualityConfig {
            max_level: 0.5,
            ..Default::default()
        };
        assert_eq!(config.seed_level(PerformanceTier::Ultra), 0.5);
        assert_eq!(config.seed_level(PerformanceTier::Low), 0.35);
    }

    #[test]
    fn test_clamp_tolerates_unvalidated_bounds() {
        let inverted = QualityConfig {
            min_level: 0.9,
            max_level: 0.5,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
        assert_eq!(inverted.clamp(1.0), 0.5);
        assert_eq!(inverted.seed_level(PerformanceTier::Ultra), 0.5);

        let nan = QualityConfig {
            min_level: f64::NAN,
            ..Default::default()
        };
        assert_eq!(nan.clamp(0.3), 0.3);
        assert_eq!(nan.clamp(2.0), 1.0);
    }
}
