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

//! The FPS-driven quality controller.
//!
//! Each adjustment compares measured FPS with the target:
//!
//! | `fps / target` | effect |
//! |---|---|
//! | `< lower_ratio` | level × `decrease_factor`, floored at `min_level` |
//! | `> upper_ratio` | level × `increase_factor`, capped at `max_level` |
//! | otherwise | unchanged |

use vitra_core::quality::QualityConfig;

/// Outcome of one [`AdaptiveController::adjust`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// The level was lowered.
    Decreased {
        /// Level before.
        from: f64,
        /// Level after.
        to: f64,
    },
    /// The level was raised.
    Increased {
        /// Level before.
        from: f64,
        /// Level after.
        to: f64,
    },
    /// The level did not move (inside the band, at a bound, or bad input).
    Unchanged(f64),
}

impl Adjustment {
    /// The level after the adjustment.
    pub fn level(&self) -> f64 {
        match *self {
            Adjustment::Decreased { to, .. } | Adjustment::Increased { to, .. } => to,
            Adjustment::Unchanged(level) => level,
        }
    }

    /// Whether the level moved.
    pub fn changed(&self) -> bool {
        !matches!(self, Adjustment::Unchanged(_))
    }
}

/// Holds the quality level and moves it in bounded multiplicative steps.
#[derive(Debug, Clone)]
pub struct AdaptiveController {
    config: QualityConfig,
    level: f64,
}

impl AdaptiveController {
    /// Creates a controller starting at `initial_level` (clamped).
    pub fn new(config: QualityConfig, initial_level: f64) -> Self {
        Self {
            level: config.clamp(initial_level),
            config,
        }
    }

    /// The current level.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// The tuning in use.
    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Feeds one FPS measurement into the controller.
    pub fn adjust(&mut self, fps: f64) -> Adjustment {
        let target = self.config.target_fps;
        if !fps.is_finite() || fps < 0.0 || !(target > 0.0) {
            log::debug!("Ignoring FPS sample {fps} against target {target}.");
            return Adjustment::Unchanged(self.level);
        }

        let from = self.level;
        let ratio = fps / target;

        if ratio < self.config.lower_ratio {
            let to = self.config.clamp(from * self.config.decrease_factor);
            if to < from {
                self.level = to;
                return Adjustment::Decreased { from, to };
            }
        } else if ratio > self.config.upper_ratio {
            let to = self.config.clamp(from * self.config.increase_factor);
            if to > from {
                self.level = to;
                return Adjustment::Increased { from, to };
            }
        }
        Adjustment::Unchanged(from)
    }

    /// Forces the level, clamped into bounds.
    pub fn reset(&mut self, level: f64) {
        self.level = self.config.clamp(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(level: f64) -> AdaptiveController {
        AdaptiveController::new(QualityConfig::default(), level)
    }

    #[test]
    fn test_low_fps_steps_down() {
        let mut c = controller(1.0);
        let first = c.adjust(30.0);
        assert!(matches!(first, Adjustment::Decreased { .. }));
        assert!((c.level() - 0.9).abs() < 1e-9);
        c.adjust(30.0);
        assert!((c.level() - 0.81).abs() < 1e-9);
    }

    #[test]
    fn test_sustained_low_fps_floors_at_min() {
        let mut c = controller(1.0);
        for _ in 0..20 {
            c.adjust(30.0);
        }
        // 0.9^20 ≈ 0.12, still above the floor.
        assert!(c.level() > 0.1);
        for _ in 0..10 {
            c.adjust(30.0);
        }
        assert_eq!(c.level(), 0.1);
        assert_eq!(c.adjust(30.0), Adjustment::Unchanged(0.1));
    }

    #[test]
    fn test_high_fps_steps_up_and_caps() {
        let mut c = controller(0.5);
        c.adjust(75.0);
        assert!((c.level() - 0.525).abs() < 1e-9);
        for _ in 0..50 {
            c.adjust(75.0);
        }
        assert_eq!(c.level(), 1.0);
        assert!(!c.adjust(75.0).changed());
    }

    #[test]
    fn test_hysteresis_band_holds_level() {
        let mut c = controller(0.6);
        for fps in [48.0, 50.0, 55.0, 60.0, 65.0, 70.0, 72.0, 49.0, 71.9] {
            assert_eq!(c.adjust(fps), Adjustment::Unchanged(0.6));
        }
    }

    #[test]
    fn test_level_stays_in_bounds_for_any_sequence() {
        let mut c = controller(0.5);
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..10_000 {
            // xorshift: deterministic pseudo-random FPS in [0, 150).
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let fps = (seed % 150_000) as f64 / 1000.0;
            c.adjust(fps);
            assert!(c.level() >= 0.1 && c.level() <= 1.0);
        }
    }

    #[test]
    fn test_bad_samples_are_ignored() {
        let mut c = controller(0.7);
        assert!(!c.adjust(f64::NAN).changed());
        assert!(!c.adjust(f64::INFINITY).changed());
        assert!(!c.adjust(-5.0).changed());
        assert_eq!(c.level(), 0.7);
    }

    #[test]
    fn test_initial_level_is_clamped() {
        assert_eq!(controller(5.0).level(), 1.0);
        assert_eq!(controller(0.0).level(), 0.1);
    }

    #[test]
    fn test_custom_band() {
        let config = QualityConfig {
            target_fps: 30.0,
            lower_ratio: 0.9,
            upper_ratio: 1.1,
            ..Default::default()
        };
        let mut c = AdaptiveController::new(config, 0.5);
        // 26/30 = 0.87 < 0.9
        assert!(matches!(c.adjust(26.0), Adjustment::Decreased { .. }));
        // 34/30 = 1.13 > 1.1
        assert!(matches!(c.adjust(34.0), Adjustment::Increased { .. }));
    }
}
