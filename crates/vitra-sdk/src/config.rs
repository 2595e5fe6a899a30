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

//! Engine configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vitra_control::MonitorConfig;
use vitra_core::quality::ConfigError;
use vitra_core::tier::{NetworkClass, TierClassifier};
use vitra_telemetry::CapabilityConfig;

/// Everything tunable about a [`TierEngine`](crate::TierEngine).
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```json
/// { "monitor": { "quality": { "target_fps": 30.0 } } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capability cache settings.
    pub capabilities: CapabilityConfig,
    /// Tier weights and breakpoints.
    pub tier: TierClassifier,
    /// Quality monitor settings.
    pub monitor: MonitorConfig,
    /// Network class to assume when the host cannot tell.
    pub network_override: Option<NetworkClass>,
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).context("Failed to parse engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine configuration '{}'", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid engine configuration '{}'", path.display()))
    }

    /// Rejects tuning that cannot produce sane behavior.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.monitor.quality.validate()?;

        let t = &self.tier.thresholds;
        if !(t.medium <= t.high && t.high <= t.ultra) {
            return Err(ConfigError::new(
                "tier.thresholds",
                format!(
                    "expected medium <= high <= ultra, got {} / {} / {}",
                    t.medium, t.high, t.ultra
                ),
            ));
        }
        let w = &self.tier.weights;
        let weights = [
            w.memory,
            w.cores,
            w.network,
            w.fast_network_bonus,
            w.default_network_bonus,
        ];
        if !weights.iter().all(|v| *v >= 0.0) {
            return Err(ConfigError::new("tier.weights", "must be non-negative numbers"));
        }
        if self.monitor.fps_window_ms == 0 {
            return Err(ConfigError::new("monitor.fps_window_ms", "must be positive"));
        }
        if self.monitor.memory.interval_ms == 0 {
            return Err(ConfigError::new("monitor.memory.interval_ms", "must be positive"));
        }
        let ratio = self.monitor.memory.pressure_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::new(
                "monitor.memory.pressure_ratio",
                format!("expected a value in (0, 1], got {ratio}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.monitor.quality.target_fps, 60.0);
        assert_eq!(config.capabilities.ttl_ms, 300_000);
        assert_eq!(config.tier.weights.memory, 0.4);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "monitor": { "quality": { "target_fps": 30.0 }, "memory": { "limit_bytes": 1048576 } },
            "network_override": "fast"
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.monitor.quality.target_fps, 30.0);
        assert_eq!(config.monitor.quality.lower_ratio, 0.8);
        assert_eq!(config.monitor.memory.limit_bytes, Some(1_048_576));
        assert_eq!(config.network_override, Some(NetworkClass::Fast));
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let json = r#"{ "monitor": { "quality": { "lower_ratio": 1.5, "upper_ratio": 1.2 } } }"#;
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("lower_ratio"));

        let json = r#"{ "tier": { "thresholds": { "ultra": 3.0 } } }"#;
        assert!(EngineConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_nan_weight_is_rejected() {
        let mut config = EngineConfig::default();
        config.tier.weights.cores = f64::NAN;
        assert_eq!(config.validate().unwrap_err().field, "tier.weights");

        let mut config = EngineConfig::default();
        config.tier.weights.fast_network_bonus = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(EngineConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitra.json");
        std::fs::write(&path, r#"{ "capabilities": { "ttl_ms": 1000 } }"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.capabilities.ttl_ms, 1000);

        let missing = EngineConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{missing:#}").contains("missing.json"));
    }
}
