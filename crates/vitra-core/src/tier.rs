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

//! Static performance classification.
//!
//! The classifier turns a handful of coarse host signals into an ordinal
//! [`PerformanceTier`]. It is a pure function: identical inputs always yield
//! the identical tier, and raising memory or core count never lowers it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory assumed when the host does not report it, in megabytes.
pub const DEFAULT_MEMORY_MB: u64 = 4 * 1024;
/// Core count assumed when the host does not report it.
pub const DEFAULT_CORES: u32 = 4;

/// Storage below this many free bytes is classified as [`StorageClass::Low`].
const STORAGE_LOW_BYTES: u64 = 16 * 1024 * 1024 * 1024;
/// Storage below this many free bytes is classified as [`StorageClass::Medium`].
const STORAGE_MEDIUM_BYTES: u64 = 128 * 1024 * 1024 * 1024;

/// Discrete performance classification of a host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    /// Entry-level hardware.
    Low,
    /// Typical mid-range hardware.
    #[default]
    Medium,
    /// Well-equipped hardware.
    High,
    /// Workstation-class hardware.
    Ultra,
}

impl PerformanceTier {
    /// The quality level a monitor starts from on this tier.
    pub fn seed_quality_level(self) -> f64 {
        match self {
            PerformanceTier::Low => 0.35,
            PerformanceTier::Medium => 0.6,
            PerformanceTier::High => 0.8,
            PerformanceTier::Ultra => 1.0,
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PerformanceTier::Low => "low",
            PerformanceTier::Medium => "medium",
            PerformanceTier::High => "high",
            PerformanceTier::Ultra => "ultra",
        };
        f.write_str(name)
    }
}

/// Coarse quality of the network link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkClass {
    /// Constrained link (2G/3G-class, metered, save-data).
    Slow,
    /// Broadband-class link.
    Fast,
    /// The host does not say.
    #[default]
    Unknown,
}

/// Coarse class of the locally available storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    /// Little free space.
    Low,
    /// Moderate free space, or unknown.
    #[default]
    Medium,
    /// Plenty of free space.
    High,
}

impl StorageClass {
    /// Classifies a free-space figure. Unknown space is treated as `Medium`.
    pub fn from_available_bytes(bytes: Option<u64>) -> Self {
        match bytes {
            None => StorageClass::Medium,
            Some(b) if b < STORAGE_LOW_BYTES => StorageClass::Low,
            Some(b) if b < STORAGE_MEDIUM_BYTES => StorageClass::Medium,
            Some(_) => StorageClass::High,
        }
    }
}

/// Weights of the tier score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    /// Weight per gigabyte of memory.
    pub memory: f64,
    /// Weight per logical core.
    pub cores: f64,
    /// Weight of the network bonus.
    pub network: f64,
    /// Network bonus for a [`NetworkClass::Fast`] link.
    pub fast_network_bonus: f64,
    /// Network bonus for any other link.
    pub default_network_bonus: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            memory: 0.4,
            cores: 0.4,
            network: 0.2,
            fast_network_bonus: 2.0,
            default_network_bonus: 1.0,
        }
    }
}

/// Score breakpoints, each inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Minimum score for [`PerformanceTier::Ultra`].
    pub ultra: f64,
    /// Minimum score for [`PerformanceTier::High`].
    pub high: f64,
    /// Minimum score for [`PerformanceTier::Medium`].
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            ultra: 6.0,
            high: 4.0,
            medium: 2.5,
        }
    }
}

/// Raw, possibly incomplete, signals reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostSignals {
    /// Installed memory in megabytes.
    pub memory_mb: Option<u64>,
    /// Logical core count.
    pub cores: Option<u32>,
    /// Reported CPU clock in MHz.
    pub clock_mhz: Option<u64>,
    /// Whether the host runs on a battery.
    pub has_battery: Option<bool>,
    /// Network link class.
    pub network: NetworkClass,
    /// Free bytes on the data volume.
    pub available_storage_bytes: Option<u64>,
}

/// The static performance facts of a host, including its tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    /// Installed memory in megabytes.
    pub memory_mb: u64,
    /// Logical core count.
    pub cores: u32,
    /// Reported CPU clock in MHz, `0` when unknown.
    pub estimated_clock_mhz: u64,
    /// Whether the host runs on a battery.
    pub has_battery: bool,
    /// Network link class.
    pub network: NetworkClass,
    /// Storage class.
    pub storage_class: StorageClass,
    /// The weighted score the tier was derived from.
    pub score: f64,
    /// The resulting tier.
    pub tier: PerformanceTier,
}

/// Maps host signals to a [`PerformanceTier`] with configurable constants.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TierClassifier {
    /// Score weights.
    pub weights: TierWeights,
    /// Tier breakpoints.
    pub thresholds: TierThresholds,
}

impl TierClassifier {
    /// Creates a classifier from explicit weights and thresholds.
    pub fn new(weights: TierWeights, thresholds: TierThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    /// Computes the weighted score for the given signals.
    pub fn score(&self, memory_gb: f64, cores: u32, network: NetworkClass) -> f64 {
        let bonus = match network {
            NetworkClass::Fast => self.weights.fast_network_bonus,
            NetworkClass::Slow | NetworkClass::Unknown => self.weights.default_network_bonus,
        };
        self.weights.memory * memory_gb
            + self.weights.cores * cores as f64
            + self.weights.network * bonus
    }

    /// Maps a score onto a tier.
    pub fn tier_for_score(&self, score: f64) -> PerformanceTier {
        if score >= self.thresholds.ultra {
            PerformanceTier::Ultra
        } else if score >= self.thresholds.high {
            PerformanceTier::High
        } else if score >= self.thresholds.medium {
            PerformanceTier::Medium
        } else {
            PerformanceTier::Low
        }
    }

    /// Classifies memory (in gigabytes), cores and network into a tier.
    pub fn classify(&self, memory_gb: f64, cores: u32, network: NetworkClass) -> PerformanceTier {
        self.tier_for_score(self.score(memory_gb, cores, network))
    }

    /// Resolves missing signals to conservative defaults and builds a full profile.
    pub fn profile(&self, signals: &HostSignals) -> PerformanceProfile {
        let memory_mb = signals.memory_mb.filter(|m| *m > 0).unwrap_or(DEFAULT_MEMORY_MB);
        let cores = signals.cores.filter(|c| *c > 0).unwrap_or(DEFAULT_CORES);
        let score = self.score(memory_mb as f64 / 1024.0, cores, signals.network);

        PerformanceProfile {
            memory_mb,
            cores,
            estimated_clock_mhz: signals.clock_mhz.unwrap_or(0),
            has_battery: signals.has_battery.unwrap_or(false),
            network: signals.network,
            storage_class: StorageClass::from_available_bytes(signals.available_storage_bytes),
            score,
            tier: self.tier_for_score(score),
        }
    }
}

/// Classifies with the default weights and thresholds.
///
/// `memory_gb` is installed memory in gigabytes.
pub fn classify_tier(memory_gb: f64, cores: u32, network: NetworkClass) -> PerformanceTier {
    TierClassifier::default().classify(memory_gb, cores, network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workstation_is_ultra() {
        let classifier = TierClassifier::default();
        let score = classifier.score(16.0, 8, NetworkClass::Fast);
        assert!((score - 10.0).abs() < 1e-9);
        assert_eq!(classify_tier(16.0, 8, NetworkClass::Fast), PerformanceTier::Ultra);
    }

    #[test]
    fn test_small_device_is_low() {
        let classifier = TierClassifier::default();
        let score = classifier.score(2.0, 2, NetworkClass::Slow);
        assert!((score - 1.8).abs() < 1e-9);
        assert_eq!(classify_tier(2.0, 2, NetworkClass::Slow), PerformanceTier::Low);
    }

    #[test]
    fn test_breakpoints_are_inclusive() {
        let classifier = TierClassifier::default();
        assert_eq!(classifier.tier_for_score(6.0), PerformanceTier::Ultra);
        assert_eq!(classifier.tier_for_score(5.999), PerformanceTier::High);
        assert_eq!(classifier.tier_for_score(4.0), PerformanceTier::High);
        assert_eq!(classifier.tier_for_score(2.5), PerformanceTier::Medium);
        assert_eq!(classifier.tier_for_score(2.499), PerformanceTier::Low);
    }

    #[test]
    fn test_unknown_network_scores_like_slow() {
        let classifier = TierClassifier::default();
        assert_eq!(
            classifier.score(4.0, 4, NetworkClass::Unknown),
            classifier.score(4.0, 4, NetworkClass::Slow)
        );
    }

    #[test]
    fn test_classification_is_deterministic_over_grid() {
        let classifier = TierClassifier::default();
        for memory in [0.5, 1.0, 2.0, 4.0, 6.0, 8.0, 12.0, 16.0, 32.0] {
            for cores in [1, 2, 4, 6, 8, 12, 16] {
                for network in [NetworkClass::Slow, NetworkClass::Fast, NetworkClass::Unknown] {
                    let first = classifier.classify(memory, cores, network);
                    for _ in 0..3 {
                        assert_eq!(classifier.classify(memory, cores, network), first);
                    }
                }
            }
        }
    }

    #[test]
    fn test_classification_is_monotonic_in_memory_and_cores() {
        let classifier = TierClassifier::default();
        let memories = [0.5, 1.0, 2.0, 3.0, 4.0, 8.0, 16.0, 64.0];
        let cores = [1u32, 2, 3, 4, 8, 16, 32];
        for network in [NetworkClass::Slow, NetworkClass::Fast, NetworkClass::Unknown] {
            let score = |m: f64, c: u32| classifier.score(m, c, network);
            let tier = |m: f64, c: u32| classifier.classify(m, c, network);
            for &c in &cores {
                for pair in memories.windows(2) {
                    assert!(score(pair[1], c) >= score(pair[0], c));
                    assert!(tier(pair[1], c) >= tier(pair[0], c));
                }
            }
            for &m in &memories {
                for pair in cores.windows(2) {
                    assert!(score(m, pair[1]) >= score(m, pair[0]));
                    assert!(tier(m, pair[1]) >= tier(m, pair[0]));
                }
            }
        }
    }

    #[test]
    fn test_profile_defaults_missing_signals() {
        let profile = TierClassifier::default().profile(&HostSignals::default());
        assert_eq!(profile.memory_mb, DEFAULT_MEMORY_MB);
        assert_eq!(profile.cores, DEFAULT_CORES);
        assert_eq!(profile.estimated_clock_mhz, 0);
        assert!(!profile.has_battery);
        assert_eq!(profile.storage_class, StorageClass::Medium);
        // 0.4*4 + 0.4*4 + 0.2*1 = 3.4
        assert!((profile.score - 3.4).abs() < 1e-9);
        assert_eq!(profile.tier, PerformanceTier::Medium);
    }

    #[test]
    fn test_profile_converts_megabytes() {
        let signals = HostSignals {
            memory_mb: Some(16 * 1024),
            cores: Some(8),
            network: NetworkClass::Fast,
            ..Default::default()
        };
        let profile = TierClassifier::default().profile(&signals);
        assert!((profile.score - 10.0).abs() < 1e-9);
        assert_eq!(profile.tier, PerformanceTier::Ultra);
    }

    #[test]
    fn test_custom_weights_change_outcome() {
        let classifier = TierClassifier::new(
            TierWeights {
                memory: 0.1,
                cores: 0.1,
                ..Default::default()
            },
            TierThresholds::default(),
        );
        assert_eq!(classifier.classify(16.0, 8, NetworkClass::Fast), PerformanceTier::Medium);
    }

    #[test]
    fn test_storage_class_breakpoints() {
        let gib = 1024 * 1024 * 1024u64;
        assert_eq!(StorageClass::from_available_bytes(Some(4 * gib)), StorageClass::Low);
        assert_eq!(StorageClass::from_available_bytes(Some(64 * gib)), StorageClass::Medium);
        assert_eq!(StorageClass::from_available_bytes(Some(512 * gib)), StorageClass::High);
        assert_eq!(StorageClass::from_available_bytes(None), StorageClass::Medium);
    }

    #[test]
    fn test_seed_levels_follow_tier_order() {
        let tiers = [
            PerformanceTier::Low,
            PerformanceTier::Medium,
            PerformanceTier::High,
            PerformanceTier::Ultra,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[1].seed_quality_level() > pair[0].seed_quality_level());
        }
    }
}
