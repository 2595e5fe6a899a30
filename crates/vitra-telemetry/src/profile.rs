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

//! One-shot performance profiling of the host.

use std::sync::{Arc, OnceLock};

use vitra_core::platform::HostProbe;
use vitra_core::tier::{PerformanceProfile, TierClassifier};

/// Reads host signals once, classifies them and keeps the result.
#[derive(Debug)]
pub struct ProfileDetector {
    host: Arc<dyn HostProbe>,
    classifier: TierClassifier,
    cached: OnceLock<PerformanceProfile>,
}

impl ProfileDetector {
    /// Creates a detector for `host` using `classifier`.
    pub fn new(host: Arc<dyn HostProbe>, classifier: TierClassifier) -> Self {
        Self {
            host,
            classifier,
            cached: OnceLock::new(),
        }
    }

    /// Returns the profile, computing it on first use.
    pub fn get(&self) -> PerformanceProfile {
        *self.cached.get_or_init(|| self.detect())
    }

    /// Classifies the host again, without touching the cache.
    pub fn detect(&self) -> PerformanceProfile {
        let signals = self.host.signals();
        if signals.memory_mb.is_none() || signals.cores.is_none() {
            log::debug!(
                "Host did not report memory ({:?}) or cores ({:?}); using conservative defaults.",
                signals.memory_mb,
                signals.cores
            );
        }
        let profile = self.classifier.profile(&signals);
        log::info!(
            "Performance tier: {} (score {:.2}, {} MB, {} cores, network {:?})",
            profile.tier,
            profile.score,
            profile.memory_mb,
            profile.cores,
            profile.network
        );
        profile
    }

    /// The classifier in use.
    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }
}
