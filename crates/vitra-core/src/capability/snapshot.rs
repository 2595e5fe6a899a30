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

//! The immutable result of one probing pass.

use std::time::Duration;

use super::feature::{Feature, FeatureSet};
use super::probe::ProbeFailure;

/// Which features the host supports, as of [`probed_at`](Self::probed_at).
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySnapshot {
    supported: FeatureSet,
    probed_at: Duration,
    failures: Vec<ProbeFailure>,
}

impl CapabilitySnapshot {
    /// Creates a snapshot from a merged feature set.
    pub fn new(supported: FeatureSet, probed_at: Duration, failures: Vec<ProbeFailure>) -> Self {
        Self {
            supported,
            probed_at,
            failures,
        }
    }

    /// Returns `true` if the feature was detected.
    pub fn supports(&self, feature: Feature) -> bool {
        self.supported.contains(feature)
    }

    /// The full set of detected features.
    pub fn features(&self) -> FeatureSet {
        self.supported
    }

    /// Clock time at which the probe ran.
    pub fn probed_at(&self) -> Duration {
        self.probed_at
    }

    /// Probes that failed during this pass.
    pub fn failures(&self) -> &[ProbeFailure] {
        &self.failures
    }

    /// Touch input.
    pub fn touch(&self) -> bool {
        self.supports(Feature::Touch)
    }

    /// Multi-point touch input.
    pub fn multi_touch(&self) -> bool {
        self.supports(Feature::MultiTouch)
    }

    /// Hover-capable pointer.
    pub fn hover(&self) -> bool {
        self.supports(Feature::Hover)
    }

    /// Hardware GPU adapter.
    pub fn gpu(&self) -> bool {
        self.supports(Feature::Gpu)
    }

    /// Baseline graphics context.
    pub fn webgl(&self) -> bool {
        self.supports(Feature::WebGl)
    }

    /// SM4-class graphics context.
    pub fn webgl2(&self) -> bool {
        self.supports(Feature::WebGl2)
    }

    /// Display scaled above 1x.
    pub fn high_dpi(&self) -> bool {
        self.supports(Feature::HighDpi)
    }

    /// Whether blur/backdrop effects are worth enabling at all.
    ///
    /// Backdrop blur needs a GPU-backed context; without one it falls back to
    /// software compositing and costs more than it is worth.
    pub fn allows_backdrop_effects(&self) -> bool {
        self.gpu() && self.webgl()
    }
}
