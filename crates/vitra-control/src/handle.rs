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

//! Read-only view of the live quality state.

use std::sync::{Arc, PoisonError, RwLock};
use vitra_core::quality::QualityState;

/// A cheap, clonable, read-only handle onto a monitor's [`QualityState`].
///
/// Rendering code holds one of these and polls it each frame; only the
/// owning [`QualityMonitor`](crate::QualityMonitor) can write.
#[derive(Debug, Clone)]
pub struct QualityHandle {
    state: Arc<RwLock<QualityState>>,
}

impl QualityHandle {
    pub(crate) fn new(state: Arc<RwLock<QualityState>>) -> Self {
        Self { state }
    }

    /// The current quality level.
    pub fn level(&self) -> f64 {
        self.state().quality_level
    }

    /// A copy of the full state.
    pub fn state(&self) -> QualityState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scales a full-quality amount by the current level, e.g.
    /// `handle.scale(1000)` particles.
    pub fn scale(&self, base: u32) -> u32 {
        self.state().scale(base)
    }
}
