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

//! The public-facing API of Vitra.
//!
//! [`TierEngine`] bundles the capability prober, the performance profile and
//! the runtime quality monitor behind one injected object. Build one per
//! application with [`TierEngine::native`] or, for full control over probes,
//! host and clock, with [`TierEngine::builder`].

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::{TierEngine, TierEngineBuilder};

pub mod prelude {
    pub use crate::{EngineConfig, TierEngine};
    pub use vitra_control::{Adjustment, QualityHandle};
    pub use vitra_core::capability::{CapabilitySnapshot, Feature};
    pub use vitra_core::telemetry::QualityEvent;
    pub use vitra_core::tier::{NetworkClass, PerformanceProfile, PerformanceTier};
}
