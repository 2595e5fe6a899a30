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

//! # Vitra Core
//!
//! Foundational crate containing the traits, core types and pure decision
//! logic of the adaptive performance tier engine.
//!
//! Nothing in here touches the host directly: probing lives in
//! `vitra-telemetry` and `vitra-infra`, the feedback loop in `vitra-control`.

#![warn(missing_docs)]

pub mod capability;
pub mod platform;
pub mod quality;
pub mod telemetry;
pub mod tier;
pub mod utils;

pub use capability::{CapabilityProbe, CapabilitySnapshot, Feature, FeatureSet, ProbeError};
pub use quality::{QualityConfig, QualityState};
pub use tier::{classify_tier, NetworkClass, PerformanceProfile, PerformanceTier, StorageClass};
pub use utils::clock::{Clock, ManualClock, SystemClock};
