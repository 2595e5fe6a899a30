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

//! Host capability contracts.
//!
//! A capability is a yes/no answer to "can this host do X?". Probes answer for
//! a declared subset of [`Feature`]s; the prober in `vitra-telemetry` merges
//! their answers into an immutable [`CapabilitySnapshot`].

pub mod feature;
pub mod probe;
pub mod snapshot;

pub use feature::{Feature, FeatureSet};
pub use probe::{CapabilityProbe, ProbeError, ProbeFailure};
pub use snapshot::CapabilitySnapshot;
