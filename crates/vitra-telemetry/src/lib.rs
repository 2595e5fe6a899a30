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

//! # Vitra Telemetry
//!
//! Everything that observes the host: the cached capability prober, the
//! one-shot performance profile detector, and the live FPS and memory
//! samplers driven by [`TelemetryService`].

#![warn(missing_docs)]

pub mod capability;
pub mod fps;
pub mod history;
pub mod memory;
pub mod profile;
pub mod service;

pub use capability::{CapabilityConfig, CapabilityProber};
pub use fps::FpsSampler;
pub use history::FpsHistory;
pub use memory::{MemoryConfig, MemorySampler};
pub use profile::ProfileDetector;
pub use service::{TelemetryService, TelemetryTick};
