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

//! # Vitra Control
//!
//! The feedback half of the engine. [`AdaptiveController`] nudges a quality
//! scalar from measured FPS; [`QualityMonitor`] wires it to the telemetry
//! samplers and publishes the result through a read-only [`QualityHandle`]
//! and [`QualityEvent`](vitra_core::telemetry::QualityEvent) subscriptions.

#![warn(missing_docs)]

pub mod controller;
pub mod handle;
pub mod hub;
pub mod monitor;

pub use controller::{AdaptiveController, Adjustment};
pub use handle::QualityHandle;
pub use hub::EventHub;
pub use monitor::{MonitorConfig, QualityMonitor};
