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

//! Events published by the quality monitor.

use std::time::Duration;

use super::monitoring::MemoryReport;

/// One completed FPS measurement window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsSample {
    /// Frames per second over the window.
    pub fps: f64,
    /// Frames counted in the window.
    pub frames: u32,
    /// Length of the window.
    pub elapsed: Duration,
}

/// A notification sent to every subscriber of a quality monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum QualityEvent {
    /// A measurement window closed.
    FpsSampled(FpsSample),
    /// The controller moved the quality level.
    LevelChanged {
        /// Level before the adjustment.
        from: f64,
        /// Level after the adjustment.
        to: f64,
    },
    /// Memory use crossed the configured threshold. Advisory only.
    MemoryPressure(MemoryReport),
}
