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

//! Service driving the live samplers from the host frame loop.

use std::sync::Arc;
use std::time::Duration;

use vitra_core::telemetry::{FpsSample, MemoryReport};
use vitra_core::Clock;

use crate::fps::FpsSampler;
use crate::history::FpsHistory;
use crate::memory::MemorySampler;

/// What one [`TelemetryService::tick`] produced.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetryTick {
    /// Set when an FPS window closed on this frame.
    pub fps: Option<FpsSample>,
    /// Set when a memory reading was taken on this frame.
    pub memory: Option<MemoryReport>,
}

/// Owns the clock and the samplers; ticked once per frame.
#[derive(Debug)]
pub struct TelemetryService {
    clock: Arc<dyn Clock>,
    fps: FpsSampler,
    memory: Option<MemorySampler>,
    history: FpsHistory,
    running: bool,
}

impl TelemetryService {
    /// Creates a stopped service.
    ///
    /// `memory` is optional: hosts without a memory source just sample FPS.
    pub fn new(clock: Arc<dyn Clock>, fps_window: Duration, memory: Option<MemorySampler>) -> Self {
        Self {
            clock,
            fps: FpsSampler::new(fps_window),
            memory,
            history: FpsHistory::new(),
            running: false,
        }
    }

    /// Starts both samplers from the current clock time.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        let now = self.clock.now();
        self.fps.start(now);
        if let Some(memory) = self.memory.as_mut() {
            memory.reset();
        }
        self.running = true;
        log::debug!("Telemetry sampling started at {:?}.", now);
    }

    /// Stops sampling. Subsequent ticks do nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.fps.stop();
        self.running = false;
        log::debug!("Telemetry sampling stopped.");
    }

    /// Whether the service is sampling.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Should be called once per presented frame.
    pub fn tick(&mut self) -> TelemetryTick {
        if !self.running {
            return TelemetryTick::default();
        }
        let now = self.clock.now();

        let fps = self.fps.on_frame(now);
        if let Some(sample) = fps {
            self.history.push(sample.fps);
        }
        let memory = self.memory.as_mut().and_then(|m| m.poll(now));

        TelemetryTick { fps, memory }
    }

    /// Recent FPS samples.
    pub fn history(&self) -> &FpsHistory {
        &self.history
    }

    /// The memory sampler, if one is attached.
    pub fn memory_sampler(&self) -> Option<&MemorySampler> {
        self.memory.as_ref()
    }

    /// The clock driving the samplers.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
