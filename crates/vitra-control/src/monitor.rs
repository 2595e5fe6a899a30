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

//! The runtime quality monitor.
//!
//! Ties the telemetry samplers to the [`AdaptiveController`]. The host calls
//! [`QualityMonitor::on_frame`] from its render loop; whenever an FPS window
//! closes, that very sample is fed to the controller before anything else
//! happens, so an adjustment never acts on a stale measurement.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use vitra_core::platform::MemorySource;
use vitra_core::quality::{QualityConfig, QualityState};
use vitra_core::telemetry::QualityEvent;
use vitra_core::tier::PerformanceTier;
use vitra_core::Clock;
use vitra_telemetry::{MemoryConfig, MemorySampler, TelemetryService};

use crate::controller::{AdaptiveController, Adjustment};
use crate::handle::QualityHandle;
use crate::hub::EventHub;

/// Configuration of the quality monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Controller tuning.
    pub quality: QualityConfig,
    /// FPS measurement window, in milliseconds.
    pub fps_window_ms: u64,
    /// Memory sampler settings.
    pub memory: MemoryConfig,
    /// Capacity of each subscriber channel.
    pub event_buffer_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            quality: QualityConfig::default(),
            fps_window_ms: 1_000,
            memory: MemoryConfig::default(),
            event_buffer_size: 256,
        }
    }
}

/// Samples live performance and drives the shared quality level.
#[derive(Debug)]
pub struct QualityMonitor {
    telemetry: TelemetryService,
    controller: AdaptiveController,
    state: Arc<RwLock<QualityState>>,
    hub: EventHub,
    running: bool,
}

impl QualityMonitor {
    /// Creates a stopped monitor seeded from `tier`.
    ///
    /// Without a `memory_source` only FPS is sampled.
    pub fn new(
        config: MonitorConfig,
        clock: Arc<dyn Clock>,
        memory_source: Option<Arc<dyn MemorySource>>,
        tier: PerformanceTier,
    ) -> Self {
        let seed = config.quality.seed_level(tier);
        let memory = memory_source.map(|source| MemorySampler::new(source, config.memory));
        let telemetry = TelemetryService::new(
            clock,
            Duration::from_millis(config.fps_window_ms),
            memory,
        );
        log::debug!("Quality monitor seeded at {seed:.2} for tier {tier}.");

        Self {
            telemetry,
            controller: AdaptiveController::new(config.quality, seed),
            state: Arc::new(RwLock::new(QualityState::seeded(seed, config.quality.target_fps))),
            hub: EventHub::new(config.event_buffer_size),
            running: false,
        }
    }

    /// Starts sampling. Calling it while running does nothing.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.telemetry.start();
        self.running = true;
        log::info!("Quality monitor started (level {:.2}).", self.controller.level());
    }

    /// Stops sampling. The next [`on_frame`](Self::on_frame) is a no-op.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.telemetry.stop();
        log::info!("Quality monitor stopped (level {:.2}).", self.controller.level());
    }

    /// Whether the monitor is sampling.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Call once per presented frame.
    ///
    /// Returns the controller's decision when an FPS window closed on this frame.
    pub fn on_frame(&mut self) -> Option<Adjustment> {
        if !self.running {
            return None;
        }
        let tick = self.telemetry.tick();

        let adjustment = tick.fps.map(|sample| {
            let adjustment = self.controller.adjust(sample.fps);
            let history = self.telemetry.history();
            let (average_fps, min_fps) = (history.average(), history.min().unwrap_or(sample.fps));
            {
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                state.current_fps = sample.fps;
                state.average_fps = average_fps;
                state.min_fps = min_fps;
                state.quality_level = adjustment.level();
                if adjustment.changed() {
                    state.adjustments += 1;
                }
            }

            self.hub.publish(QualityEvent::FpsSampled(sample));
            match adjustment {
                Adjustment::Decreased { from, to } | Adjustment::Increased { from, to } => {
                    log::debug!(
                        "Quality level {from:.3} -> {to:.3} at {:.1} fps (target {:.0}).",
                        sample.fps,
                        self.controller.config().target_fps
                    );
                    self.hub.publish(QualityEvent::LevelChanged { from, to });
                }
                Adjustment::Unchanged(_) => {}
            }
            adjustment
        });

        if let Some(report) = tick.memory.filter(|r| r.under_pressure) {
            self.hub.publish(QualityEvent::MemoryPressure(report));
        }

        adjustment
    }

    /// Resets the level to the seed of `tier`, e.g. after the host profile changed.
    pub fn reseed(&mut self, tier: PerformanceTier) {
        let seed = self.controller.config().seed_level(tier);
        self.controller.reset(seed);
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .quality_level = seed;
        log::info!("Quality level reseeded to {seed:.2} for tier {tier}.");
    }

    /// A read-only handle onto the live state.
    pub fn handle(&self) -> QualityHandle {
        QualityHandle::new(Arc::clone(&self.state))
    }

    /// Subscribes to quality events.
    pub fn subscribe(&self) -> Receiver<QualityEvent> {
        self.hub.subscribe()
    }

    /// The current level.
    pub fn quality_level(&self) -> f64 {
        self.controller.level()
    }

    /// The telemetry service, for diagnostics.
    pub fn telemetry(&self) -> &TelemetryService {
        &self.telemetry
    }
}
