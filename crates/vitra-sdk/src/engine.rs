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

//! The [`TierEngine`] facade and its builder.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use vitra_control::{Adjustment, QualityHandle, QualityMonitor};
use vitra_core::capability::{CapabilityProbe, CapabilitySnapshot};
use vitra_core::platform::{HostProbe, MemorySource};
use vitra_core::telemetry::QualityEvent;
use vitra_core::tier::PerformanceProfile;
use vitra_core::{Clock, SystemClock};
use vitra_infra::{native_probes, SysinfoHost};
use vitra_telemetry::{CapabilityProber, ProfileDetector};

use crate::config::EngineConfig;

/// A host that reports nothing. The classifier falls back to its defaults.
#[derive(Debug)]
struct UnknownHost;

impl HostProbe for UnknownHost {
    fn device_memory_mb(&self) -> Option<u64> {
        None
    }

    fn logical_cores(&self) -> Option<u32> {
        None
    }
}

/// One instance per application: capability cache, performance profile and
/// runtime quality monitor.
///
/// All methods take `&self`, so the engine can be shared behind an `Arc`
/// between the render loop and whoever reads capabilities.
#[derive(Debug)]
pub struct TierEngine {
    config: EngineConfig,
    prober: CapabilityProber,
    profile: ProfileDetector,
    monitor: Mutex<QualityMonitor>,
    handle: QualityHandle,
}

impl TierEngine {
    /// Starts building an engine with injected collaborators.
    pub fn builder() -> TierEngineBuilder {
        TierEngineBuilder::default()
    }

    /// Builds an engine wired to the native probes of this machine.
    pub fn native(config: EngineConfig) -> Result<Self> {
        let mut host = SysinfoHost::new();
        if let Some(network) = config.network_override {
            host = host.with_network(network);
        }
        let host = Arc::new(host);

        TierEngineBuilder::default()
            .config(config)
            .probes(native_probes())
            .host(host.clone())
            .memory_source(host)
            .build()
            .context("Failed to build the native tier engine")
    }

    /// The cached capability snapshot, probing on first use or after expiry.
    pub fn get_capabilities(&self) -> Arc<CapabilitySnapshot> {
        self.prober.get()
    }

    /// Discards the cached snapshot and probes again.
    pub fn refresh_capabilities(&self) -> Arc<CapabilitySnapshot> {
        self.prober.refresh()
    }

    /// The host's performance profile. Computed once per engine.
    pub fn get_performance_tier(&self) -> PerformanceProfile {
        self.profile.get()
    }

    /// The current quality level, in `[min_level, max_level]`.
    pub fn quality_level(&self) -> f64 {
        self.handle.level()
    }

    /// A cheap read-only handle onto the live quality state.
    pub fn quality_handle(&self) -> QualityHandle {
        self.handle.clone()
    }

    /// Subscribes to FPS samples, level changes and memory pressure.
    pub fn subscribe(&self) -> Receiver<QualityEvent> {
        self.monitor().subscribe()
    }

    /// Starts the runtime monitor. Idempotent.
    pub fn start_monitoring(&self) {
        self.monitor().start();
    }

    /// Stops the runtime monitor. Idempotent.
    pub fn stop_monitoring(&self) {
        self.monitor().stop();
    }

    /// Whether the runtime monitor is sampling.
    pub fn is_monitoring(&self) -> bool {
        self.monitor().is_running()
    }

    /// Call once per presented frame from the render loop.
    pub fn on_frame(&self) -> Option<Adjustment> {
        self.monitor().on_frame()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn monitor(&self) -> MutexGuard<'_, QualityMonitor> {
        self.monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for [`TierEngine`].
///
/// Anything left unset falls back to a harmless default: no capability
/// probes, a host that reports nothing, no memory sampling, and the system
/// clock.
#[derive(Debug, Default)]
pub struct TierEngineBuilder {
    config: EngineConfig,
    probes: Vec<Box<dyn CapabilityProbe>>,
    host: Option<Arc<dyn HostProbe>>,
    memory_source: Option<Arc<dyn MemorySource>>,
    clock: Option<Arc<dyn Clock>>,
}

impl TierEngineBuilder {
    /// Sets the configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the capability probes.
    pub fn probes(mut self, probes: Vec<Box<dyn CapabilityProbe>>) -> Self {
        self.probes = probes;
        self
    }

    /// Adds one capability probe.
    pub fn probe(mut self, probe: impl CapabilityProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    /// Sets the host the performance profile is read from.
    pub fn host(mut self, host: Arc<dyn HostProbe>) -> Self {
        self.host = Some(host);
        self
    }

    /// Enables memory sampling from `source`.
    pub fn memory_source(mut self, source: Arc<dyn MemorySource>) -> Self {
        self.memory_source = Some(source);
        self
    }

    /// Sets the clock used for the capability TTL and the samplers.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validates the configuration and assembles the engine.
    ///
    /// The performance profile is detected here so the monitor can be seeded
    /// from the tier.
    pub fn build(self) -> Result<TierEngine> {
        self.config
            .validate()
            .context("Invalid engine configuration")?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()) as Arc<dyn Clock>);
        let host = self
            .host
            .unwrap_or_else(|| Arc::new(UnknownHost) as Arc<dyn HostProbe>);

        let profile = ProfileDetector::new(host, self.config.tier);
        let tier = profile.get().tier;

        let prober = CapabilityProber::new(self.probes, clock.clone(), self.config.capabilities);
        let monitor = QualityMonitor::new(self.config.monitor, clock, self.memory_source, tier);
        let handle = monitor.handle();

        log::info!(
            "Tier engine ready: tier {tier}, quality level {:.2}.",
            handle.level()
        );

        Ok(TierEngine {
            config: self.config,
            prober,
            profile,
            monitor: Mutex::new(monitor),
            handle,
        })
    }
}
