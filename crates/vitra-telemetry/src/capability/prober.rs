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

//! The capability prober and its single-slot cache.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitra_core::capability::{
    CapabilityProbe, CapabilitySnapshot, FeatureSet, ProbeError, ProbeFailure,
};
use vitra_core::Clock;

/// Configuration of the capability cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    /// How long a snapshot stays valid, in milliseconds.
    pub ttl_ms: u64,
    /// Refreshes arriving this soon after a probe reuse its result, in milliseconds.
    pub refresh_debounce_ms: u64,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 5 * 60 * 1000,
            refresh_debounce_ms: 250,
        }
    }
}

impl CapabilityConfig {
    /// The snapshot time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// The refresh coalescing window.
    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }
}

/// Runs capability probes and memoizes the merged snapshot.
///
/// The cache is a single slot behind a mutex. Callers that arrive while a
/// probe is running wait for it and share its result, so the host is never
/// probed twice for the same window.
#[derive(Debug)]
pub struct CapabilityProber {
    probes: Vec<Box<dyn CapabilityProbe>>,
    clock: Arc<dyn Clock>,
    config: CapabilityConfig,
    slot: Mutex<Option<Arc<CapabilitySnapshot>>>,
    probe_runs: AtomicU64,
}

impl CapabilityProber {
    /// Creates a prober over the given probes.
    pub fn new(
        probes: Vec<Box<dyn CapabilityProbe>>,
        clock: Arc<dyn Clock>,
        config: CapabilityConfig,
    ) -> Self {
        Self {
            probes,
            clock,
            config,
            slot: Mutex::new(None),
            probe_runs: AtomicU64::new(0),
        }
    }

    /// Returns the cached snapshot, probing if there is none or it has expired.
    pub fn get(&self) -> Arc<CapabilitySnapshot> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if let Some(cached) = slot.as_ref() {
            if now.saturating_sub(cached.probed_at()) < self.config.ttl() {
                return Arc::clone(cached);
            }
            log::debug!("Capability snapshot expired, re-probing.");
        }

        let fresh = Arc::new(self.detect_capabilities());
        *slot = Some(Arc::clone(&fresh));
        fresh
    }

    /// Drops the cached snapshot and probes again.
    ///
    /// A refresh that lands within the debounce window of the previous probe
    /// is served that probe's snapshot instead of touching the host again.
    pub fn refresh(&self) -> Arc<CapabilitySnapshot> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if let Some(cached) = slot.as_ref() {
            if now.saturating_sub(cached.probed_at()) < self.config.refresh_debounce() {
                log::trace!("Capability refresh coalesced with a probe in the same window.");
                return Arc::clone(cached);
            }
        }

        let fresh = Arc::new(self.detect_capabilities());
        *slot = Some(Arc::clone(&fresh));
        fresh
    }

    /// Runs every probe once, bypassing the cache.
    ///
    /// Never fails: a probe that errors or panics contributes no features and
    /// is recorded in [`CapabilitySnapshot::failures`].
    pub fn detect_capabilities(&self) -> CapabilitySnapshot {
        self.probe_runs.fetch_add(1, Ordering::Relaxed);
        let mut supported = FeatureSet::empty();
        let mut failures = Vec::new();

        for probe in &self.probes {
            let declared = probe.features();
            match run_contained(probe.as_ref()) {
                Ok(found) => {
                    let found = found.intersection(declared);
                    log::trace!("Probe '{}' reported {:?}", probe.name(), found);
                    supported = supported.union(found);
                }
                Err(error) => {
                    log::warn!(
                        "Capability probe '{}' failed, treating {:?} as unsupported: {}",
                        probe.name(),
                        declared,
                        error
                    );
                    failures.push(ProbeFailure {
                        probe: probe.name().into_owned(),
                        features: declared,
                        error,
                    });
                }
            }
        }

        log::debug!(
            "Detected {} capabilities ({} probe failures).",
            supported.len(),
            failures.len()
        );
        CapabilitySnapshot::new(supported, self.clock.now(), failures)
    }

    /// Number of full probing passes run so far.
    pub fn probe_runs(&self) -> u64 {
        self.probe_runs.load(Ordering::Relaxed)
    }

    /// The cache configuration.
    pub fn config(&self) -> &CapabilityConfig {
        &self.config
    }
}

fn run_contained(probe: &dyn CapabilityProbe) -> Result<FeatureSet, ProbeError> {
    panic::catch_unwind(AssertUnwindSafe(|| probe.probe())).unwrap_or_else(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Err(ProbeError::Panicked { message })
    })
}
