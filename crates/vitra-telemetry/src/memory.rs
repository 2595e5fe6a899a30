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

//! Interval-based memory sampling with advisory pressure detection.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitra_core::platform::{HeapUsage, MemorySource};
use vitra_core::telemetry::MemoryReport;

/// Memory sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Time between readings, in milliseconds.
    pub interval_ms: u64,
    /// Absolute usage above which pressure is signalled.
    pub limit_bytes: Option<u64>,
    /// With no absolute limit, the fraction of the host-reported limit above
    /// which pressure is signalled.
    pub pressure_ratio: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            limit_bytes: None,
            pressure_ratio: 0.9,
        }
    }
}

impl MemoryConfig {
    /// Time between readings.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    fn judge(&self, usage: HeapUsage, sampled_at: Duration) -> MemoryReport {
        let (limit_bytes, under_pressure) = match (self.limit_bytes, usage.limit_bytes) {
            (Some(limit), _) => (Some(limit), usage.used_bytes > limit),
            (None, Some(host_limit)) if host_limit > 0 => (
                Some(host_limit),
                usage.used_bytes as f64 / host_limit as f64 > self.pressure_ratio,
            ),
            _ => (None, false),
        };
        MemoryReport {
            sampled_at,
            used_bytes: usage.used_bytes,
            limit_bytes,
            under_pressure,
        }
    }
}

/// Polls a [`MemorySource`] at a fixed interval.
///
/// If the source cannot report usage the sampler switches itself off for good;
/// nothing downstream depends on it.
#[derive(Debug)]
pub struct MemorySampler {
    source: Arc<dyn MemorySource>,
    config: MemoryConfig,
    last_poll: Option<Duration>,
    last_report: Option<MemoryReport>,
    disabled: bool,
}

impl MemorySampler {
    /// Creates a sampler over `source`.
    pub fn new(source: Arc<dyn MemorySource>, config: MemoryConfig) -> Self {
        Self {
            source,
            config,
            last_poll: None,
            last_report: None,
            disabled: false,
        }
    }

    /// Takes a reading if the interval has passed since the previous one.
    ///
    /// The first call always reads.
    pub fn poll(&mut self, now: Duration) -> Option<MemoryReport> {
        if self.disabled {
            return None;
        }
        if let Some(last) = self.last_poll {
            if now.saturating_sub(last) < self.config.interval() {
                return None;
            }
        }
        self.last_poll = Some(now);

        let Some(usage) = self.source.heap_usage() else {
            log::info!("Memory usage is not available on this host; memory sampling disabled.");
            self.disabled = true;
            return None;
        };

        let report = self.config.judge(usage, now);
        if report.under_pressure {
            log::warn!(
                "Memory pressure: {:.1} MB in use (limit {:?} bytes).",
                report.used_mb(),
                report.limit_bytes
            );
        } else {
            log::trace!("Memory sample: {:.1} MB in use.", report.used_mb());
        }
        self.last_report = Some(report);
        Some(report)
    }

    /// Forgets the previous reading time so the next poll reads immediately.
    pub fn reset(&mut self) {
        self.last_poll = None;
    }

    /// Whether the sampler gave up because the source is unavailable.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The latest reading, if any.
    pub fn last_report(&self) -> Option<MemoryReport> {
        self.last_report
    }
}
