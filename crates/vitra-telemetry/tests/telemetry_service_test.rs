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

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vitra_core::platform::{HeapUsage, MemorySource};
use vitra_core::ManualClock;
use vitra_telemetry::fps::DEFAULT_WINDOW;
use vitra_telemetry::{MemoryConfig, MemorySampler, TelemetryService};

#[derive(Debug, Default)]
struct GrowingHeap {
    used: AtomicU64,
}

impl MemorySource for GrowingHeap {
    fn heap_usage(&self) -> Option<HeapUsage> {
        let used = self.used.fetch_add(100, Ordering::SeqCst) + 100;
        Some(HeapUsage {
            used_bytes: used,
            limit_bytes: Some(1_000),
        })
    }
}

fn service_with_heap(clock: &ManualClock) -> TelemetryService {
    let sampler = MemorySampler::new(Arc::new(GrowingHeap::default()), MemoryConfig::default());
    TelemetryService::new(Arc::new(clock.clone()), DEFAULT_WINDOW, Some(sampler))
}

#[test]
fn test_ticks_before_start_are_empty() {
    let clock = ManualClock::new();
    let mut service = service_with_heap(&clock);
    for _ in 0..120 {
        clock.advance_ms(16);
        let tick = service.tick();
        assert!(tick.fps.is_none());
        assert!(tick.memory.is_none());
    }
}

#[test]
fn test_thirty_fps_loop_produces_samples_and_history() {
    let clock = ManualClock::new();
    let mut service = service_with_heap(&clock);
    service.start();

    let mut fps_samples = Vec::new();
    let mut memory_reports = Vec::new();
    // Ten seconds of ~30 fps.
    for _ in 0..300 {
        clock.advance(Duration::from_micros(33_334));
        let tick = service.tick();
        fps_samples.extend(tick.fps);
        memory_reports.extend(tick.memory);
    }

    assert!(fps_samples.len() >= 9);
    for sample in &fps_samples {
        assert!((sample.fps - 30.0).abs() < 1.0, "unexpected fps {}", sample.fps);
    }
    assert_eq!(service.history().count(), fps_samples.len());
    // First frame reads immediately, then every 5s.
    assert_eq!(memory_reports.len(), 2);
}

#[test]
fn test_memory_pressure_reaches_tick() {
    let clock = ManualClock::new();
    let mut service = service_with_heap(&clock);
    service.start();

    let mut pressured = false;
    for _ in 0..12 {
        clock.advance(Duration::from_secs(5));
        if let Some(report) = service.tick().memory {
            pressured |= report.under_pressure;
        }
    }
    assert!(pressured);
}

#[test]
fn test_stop_makes_ticks_noops() {
    let clock = ManualClock::new();
    let mut service = service_with_heap(&clock);
    service.start();
    service.stop();
    clock.advance(Duration::from_secs(10));
    assert_eq!(service.tick(), Default::default());
    assert!(!service.is_running());
}
