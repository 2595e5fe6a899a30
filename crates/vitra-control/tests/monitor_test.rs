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

use vitra_control::{Adjustment, MonitorConfig, QualityMonitor};
use vitra_core::platform::{HeapUsage, MemorySource};
use vitra_core::quality::QualityConfig;
use vitra_core::telemetry::QualityEvent;
use vitra_core::tier::PerformanceTier;
use vitra_core::ManualClock;
use vitra_telemetry::MemoryConfig;

fn monitor(clock: &ManualClock, tier: PerformanceTier) -> QualityMonitor {
    QualityMonitor::new(MonitorConfig::default(), Arc::new(clock.clone()), None, tier)
}

/// Runs `seconds` of frames at a steady `fps` and returns every adjustment.
fn run_at(
    monitor: &mut QualityMonitor,
    clock: &ManualClock,
    fps: u64,
    seconds: u64,
) -> Vec<Adjustment> {
    // Round the frame time up so `fps` frames always span a full window.
    let frame = Duration::from_nanos(1_000_000_000u64.div_ceil(fps));
    let mut adjustments = Vec::new();
    for _ in 0..fps * seconds {
        clock.advance(frame);
        adjustments.extend(monitor.on_frame());
    }
    adjustments
}

#[derive(Debug)]
struct FixedHeap {
    used: AtomicU64,
}

impl MemorySource for FixedHeap {
    fn heap_usage(&self) -> Option<HeapUsage> {
        Some(HeapUsage {
            used_bytes: self.used.load(Ordering::SeqCst),
            limit_bytes: None,
        })
    }
}

#[test]
fn test_seeded_from_tier() {
    let clock = ManualClock::new();
    assert_eq!(monitor(&clock, PerformanceTier::Ultra).quality_level(), 1.0);
    assert_eq!(monitor(&clock, PerformanceTier::Medium).quality_level(), 0.6);
    assert_eq!(monitor(&clock, PerformanceTier::Low).handle().level(), 0.35);
}

#[test]
fn test_half_target_fps_steps_down_each_window() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::Ultra);
    monitor.start();

    let adjustments = run_at(&mut monitor, &clock, 30, 2);
    assert_eq!(adjustments.len(), 2);
    assert!((adjustments[0].level() - 0.9).abs() < 1e-9);
    assert!((adjustments[1].level() - 0.81).abs() < 1e-9);

    let state = monitor.handle().state();
    assert!((state.quality_level - 0.81).abs() < 1e-9);
    assert!((state.current_fps - 30.0).abs() < 0.5);
    assert_eq!(state.adjustments, 2);
}

#[test]
fn test_sustained_overload_floors_at_minimum() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::Ultra);
    monitor.start();

    run_at(&mut monitor, &clock, 20, 40);
    assert_eq!(monitor.quality_level(), 0.1);
    assert_eq!(monitor.handle().scale(1000), 100);
}

#[test]
fn test_headroom_steps_up_and_caps() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::Medium);
    monitor.start();

    let adjustments = run_at(&mut monitor, &clock, 75, 1);
    assert_eq!(adjustments.len(), 1);
    assert!((monitor.quality_level() - 0.63).abs() < 1e-9);

    run_at(&mut monitor, &clock, 75, 30);
    assert_eq!(monitor.quality_level(), 1.0);
}

#[test]
fn test_fps_inside_band_never_moves_level() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::High);
    monitor.start();

    for fps in [50, 55, 60, 65, 70, 52, 68] {
        for adjustment in run_at(&mut monitor, &clock, fps, 3) {
            assert_eq!(adjustment, Adjustment::Unchanged(0.8));
        }
    }
    assert_eq!(monitor.handle().state().adjustments, 0);
}

#[test]
fn test_frames_before_start_and_after_stop_are_ignored() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::Ultra);

    assert!(run_at(&mut monitor, &clock, 30, 3).is_empty());

    monitor.start();
    assert_eq!(run_at(&mut monitor, &clock, 30, 1).len(), 1);
    monitor.stop();
    assert!(!monitor.is_running());

    assert!(run_at(&mut monitor, &clock, 30, 3).is_empty());
    assert!((monitor.quality_level() - 0.9).abs() < 1e-9);
}

#[test]
fn test_subscribers_see_sample_then_change() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::Ultra);
    let events = monitor.subscribe();
    monitor.start();

    run_at(&mut monitor, &clock, 30, 1);

    match events.try_recv().unwrap() {
        QualityEvent::FpsSampled(sample) => assert!((sample.fps - 30.0).abs() < 0.5),
        other => panic!("expected FpsSampled, got {other:?}"),
    }
    match events.try_recv().unwrap() {
        QualityEvent::LevelChanged { from, to } => {
            assert_eq!(from, 1.0);
            assert!((to - 0.9).abs() < 1e-9);
        }
        other => panic!("expected LevelChanged, got {other:?}"),
    }
    assert!(events.try_recv().is_err());
}

#[test]
fn test_memory_pressure_is_published() {
    let clock = ManualClock::new();
    let config = MonitorConfig {
        memory: MemoryConfig {
            limit_bytes: Some(1_000),
            ..Default::default()
        },
        ..Default::default()
    };
    let heap = Arc::new(FixedHeap {
        used: AtomicU64::new(10),
    });
    let mut monitor = QualityMonitor::new(
        config,
        Arc::new(clock.clone()),
        Some(heap.clone() as Arc<dyn MemorySource>),
        PerformanceTier::High,
    );
    let events = monitor.subscribe();
    monitor.start();

    run_at(&mut monitor, &clock, 60, 6);
    assert!(!events
        .try_iter()
        .any(|e| matches!(e, QualityEvent::MemoryPressure(_))));

    heap.used.store(5_000, Ordering::SeqCst);
    run_at(&mut monitor, &clock, 60, 6);
    let pressure: Vec<_> = events
        .try_iter()
        .filter_map(|e| match e {
            QualityEvent::MemoryPressure(report) => Some(report),
            _ => None,
        })
        .collect();
    assert_eq!(pressure.len(), 1);
    assert_eq!(pressure[0].used_bytes, 5_000);
    // Advisory only: the level is untouched by memory pressure.
    assert_eq!(monitor.quality_level(), 0.8);
}

#[test]
fn test_reseed_resets_level() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::Ultra);
    monitor.start();
    run_at(&mut monitor, &clock, 30, 3);
    assert!(monitor.quality_level() < 1.0);

    monitor.reseed(PerformanceTier::High);
    assert_eq!(monitor.quality_level(), 0.8);
    assert_eq!(monitor.handle().level(), 0.8);
}

#[test]
fn test_unvalidated_inverted_bounds_do_not_panic() {
    let clock = ManualClock::new();
    let config = MonitorConfig {
        quality: QualityConfig {
            min_level: 0.9,
            max_level: 0.5,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut monitor =
        QualityMonitor::new(config, Arc::new(clock.clone()), None, PerformanceTier::Ultra);
    assert_eq!(monitor.quality_level(), 0.5);

    monitor.start();
    run_at(&mut monitor, &clock, 30, 2);
    run_at(&mut monitor, &clock, 90, 2);
    assert_eq!(monitor.quality_level(), 0.5);

    monitor.reseed(PerformanceTier::Low);
    assert_eq!(monitor.handle().level(), 0.5);
}

#[test]
fn test_state_tracks_worst_window() {
    let clock = ManualClock::new();
    let mut monitor = monitor(&clock, PerformanceTier::Medium);
    monitor.start();

    run_at(&mut monitor, &clock, 60, 2);
    run_at(&mut monitor, &clock, 30, 1);
    run_at(&mut monitor, &clock, 60, 2);

    let state = monitor.handle().state();
    assert!((state.min_fps - 30.0).abs() < 0.5, "min {}", state.min_fps);
    assert!((state.current_fps - 60.0).abs() < 0.5);
    assert!(state.average_fps > state.min_fps && state.average_fps < 60.0);
}
