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

// Vitra Sandbox
// Runs a fake render loop through phases of heavy and light load and logs how
// the engine reacts.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use vitra_sdk::prelude::*;

/// Simulated per-frame cost and how long to hold it.
const PHASES: &[(&str, Duration, Duration)] = &[
    ("light", Duration::from_millis(8), Duration::from_secs(3)),
    ("heavy", Duration::from_millis(33), Duration::from_secs(4)),
    ("light", Duration::from_millis(5), Duration::from_secs(4)),
];

fn load_config() -> Result<EngineConfig> {
    match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .init();

    let engine = TierEngine::native(load_config()?)?;

    let caps = engine.get_capabilities();
    let enabled: Vec<_> = caps.features().iter().map(Feature::name).collect();
    log::info!("Capabilities: {}", enabled.join(", "));
    for failure in caps.failures() {
        log::info!("Probe '{}' unavailable: {}", failure.probe, failure.error);
    }

    let profile = engine.get_performance_tier();
    log::info!(
        "Host: {} MB, {} cores, {:?} network, {:?} storage -> {} (score {:.2})",
        profile.memory_mb,
        profile.cores,
        profile.network,
        profile.storage_class,
        profile.tier,
        profile.score
    );

    let events = engine.subscribe();
    let listener = thread::spawn(move || {
        for event in events {
            match event {
                QualityEvent::FpsSampled(sample) => log::info!("{:.1} fps", sample.fps),
                QualityEvent::LevelChanged { from, to } => {
                    log::info!("quality {from:.3} -> {to:.3}")
                }
                QualityEvent::MemoryPressure(report) => {
                    log::warn!("memory pressure at {:.1} MB", report.used_mb())
                }
            }
        }
    });

    let handle = engine.quality_handle();
    engine.start_monitoring();
    for &(name, frame_cost, length) in PHASES {
        log::info!("Phase '{name}': {} ms per frame", frame_cost.as_millis());
        let phase_end = Instant::now() + length;
        while Instant::now() < phase_end {
            // Work shrinks with the quality level, like fewer particles would.
            thread::sleep(frame_cost.mul_f64(handle.level().max(0.5)));
            engine.on_frame();
        }
    }
    engine.stop_monitoring();

    let state = handle.state();
    log::info!(
        "Done: quality {:.3}, average {:.1} fps (worst {:.1}), {} adjustments",
        state.quality_level,
        state.average_fps,
        state.min_fps,
        state.adjustments
    );

    drop(engine);
    if listener.join().is_err() {
        log::error!("Event listener thread panicked.");
    }
    Ok(())
}
