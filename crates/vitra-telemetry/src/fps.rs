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

//! Frame-rate measurement.
//!
//! The sampler is an explicit state machine driven by the host's frame loop:
//! call [`FpsSampler::on_frame`] once per presented frame. Once a window of at
//! least [`FpsSampler::window`] has elapsed it yields an [`FpsSample`] and
//! starts a new window.

use std::time::Duration;

use vitra_core::telemetry::FpsSample;

/// Default measurement window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Running { frames: u32, window_start: Duration },
}

/// Counts frames and turns them into FPS once per window.
#[derive(Debug, Clone)]
pub struct FpsSampler {
    state: State,
    window: Duration,
}

impl FpsSampler {
    /// Creates an idle sampler with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            state: State::Idle,
            window: window.max(Duration::from_millis(1)),
        }
    }

    /// Starts a fresh window at `now`. Restarting discards the partial window.
    pub fn start(&mut self, now: Duration) {
        self.state = State::Running {
            frames: 0,
            window_start: now,
        };
    }

    /// Stops sampling. Later frames are ignored until [`start`](Self::start).
    pub fn stop(&mut self) {
        self.state = State::Idle;
    }

    /// Whether the sampler is counting frames.
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// The measurement window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records one frame at `now` and closes the window if it is due.
    pub fn on_frame(&mut self, now: Duration) -> Option<FpsSample> {
        let State::Running {
            frames,
            window_start,
        } = &mut self.state
        else {
            return None;
        };

        *frames += 1;
        let elapsed = now.saturating_sub(*window_start);
        if elapsed < self.window {
            return None;
        }

        let sample = FpsSample {
            fps: *frames as f64 / elapsed.as_secs_f64(),
            frames: *frames,
            elapsed,
        };
        *frames = 0;
        *window_start = now;
        log::trace!("FPS window closed: {:.1} fps over {:?}", sample.fps, elapsed);
        Some(sample)
    }
}

impl Default for FpsSampler {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
