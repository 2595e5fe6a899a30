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

//! Rolling FPS history.

use std::collections::VecDeque;

/// How many FPS windows the history keeps (one minute at the default window).
pub const FPS_HISTORY_LEN: usize = 60;

/// The most recent FPS samples, oldest first. Full histories drop their
/// oldest sample on push.
#[derive(Debug, Clone)]
pub struct FpsHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl FpsHistory {
    /// An empty history of [`FPS_HISTORY_LEN`] samples.
    pub fn new() -> Self {
        Self::with_capacity(FPS_HISTORY_LEN)
    }

    /// An empty history holding at most `capacity` samples (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a sample.
    pub fn push(&mut self, fps: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(fps);
    }

    /// Number of samples held.
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Whether no window has closed yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples, oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Mean FPS, `0.0` when empty.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// The worst window, `None` when empty.
    pub fn min(&self) -> Option<f64> {
        self.iter().reduce(f64::min)
    }
}

impl Default for FpsHistory {
    fn default() -> Self {
        Self::new()
    }
}
