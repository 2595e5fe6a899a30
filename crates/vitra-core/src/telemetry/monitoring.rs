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

//! Memory monitoring reports.

use std::time::Duration;

/// A memory reading taken by the memory sampler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryReport {
    /// Clock time of the reading.
    pub sampled_at: Duration,
    /// Bytes in use.
    pub used_bytes: u64,
    /// The limit the reading was judged against, if any.
    pub limit_bytes: Option<u64>,
    /// Whether usage crossed the pressure threshold.
    pub under_pressure: bool,
}

impl MemoryReport {
    /// Returns the usage in megabytes (MB).
    pub fn used_mb(&self) -> f64 {
        self.used_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Fraction of the limit in use, if a limit is known.
    pub fn utilization(&self) -> Option<f64> {
        self.limit_bytes
            .filter(|limit| *limit > 0)
            .map(|limit| self.used_bytes as f64 / limit as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization() {
        let report = MemoryReport {
            used_bytes: 512,
            limit_bytes: Some(1024),
            ..Default::default()
        };
        assert_eq!(report.utilization(), Some(0.5));

        let unbounded = MemoryReport {
            used_bytes: 512,
            limit_bytes: None,
            ..Default::default()
        };
        assert_eq!(unbounded.utilization(), None);
    }

    #[test]
    fn test_used_mb() {
        let report = MemoryReport {
            used_bytes: 3 * 1024 * 1024,
            ..Default::default()
        };
        assert_eq!(report.used_mb(), 3.0);
    }
}
