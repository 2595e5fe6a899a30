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

//! Abstractions over the host platform.
//!
//! These traits are the seams between the engine and the machine it runs on.
//! `vitra-infra` implements them for native hosts; tests implement them with
//! fixed values.

use std::fmt::Debug;

use crate::tier::{HostSignals, NetworkClass};

/// Static, slow-changing facts about the host used for tier classification.
///
/// Every method may return `None` when the host does not expose the value;
/// the classifier then falls back to conservative defaults.
pub trait HostProbe: Send + Sync + Debug {
    /// Installed memory in megabytes.
    fn device_memory_mb(&self) -> Option<u64>;

    /// Logical core count.
    fn logical_cores(&self) -> Option<u32>;

    /// Reported CPU clock in MHz.
    fn cpu_frequency_mhz(&self) -> Option<u64> {
        None
    }

    /// Whether the host is battery powered.
    fn has_battery(&self) -> Option<bool> {
        None
    }

    /// Class of the network link.
    fn network_class(&self) -> NetworkClass {
        NetworkClass::Unknown
    }

    /// Free bytes on the volume the application stores data on.
    fn available_storage_bytes(&self) -> Option<u64> {
        None
    }

    /// Collects every signal in one go.
    fn signals(&self) -> HostSignals {
        HostSignals {
            memory_mb: self.device_memory_mb(),
            cores: self.logical_cores(),
            clock_mhz: self.cpu_frequency_mhz(),
            has_battery: self.has_battery(),
            network: self.network_class(),
            available_storage_bytes: self.available_storage_bytes(),
        }
    }
}

/// A point-in-time reading of the application's memory footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapUsage {
    /// Bytes currently in use by the application.
    pub used_bytes: u64,
    /// The ceiling the host would allow, if it reports one.
    pub limit_bytes: Option<u64>,
}

/// Source of live memory readings.
pub trait MemorySource: Send + Sync + Debug {
    /// Reads current usage. `None` means the host cannot report it.
    fn heap_usage(&self) -> Option<HeapUsage>;
}
