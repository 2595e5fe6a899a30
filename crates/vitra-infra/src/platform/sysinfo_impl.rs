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

//! sysinfo-based implementation of the host and memory contracts.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use sysinfo::{Disks, Pid, ProcessesToUpdate, System};
use vitra_core::platform::{HeapUsage, HostProbe, MemorySource};
use vitra_core::tier::NetworkClass;

/// A host probe and memory source backed by the `sysinfo` crate.
#[derive(Debug)]
pub struct SysinfoHost {
    system: Mutex<System>,
    pid: Option<Pid>,
    data_path: PathBuf,
    network: NetworkClass,
}

impl SysinfoHost {
    /// Creates a host over the current process.
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        let pid = sysinfo::get_current_pid()
            .map_err(|e| log::warn!("Cannot resolve own PID, memory sampling disabled: {e}"))
            .ok();
        let data_path = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());

        Self {
            system: Mutex::new(system),
            pid,
            data_path,
            network: NetworkClass::Unknown,
        }
    }

    /// Overrides the network class, which `sysinfo` cannot observe.
    pub fn with_network(mut self, network: NetworkClass) -> Self {
        self.network = network;
        self
    }

    /// Measures free storage on the volume holding `path` instead of the
    /// working directory.
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Refreshes CPU and memory figures.
    pub fn refresh(&self) {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_cpu_all();
        system.refresh_memory();
    }
}

impl Default for SysinfoHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Free space of the disk with the longest mount point that contains `path`.
fn available_space_for(disks: &Disks, path: &Path) -> Option<u64> {
    disks
        .list()
        .iter()
        .filter(|disk| path.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.available_space())
}

impl HostProbe for SysinfoHost {
    fn device_memory_mb(&self) -> Option<u64> {
        let system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        Some(system.total_memory() / (1024 * 1024)).filter(|mb| *mb > 0)
    }

    fn logical_cores(&self) -> Option<u32> {
        let system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        match system.cpus().len() {
            0 => std::thread::available_parallelism()
                .ok()
                .map(|n| n.get() as u32),
            n => Some(n as u32),
        }
    }

    fn cpu_frequency_mhz(&self) -> Option<u64> {
        let system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system
            .cpus()
            .iter()
            .map(|cpu| cpu.frequency())
            .max()
            .filter(|mhz| *mhz > 0)
    }

    fn has_battery(&self) -> Option<bool> {
        // sysinfo does not expose power supplies.
        None
    }

    fn network_class(&self) -> NetworkClass {
        self.network
    }

    fn available_storage_bytes(&self) -> Option<u64> {
        let disks = Disks::new_with_refreshed_list();
        available_space_for(&disks, &self.data_path).or_else(|| {
            disks.list().iter().map(|disk| disk.available_space()).max()
        })
    }
}

impl MemorySource for SysinfoHost {
    fn heap_usage(&self) -> Option<HeapUsage> {
        let pid = self.pid?;
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let process = system.process(pid)?;
        Some(HeapUsage {
            used_bytes: process.memory(),
            limit_bytes: Some(system.total_memory()).filter(|total| *total > 0),
        })
    }
}
