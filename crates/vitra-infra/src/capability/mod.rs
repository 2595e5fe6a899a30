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

//! Native capability probes.

pub mod environment;
pub mod gpu;
pub mod storage;

pub use environment::EnvironmentProbe;
pub use gpu::WgpuAdapterProbe;
pub use storage::StorageProbe;

use vitra_core::capability::CapabilityProbe;

/// The standard probe set for the current native host.
pub fn native_probes() -> Vec<Box<dyn CapabilityProbe>> {
    vec![
        Box::new(WgpuAdapterProbe::default()),
        Box::new(StorageProbe::for_host()),
        Box::new(EnvironmentProbe::from_env()),
    ]
}
