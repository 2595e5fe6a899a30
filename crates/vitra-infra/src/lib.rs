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

//! # Vitra Infra
//!
//! Concrete implementations of the `vitra-core` contracts for native hosts:
//! a wgpu adapter probe for GPU capabilities, filesystem and environment
//! probes, and a `sysinfo`-backed host and memory source.

#![warn(missing_docs)]

pub mod capability;
pub mod platform;

pub use capability::{native_probes, EnvironmentProbe, StorageProbe, WgpuAdapterProbe};
pub use platform::sysinfo_impl::SysinfoHost;
