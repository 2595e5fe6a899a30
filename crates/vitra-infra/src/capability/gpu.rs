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

//! GPU capability probing through a throwaway wgpu adapter.

use std::borrow::Cow;

use vitra_core::capability::{CapabilityProbe, Feature, FeatureSet, ProbeError};

/// Requests a graphics adapter, classifies it and releases it immediately.
///
/// The request asks for the low-power adapter with no surface: this is the
/// cheapest way to learn whether any GPU path exists without waking a
/// discrete GPU or creating a device.
#[derive(Debug, Clone, Copy)]
pub struct WgpuAdapterProbe {
    power_preference: wgpu::PowerPreference,
}

impl WgpuAdapterProbe {
    /// Creates a probe with an explicit power preference.
    pub fn new(power_preference: wgpu::PowerPreference) -> Self {
        Self { power_preference }
    }
}

impl Default for WgpuAdapterProbe {
    fn default() -> Self {
        Self::new(wgpu::PowerPreference::LowPower)
    }
}

impl CapabilityProbe for WgpuAdapterProbe {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("wgpu-adapter")
    }

    fn features(&self) -> FeatureSet {
        FeatureSet::of(&[Feature::Gpu, Feature::WebGl, Feature::WebGl2])
    }

    fn probe(&self) -> Result<FeatureSet, ProbeError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter = match pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: self.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            },
        )) {
            Ok(adapter) => adapter,
            Err(e) => {
                log::debug!("No graphics adapter available: {e}");
                return Ok(FeatureSet::empty());
            }
        };

        let info = adapter.get_info();
        let downlevel = adapter.get_downlevel_capabilities();
        let mut found = FeatureSet::empty();
        found.insert(Feature::WebGl);
        found.set(Feature::Gpu, info.device_type != wgpu::DeviceType::Cpu);
        found.set(
            Feature::WebGl2,
            matches!(
                downlevel.shader_model,
                wgpu::ShaderModel::Sm4 | wgpu::ShaderModel::Sm5
            ),
        );
        log::debug!(
            "Graphics adapter '{}' ({:?}, {:?}) -> {:?}",
            info.name,
            info.device_type,
            info.backend,
            found
        );

        // Release the adapter before the instance so no backend handles outlive the probe.
        drop(adapter);
        drop(instance);
        Ok(found)
    }
}
