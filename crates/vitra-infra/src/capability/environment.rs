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

//! Input, display and platform-integration probing from the build target and
//! process environment.

use std::borrow::Cow;

use vitra_core::capability::{CapabilityProbe, Feature, FeatureSet, ProbeError};

/// Environment variables that carry a desktop scale factor.
const SCALE_FACTOR_VARS: [&str; 3] = ["VITRA_SCALE_FACTOR", "GDK_SCALE", "QT_SCALE_FACTOR"];

/// What kind of host the process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Desktop OS with a display server.
    Desktop,
    /// Desktop OS without a display (CI, SSH, containers).
    Headless,
    /// Phone or tablet.
    Mobile,
    /// WebAssembly runtime.
    Wasm,
}

impl HostKind {
    /// Detects the host kind of the running process.
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            HostKind::Wasm
        } else if cfg!(any(target_os = "android", target_os = "ios")) {
            HostKind::Mobile
        } else if cfg!(any(target_os = "windows", target_os = "macos")) || has_display_server() {
            HostKind::Desktop
        } else {
            HostKind::Headless
        }
    }
}

fn has_display_server() -> bool {
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

fn scale_factor_from_env() -> Option<f64> {
    SCALE_FACTOR_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| value.trim().parse::<f64>().ok())
}

/// Answers input and presentation questions from the target and environment.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentProbe {
    kind: HostKind,
    scale_factor: Option<f64>,
}

impl EnvironmentProbe {
    /// Creates a probe for an explicit host kind and scale factor.
    pub fn new(kind: HostKind, scale_factor: Option<f64>) -> Self {
        Self { kind, scale_factor }
    }

    /// Detects the host kind and reads the scale factor from the environment.
    pub fn from_env() -> Self {
        Self::new(HostKind::detect(), scale_factor_from_env())
    }
}

impl CapabilityProbe for EnvironmentProbe {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("environment")
    }

    fn features(&self) -> FeatureSet {
        FeatureSet::of(&[
            Feature::Touch,
            Feature::MultiTouch,
            Feature::Hover,
            Feature::HighDpi,
            Feature::WebAssembly,
            Feature::SharedMemory,
            Feature::Fullscreen,
            Feature::Clipboard,
            Feature::Notifications,
        ])
    }

    fn probe(&self) -> Result<FeatureSet, ProbeError> {
        if let Some(scale) = self.scale_factor {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ProbeError::Backend {
                    details: format!("nonsensical scale factor {scale}"),
                });
            }
        }

        let mut found = FeatureSet::empty();
        let mobile = self.kind == HostKind::Mobile;
        let desktop = self.kind == HostKind::Desktop;

        found.set(Feature::Touch, mobile);
        found.set(Feature::MultiTouch, mobile);
        found.set(Feature::Hover, desktop);
        found.set(Feature::HighDpi, self.scale_factor.is_some_and(|s| s > 1.0));
        found.set(Feature::WebAssembly, self.kind == HostKind::Wasm);
        found.set(
            Feature::SharedMemory,
            self.kind != HostKind::Wasm || cfg!(target_feature = "atomics"),
        );
        found.set(Feature::Fullscreen, desktop || mobile);
        found.set(Feature::Clipboard, desktop);
        found.set(Feature::Notifications, desktop || mobile);
        Ok(found)
    }
}
