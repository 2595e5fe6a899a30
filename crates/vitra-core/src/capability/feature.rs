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

//! The closed set of features a snapshot can report on.

use std::fmt;

/// A single host feature that can be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// Touch input is available.
    Touch,
    /// More than one simultaneous touch point is supported.
    MultiTouch,
    /// The primary pointer can hover.
    Hover,
    /// A hardware (non-software) GPU adapter is present.
    Gpu,
    /// A baseline graphics context can be created.
    WebGl,
    /// A graphics context with SM4-class shaders can be created.
    WebGl2,
    /// The display is scaled above 1x.
    HighDpi,
    /// Location services.
    Geolocation,
    /// A camera device.
    Camera,
    /// A microphone device.
    Microphone,
    /// Bluetooth radio access.
    Bluetooth,
    /// Raw USB access.
    Usb,
    /// Haptic feedback.
    Vibration,
    /// Desktop/system notifications.
    Notifications,
    /// Background workers that outlive a view.
    ServiceWorker,
    /// Running as, or able to run, WebAssembly.
    WebAssembly,
    /// Memory shared between threads.
    SharedMemory,
    /// Persistent key/value storage.
    LocalStorage,
    /// Per-session scratch storage.
    SessionStorage,
    /// Persistent structured storage.
    IndexedDb,
    /// Clipboard access.
    Clipboard,
    /// Fullscreen presentation.
    Fullscreen,
}

impl Feature {
    /// Every feature, in declaration order.
    pub const ALL: [Feature; 22] = [
        Feature::Touch,
        Feature::MultiTouch,
        Feature::Hover,
        Feature::Gpu,
        Feature::WebGl,
        Feature::WebGl2,
        Feature::HighDpi,
        Feature::Geolocation,
        Feature::Camera,
        Feature::Microphone,
        Feature::Bluetooth,
        Feature::Usb,
        Feature::Vibration,
        Feature::Notifications,
        Feature::ServiceWorker,
        Feature::WebAssembly,
        Feature::SharedMemory,
        Feature::LocalStorage,
        Feature::SessionStorage,
        Feature::IndexedDb,
        Feature::Clipboard,
        Feature::Fullscreen,
    ];

    /// Returns the stable snake_case name of the feature.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Touch => "touch",
            Feature::MultiTouch => "multi_touch",
            Feature::Hover => "hover",
            Feature::Gpu => "gpu",
            Feature::WebGl => "webgl",
            Feature::WebGl2 => "webgl2",
            Feature::HighDpi => "high_dpi",
            Feature::Geolocation => "geolocation",
            Feature::Camera => "camera",
            Feature::Microphone => "microphone",
            Feature::Bluetooth => "bluetooth",
            Feature::Usb => "usb",
            Feature::Vibration => "vibration",
            Feature::Notifications => "notifications",
            Feature::ServiceWorker => "service_worker",
            Feature::WebAssembly => "web_assembly",
            Feature::SharedMemory => "shared_memory",
            Feature::LocalStorage => "local_storage",
            Feature::SessionStorage => "session_storage",
            Feature::IndexedDb => "indexed_db",
            Feature::Clipboard => "clipboard",
            Feature::Fullscreen => "fullscreen",
        }
    }

    /// Looks a feature up by its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    #[inline]
    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compact set of [`Feature`]s backed by a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureSet(u32);

impl FeatureSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a set from a slice of features.
    pub fn of(features: &[Feature]) -> Self {
        features.iter().copied().collect()
    }

    /// Adds a feature to the set.
    pub fn insert(&mut self, feature: Feature) {
        self.0 |= feature.bit();
    }

    /// Adds or removes a feature depending on `supported`.
    pub fn set(&mut self, feature: Feature, supported: bool) {
        if supported {
            self.insert(feature);
        } else {
            self.remove(feature);
        }
    }

    /// Removes a feature from the set.
    pub fn remove(&mut self, feature: Feature) {
        self.0 &= !feature.bit();
    }

    /// Returns `true` if the feature is in the set.
    pub fn contains(&self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// Returns the features present in both sets.
    pub fn intersection(self, other: FeatureSet) -> FeatureSet {
        FeatureSet(self.0 & other.0)
    }

    /// Returns the features present in either set.
    pub fn union(self, other: FeatureSet) -> FeatureSet {
        FeatureSet(self.0 | other.0)
    }

    /// Returns `true` if no feature is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of features in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the contained features in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.iter().copied().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = FeatureSet::empty();
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
