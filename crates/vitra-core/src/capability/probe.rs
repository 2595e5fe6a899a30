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

//! The probe contract and its failure type.

use std::borrow::Cow;
use std::fmt;

use super::feature::FeatureSet;

/// An error raised by a single capability probe.
///
/// Probe errors never escape the prober: they are logged, recorded on the
/// snapshot and the probe's features collapse to "unsupported".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The host has no API for this check at all.
    Unsupported {
        /// What was missing.
        reason: String,
    },
    /// The API exists but access was refused (sandbox, permissions).
    Blocked {
        /// Why access was refused.
        reason: String,
    },
    /// The underlying backend reported an error while probing.
    Backend {
        /// Backend-specific details.
        details: String,
    },
    /// The probe panicked; the panic was contained by the prober.
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Unsupported { reason } => write!(f, "unsupported on this host: {reason}"),
            ProbeError::Blocked { reason } => write!(f, "access blocked: {reason}"),
            ProbeError::Backend { details } => write!(f, "backend error: {details}"),
            ProbeError::Panicked { message } => write!(f, "probe panicked: {message}"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// A recorded probe failure, kept on the snapshot for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    /// The name of the probe that failed.
    pub probe: String,
    /// The features that were forced to `false` because of it.
    pub features: FeatureSet,
    /// What went wrong.
    pub error: ProbeError,
}

/// A check that answers for a declared subset of features.
///
/// Implementations should use the least invasive test available and release
/// anything they acquire before returning.
pub trait CapabilityProbe: Send + Sync + fmt::Debug {
    /// A short, human-readable identifier for logs.
    fn name(&self) -> Cow<'static, str>;

    /// The features this probe is responsible for.
    ///
    /// Anything the probe reports outside of this set is ignored.
    fn features(&self) -> FeatureSet;

    /// Runs the check and returns the supported subset of [`features`](Self::features).
    fn probe(&self) -> Result<FeatureSet, ProbeError>;
}
