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

//! Storage availability probing.

use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use vitra_core::capability::{CapabilityProbe, Feature, FeatureSet, ProbeError};

/// Checks whether persistent and scratch storage are writable.
///
/// `local_storage` and `indexed_db` map to the persistent data directory,
/// `session_storage` to the scratch directory. Each check writes a small
/// marker file and removes it again.
#[derive(Debug, Clone)]
pub struct StorageProbe {
    data_dir: Option<PathBuf>,
    scratch_dir: PathBuf,
}

impl StorageProbe {
    /// Creates a probe over explicit directories.
    pub fn new(data_dir: Option<PathBuf>, scratch_dir: PathBuf) -> Self {
        Self {
            data_dir,
            scratch_dir,
        }
    }

    /// Uses the platform's per-user data directory and temp directory.
    pub fn for_host() -> Self {
        Self::new(host_data_dir(), std::env::temp_dir())
    }
}

/// `VITRA_DATA_DIR`, then the platform convention.
fn host_data_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("VITRA_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }
    if cfg!(windows) {
        return std::env::var_os("APPDATA").map(PathBuf::from);
    }
    if let Some(dir) = std::env::var_os("XDG_DATA_HOME") {
        return Some(PathBuf::from(dir));
    }
    let home = PathBuf::from(std::env::var_os("HOME")?);
    if cfg!(target_os = "macos") {
        Some(home.join("Library").join("Application Support"))
    } else {
        Some(home.join(".local").join("share"))
    }
}

fn check_writable(dir: &Path) -> io::Result<()> {
    let marker = dir.join(format!(".vitra-probe-{}", std::process::id()));
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&marker)?;
    let written = file.write_all(b"ok");
    drop(file);
    let removed = fs::remove_file(&marker);
    written.and(removed)
}

fn to_probe_error(dir: &Path, err: io::Error) -> ProbeError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ProbeError::Blocked {
            reason: format!("{} is not writable", dir.display()),
        },
        io::ErrorKind::NotFound => ProbeError::Unsupported {
            reason: format!("{} does not exist", dir.display()),
        },
        _ => ProbeError::Backend {
            details: format!("{}: {err}", dir.display()),
        },
    }
}

impl CapabilityProbe for StorageProbe {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("storage")
    }

    fn features(&self) -> FeatureSet {
        FeatureSet::of(&[Feature::LocalStorage, Feature::SessionStorage, Feature::IndexedDb])
    }

    fn probe(&self) -> Result<FeatureSet, ProbeError> {
        let mut found = FeatureSet::empty();

        let scratch = check_writable(&self.scratch_dir);
        if scratch.is_ok() {
            found.insert(Feature::SessionStorage);
        }

        let persistent = match &self.data_dir {
            Some(dir) => check_writable(dir).map_err(|e| to_probe_error(dir, e)),
            None => Err(ProbeError::Unsupported {
                reason: "no per-user data directory".into(),
            }),
        };
        match persistent {
            Ok(()) => {
                found.insert(Feature::LocalStorage);
                found.insert(Feature::IndexedDb);
            }
            // Nothing writable at all: report the persistent failure.
            Err(e) if found.is_empty() => return Err(e),
            Err(e) => log::debug!("Persistent storage unavailable: {e}"),
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writable_dirs_report_all_storage() {
        let data = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let probe = StorageProbe::new(
            Some(data.path().to_path_buf()),
            scratch.path().to_path_buf(),
        );

        let found = probe.probe().unwrap();
        assert_eq!(found, probe.features());
        // Markers are cleaned up.
        assert_eq!(fs::read_dir(data.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_data_dir_keeps_session_storage() {
        let scratch = tempfile::tempdir().unwrap();
        let missing = scratch.path().join("does-not-exist");
        let probe = StorageProbe::new(Some(missing), scratch.path().to_path_buf());

        let found = probe.probe().unwrap();
        assert!(found.contains(Feature::SessionStorage));
        assert!(!found.contains(Feature::LocalStorage));
        assert!(!found.contains(Feature::IndexedDb));
    }

    #[test]
    fn test_nothing_writable_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let probe = StorageProbe::new(
            Some(root.path().join("missing-data")),
            root.path().join("missing-scratch"),
        );
        assert!(matches!(probe.probe(), Err(ProbeError::Unsupported { .. })));
    }
}
