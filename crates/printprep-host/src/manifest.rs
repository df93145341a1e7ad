// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem host: keeps a JSON manifest of shared assets next to them.
//
// Manifest layout (`shared_assets.json` in the output directory):
//   {
//     "updated_at": "<RFC 3339>",
//     "assets": [ { "name": "...", "shared_at": "<RFC 3339>" }, ... ]
//   }

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use printprep_core::error::{PrintprepError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::traits::{AssetHost, SharedAsset};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "shared_assets.json";

/// On-disk manifest contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub updated_at: DateTime<Utc>,
    pub assets: Vec<SharedAsset>,
}

/// Host for standalone runs: shared files are listed in a manifest that
/// other tools can pick up from the output directory.
#[derive(Debug)]
pub struct ManifestHost {
    output_dir: PathBuf,
    manifest_path: PathBuf,
    assets: Mutex<Vec<SharedAsset>>,
}

impl ManifestHost {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let manifest_path = output_dir.join(MANIFEST_FILE);
        Self {
            output_dir,
            manifest_path,
            assets: Mutex::new(Vec::new()),
        }
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Assets shared so far, in share order.
    pub fn assets(&self) -> Vec<SharedAsset> {
        self.lock().clone()
    }

    /// Read a manifest previously written by this host.
    pub fn read_manifest(path: impl AsRef<Path>) -> Result<Manifest> {
        let raw = std::fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SharedAsset>> {
        self.assets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_manifest(&self, assets: &[SharedAsset]) -> Result<()> {
        let manifest = Manifest {
            updated_at: Utc::now(),
            assets: assets.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&manifest)?;
        std::fs::write(&self.manifest_path, bytes)?;
        debug!(path = %self.manifest_path.display(), "manifest written");
        Ok(())
    }
}

impl AssetHost for ManifestHost {
    fn host_name(&self) -> &str {
        "manifest"
    }

    fn share(&self, name: &str) -> Result<()> {
        let mut assets = self.lock();
        if assets.iter().any(|asset| asset.name == name) {
            debug!(name, "asset already shared");
            return Ok(());
        }
        assets.push(SharedAsset {
            name: name.to_string(),
            shared_at: Utc::now(),
        });
        Ok(())
    }

    #[instrument(skip(self), fields(count = names.len()))]
    fn synchronize(&self, names: &[String]) -> Result<()> {
        let assets = self.lock();
        for name in names {
            if !assets.iter().any(|asset| &asset.name == name) {
                return Err(PrintprepError::Host(format!(
                    "cannot synchronize '{name}': it was never shared"
                )));
            }
            if !self.output_dir.join(name).is_file() {
                return Err(PrintprepError::Host(format!(
                    "cannot synchronize '{name}': not found in {}",
                    self.output_dir.display()
                )));
            }
        }
        self.write_manifest(&assets)?;
        info!(synchronized = names.len(), total = assets.len(), "assets synchronized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchronize_writes_manifest_in_share_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.tiff"), b"b").unwrap();
        std::fs::write(dir.path().join("a.tiff"), b"a").unwrap();

        let host = ManifestHost::new(dir.path());
        host.share("b.tiff").unwrap();
        host.synchronize(&["b.tiff".into()]).unwrap();
        host.share("a.tiff").unwrap();
        host.synchronize(&["a.tiff".into()]).unwrap();

        let manifest = ManifestHost::read_manifest(host.manifest_path()).unwrap();
        let names: Vec<_> = manifest.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b.tiff", "a.tiff"]);
    }

    #[test]
    fn sharing_twice_keeps_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let host = ManifestHost::new(dir.path());
        host.share("a.png").unwrap();
        host.share("a.png").unwrap();
        assert_eq!(host.assets().len(), 1);
    }

    #[test]
    fn unshared_name_cannot_be_synchronized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"a").unwrap();
        let host = ManifestHost::new(dir.path());

        let err = host.synchronize(&["a.png".into()]).unwrap_err();
        assert!(matches!(err, PrintprepError::Host(_)));
        assert!(!host.manifest_path().exists());
    }

    #[test]
    fn missing_file_cannot_be_synchronized() {
        let dir = tempfile::tempdir().unwrap();
        let host = ManifestHost::new(dir.path());
        host.share("ghost.png").unwrap();

        let err = host.synchronize(&["ghost.png".into()]).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
