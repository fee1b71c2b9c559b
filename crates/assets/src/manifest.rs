use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::AssetError;

/// One layer sheet to load at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Name sprites use to find the cache.
    pub name: String,
    /// Path to the layer sheet image, relative to the manifest file.
    pub sheet: PathBuf,
    /// Number of layers stacked in the sheet.
    pub layers: u32,
}

/// JSON list of the layer sheets an application loads before its first frame.
///
/// Decoding the sheet files is left to the caller; the manifest only says
/// what to load and how many layers each sheet has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub assets: Vec<ManifestEntry>,
}

impl AssetManifest {
    /// Load a manifest from a JSON file and check its layer counts.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let manifest: Self = serde_json::from_reader(file)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Save the manifest as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reject entries that could never build a cache.
    pub fn validate(&self) -> Result<(), AssetError> {
        match self.assets.iter().find(|e| e.layers == 0) {
            Some(entry) => Err(AssetError::InvalidLayerCount(entry.layers)),
            None => Ok(()),
        }
    }

    /// Sheet paths resolved against the directory the manifest lives in.
    pub fn resolved(&self, manifest_path: impl AsRef<Path>) -> Vec<(&ManifestEntry, PathBuf)> {
        let base = manifest_path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.assets
            .iter()
            .map(|entry| (entry, base.join(&entry.sheet)))
            .collect()
    }
}
