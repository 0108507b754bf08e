//! Image registry: content-addressed handles for textures, character and
//! backdrop images.
//!
//! Scenes refer to images by name. The renderer only ever sees handles; a
//! name with no registered image degrades to a transparent fill.
//!
//! # Layout
//! The registry persists as a JSON manifest mapping names to handles.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use voxstage_common::{Fill, ImageHandle};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("path has no usable file name: {0}")]
    BadName(String),
}

/// A registered image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub handle: ImageHandle,
    pub byte_len: usize,
}

/// Name-to-handle registry. Identical bytes registered under different names
/// share one handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetStore {
    images: BTreeMap<String, ImageEntry>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register image bytes under `name` and return their content handle.
    pub fn register_image(&mut self, name: impl Into<String>, bytes: &[u8]) -> ImageHandle {
        let handle = content_hash(bytes);
        let name = name.into();
        tracing::debug!(%name, handle = handle.0, "image registered");
        self.images.insert(
            name,
            ImageEntry {
                handle,
                byte_len: bytes.len(),
            },
        );
        handle
    }

    /// Read a file and register it under its file name.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<ImageHandle, AssetError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AssetError::BadName(path.display().to_string()))?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(self.register_image(name, &bytes))
    }

    /// Register every regular file in `dir` (not recursive).
    pub fn import_dir(&mut self, dir: impl AsRef<Path>) -> Result<Vec<ImageHandle>, AssetError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();
        paths.iter().map(|p| self.import_file(p)).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<ImageHandle> {
        self.images.get(name).map(|e| e.handle)
    }

    pub fn entry(&self, name: &str) -> Option<&ImageEntry> {
        self.images.get(name)
    }

    /// Fill for an optional image name; unknown or absent names are
    /// transparent.
    pub fn fill_for(&self, name: Option<&str>) -> Fill {
        let Some(name) = name else {
            return Fill::Transparent;
        };
        match self.lookup(name) {
            Some(handle) => Fill::Image(handle),
            None => {
                tracing::debug!(name, "image not registered, using transparent fill");
                Fill::Transparent
            }
        }
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Save the registry manifest as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a registry manifest from JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(store)
    }
}

fn content_hash(bytes: &[u8]) -> ImageHandle {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    ImageHandle(u64::from_le_bytes(head))
}

pub fn crate_info() -> &'static str {
    "voxstage-assets v0.1.0"
}
