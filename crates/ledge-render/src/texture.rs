//! Texture table: names to handles and pixel dimensions.
//!
//! Only dimensions are kept here. Pixel data belongs to whatever backend
//! consumes the sprite batch.

use std::path::Path;

use ahash::AHashMap;
use ledge_common::ResourceLoadError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Opaque reference to a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// Creates a handle from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Size and name of a texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInfo {
    /// Name it was registered under
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Registry of every texture the game knows.
#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    textures: Vec<TextureInfo>,
    by_name: AHashMap<String, TextureHandle>,
}

impl TextureTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the image header at `path` and registers it under `name`.
    ///
    /// Loading a name twice returns the first handle without touching disk.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        name: &str,
        path: P,
    ) -> Result<TextureHandle, ResourceLoadError> {
        if let Some(handle) = self.handle(name) {
            return Ok(handle);
        }

        let path = path.as_ref();
        if !path.exists() {
            return Err(ResourceLoadError::NotFound(path.display().to_string()));
        }

        let (width, height) =
            image::image_dimensions(path).map_err(|e| ResourceLoadError::Decode {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        info!("Loaded texture '{}' ({}x{}) from {}", name, width, height, path.display());
        Ok(self.insert(name, width, height))
    }

    /// Registers a texture of known size without reading a file.
    pub fn insert(&mut self, name: &str, width: u32, height: u32) -> TextureHandle {
        if let Some(handle) = self.handle(name) {
            return handle;
        }

        let handle = TextureHandle::new(self.textures.len() as u32);
        self.textures.push(TextureInfo {
            name: name.to_string(),
            width,
            height,
        });
        self.by_name.insert(name.to_string(), handle);
        debug!("Registered texture '{}' as {:?}", name, handle);
        handle
    }

    /// Handle for a registered name.
    #[must_use]
    pub fn handle(&self, name: &str) -> Option<TextureHandle> {
        self.by_name.get(name).copied()
    }

    /// Dimensions for a handle.
    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(handle.index() as usize)
    }

    /// Number of registered textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no texture is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = TextureTable::new();
        let idle = table.insert("idle", 1200, 80);
        let tiles = table.insert("tiles", 101, 67);

        assert_ne!(idle, tiles);
        assert_eq!(table.handle("tiles"), Some(tiles));
        assert_eq!(table.get(idle).map(|t| t.width), Some(1200));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_insert_same_name_keeps_first() {
        let mut table = TextureTable::new();
        let first = table.insert("run", 1200, 80);
        let second = table.insert("run", 10, 10);

        assert_eq!(first, second);
        assert_eq!(table.get(first).map(|t| t.height), Some(80));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let mut table = TextureTable::new();
        let result = table.load("missing", "/definitely/not/here.png");
        assert!(matches!(result, Err(ResourceLoadError::NotFound(_))));
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_reads_dimensions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sheet.png");
        image::RgbaImage::new(360, 80)
            .save(&path)
            .expect("write png");

        let mut table = TextureTable::new();
        let handle = table.load("jump", &path).expect("load png");
        let info = table.get(handle).expect("registered");
        assert_eq!((info.width, info.height), (360, 80));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").expect("write file");

        let mut table = TextureTable::new();
        let result = table.load("broken", &path);
        assert!(matches!(result, Err(ResourceLoadError::Decode { .. })));
    }
}
