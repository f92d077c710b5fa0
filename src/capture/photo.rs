//! Captured label photo

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

/// A still photo of a nutrition-facts label, as handed over by the camera
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Photo width in pixels
    pub width: u32,
    /// Photo height in pixels
    pub height: u32,
    /// When the photo was taken
    pub timestamp: Instant,
}

impl CapturedPhoto {
    /// Create a photo from raw RGBA data
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// A single-pixel placeholder photo, used when a scan is driven purely
    /// from recorded recognizer output
    pub fn placeholder() -> Self {
        Self::new(vec![0, 0, 0, 255], 1, 1)
    }

    /// Load a photo from an image file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("Failed to load label photo from {}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self::new(image.into_raw(), width, height))
    }

    /// Photo dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
