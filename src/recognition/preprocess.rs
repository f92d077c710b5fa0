//! Photo preprocessing for recognition
//!
//! Optional enhancement of the captured label photo before it reaches the
//! recognizer. Label photos taken at an angle or in poor light benefit from a
//! contrast boost and upscaling; both are off by default.

use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::CapturedPhoto;

/// Photo enhancement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoPreprocessing {
    /// Whether preprocessing runs at all
    pub enabled: bool,
    /// Convert to grayscale before recognition
    pub grayscale: bool,
    /// Contrast factor; 1.0 leaves the photo unchanged
    pub contrast: f32,
    /// Integer upscale factor; 1 leaves dimensions unchanged
    pub scale: u32,
}

impl Default for PhotoPreprocessing {
    fn default() -> Self {
        Self {
            enabled: false,
            grayscale: false,
            contrast: 1.0,
            scale: 1,
        }
    }
}

/// Apply the configured enhancement passes, returning a new photo
pub fn apply_preprocessing(photo: &CapturedPhoto, settings: &PhotoPreprocessing) -> CapturedPhoto {
    if !settings.enabled {
        return photo.clone();
    }

    debug!(
        "Preprocessing photo: grayscale={}, contrast={}, scale={}",
        settings.grayscale, settings.contrast, settings.scale
    );

    let mut data = photo.data.clone();
    let mut width = photo.width;
    let mut height = photo.height;

    if settings.scale > 1 {
        if let Some(buffer) = RgbaImage::from_raw(width, height, data) {
            let scaled = imageops::resize(
                &buffer,
                width * settings.scale,
                height * settings.scale,
                imageops::FilterType::Triangle,
            );
            width = scaled.width();
            height = scaled.height();
            data = scaled.into_raw();
        } else {
            // Malformed buffer; recognize the photo as-is
            data = photo.data.clone();
        }
    }

    if (settings.contrast - 1.0).abs() > 0.01 {
        apply_contrast(&mut data, settings.contrast);
    }

    if settings.grayscale {
        apply_grayscale(&mut data);
    }

    CapturedPhoto::new(data, width, height)
}

/// Contrast around the midpoint; factor > 1.0 increases contrast
fn apply_contrast(data: &mut [u8], factor: f32) {
    for pixel in data.chunks_exact_mut(4) {
        for channel in pixel.iter_mut().take(3) {
            let value = *channel as f32;
            *channel = ((value - 128.0) * factor + 128.0).clamp(0.0, 255.0) as u8;
        }
    }
}

/// Luminance-weighted grayscale, keeping the RGBA layout
fn apply_grayscale(data: &mut [u8]) {
    for pixel in data.chunks_exact_mut(4) {
        let gray =
            (0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32) as u8;
        pixel[0] = gray;
        pixel[1] = gray;
        pixel[2] = gray;
    }
}
