//! Test fixtures and constants.

use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;

use jpegfit::models::{BatchMode, CompressSettings, OverlaySettings, SearchParams};
use raster_kit::ResizeBounds;

/// Search parameters matching the built-in defaults (300 KB, 85..55 step 5).
pub fn default_search() -> SearchParams {
    SearchParams::new(300 * 1024, 85, 55, 5).unwrap()
}

pub fn compress_mode(budget_bytes: u64, bounds: ResizeBounds) -> BatchMode {
    BatchMode::Compress(CompressSettings {
        search: SearchParams::new(budget_bytes, 85, 55, 5).unwrap(),
        bounds,
    })
}

pub fn overlay_mode(quality: u8, alpha: f64) -> BatchMode {
    BatchMode::Overlay(OverlaySettings::new(quality, alpha).unwrap())
}

/// Write a `width` x `height` gradient JPEG, creating parent directories.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    });
    img.save(path).unwrap();
}

/// Write a file with a JPEG extension that is not a JPEG.
pub fn write_garbage(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"definitely not a jpeg").unwrap();
}
