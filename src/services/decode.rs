use image::{ImageReader, ImageResult};
use raster_kit::Raster;
use std::path::Path;

use crate::error::FileError;

/// Decode a JPEG into an RGBA raster.
///
/// The format is sniffed from the file contents, so a mislabelled file
/// still decodes when it is a JPEG.
pub fn decode_jpeg(path: &Path) -> Result<Raster, FileError> {
    let rgba = read_image(path)?.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Raster::from_rgba(width, height, rgba.into_raw())?)
}

fn read_image(path: &Path) -> ImageResult<image::DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Pixel dimensions from the header only, for dry runs.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), FileError> {
    Ok(image::image_dimensions(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_decode_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.jpg");
        RgbImage::from_pixel(12, 7, Rgb([128, 128, 128]))
            .save(&path)
            .unwrap();

        let raster = decode_jpeg(&path).unwrap();
        assert_eq!(raster.dimensions(), (12, 7));
        // JPEG is lossy but a flat gray survives closely; alpha is opaque.
        let px = raster.pixel(5, 3);
        assert!((px[0] as i32 - 128).abs() <= 2);
        assert_eq!(px[3], 255);

        assert_eq!(probe_dimensions(&path).unwrap(), (12, 7));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not a jpeg at all").unwrap();
        assert!(matches!(decode_jpeg(&path), Err(FileError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            decode_jpeg(&dir.path().join("gone.jpg")),
            Err(FileError::Decode(_))
        ));
    }
}
