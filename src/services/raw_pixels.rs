use raster_kit::{write_ppm, Raster};
use std::io::{self, BufWriter};
use std::path::Path;
use tempfile::NamedTempFile;

/// A raster staged on disk as binary PPM for the external encoder.
///
/// The file is deleted when this value is dropped, whichever way the
/// caller exits.
#[derive(Debug)]
pub struct RawPixelFile {
    file: NamedTempFile,
    width: u32,
    height: u32,
    len: u64,
}

impl RawPixelFile {
    /// Stage `raster` in the system temp directory.
    pub fn write(raster: &Raster) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("jpegfit-")
            .suffix(".ppm")
            .tempfile()?;
        Self::fill(file, raster)
    }

    /// Stage `raster` inside `dir`.
    pub fn write_in(raster: &Raster, dir: &Path) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("jpegfit-")
            .suffix(".ppm")
            .tempfile_in(dir)?;
        Self::fill(file, raster)
    }

    fn fill(file: NamedTempFile, raster: &Raster) -> io::Result<Self> {
        let len = write_ppm(raster, BufWriter::new(file.as_file()))?;
        Ok(Self {
            file,
            width: raster.width(),
            height: raster.height(),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes written, header included.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
