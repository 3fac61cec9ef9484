//! The in-memory RGBA raster shared by every stage of the pipeline.
//!
//! A [`Raster`] is a tightly packed, row-major grid of 8-bit RGBA pixels.
//! Each row is exactly `width * 4` bytes; there is no stride padding.

use std::fmt;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Error type for raster construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height was zero
    ZeroDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Pixel buffer length does not match `width * height * 4`
    BufferLength {
        /// Length implied by the dimensions
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },
    /// Pixel buffer size overflows or cannot be allocated
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::ZeroDimension { width, height } => {
                write!(f, "raster dimensions must be non-zero, got {}x{}", width, height)
            }
            RasterError::BufferLength { expected, actual } => {
                write!(
                    f,
                    "pixel buffer has {} bytes, expected {} for RGBA",
                    actual, expected
                )
            }
            RasterError::TooLarge { width, height } => {
                write!(f, "raster {}x{} is too large to allocate", width, height)
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// A decoded image as a grid of RGBA pixels.
///
/// # Example
///
/// ```
/// use raster_kit::Raster;
///
/// let raster = Raster::filled(3, 2, [10, 20, 30, 255]).unwrap();
/// assert_eq!(raster.dimensions(), (3, 2));
/// assert_eq!(raster.pixel(2, 1), [10, 20, 30, 255]);
/// assert_eq!(raster.pixels().len(), 3 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a fully transparent black raster.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let len = buffer_len(width, height)?;
        let mut pixels = try_buffer(len, width, height)?;
        pixels.resize(len, 0);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a raster where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, RasterError> {
        let len = buffer_len(width, height)?;
        let mut pixels = try_buffer(len, width, height)?;
        pixels.extend(rgba.iter().copied().cycle().take(len));
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an existing row-major RGBA buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from parts already known to be consistent.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "pixel buffer must match {}x{} RGBA",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the raster and return its RGBA buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// One row of RGBA bytes.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{} raster",
            x,
            y,
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

/// Byte length of a `width` x `height` RGBA buffer, checked for overflow.
pub(crate) fn buffer_len(width: u32, height: u32) -> Result<usize, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::ZeroDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(RasterError::TooLarge { width, height })
}

/// Empty vector with room for `len` elements, or `TooLarge` when the
/// allocator refuses.
pub(crate) fn try_buffer<T>(len: usize, width: u32, height: u32) -> Result<Vec<T>, RasterError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| RasterError::TooLarge { width, height })?;
    Ok(buf)
}
