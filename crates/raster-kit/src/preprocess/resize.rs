//! Bilinear resampling with half-pixel centers and edge clamping.
//!
//! Output channels are truncated, not rounded, after each interpolation
//! step: first along x within the two source rows, then along y between
//! those intermediate values. Encoders downstream see byte-identical input
//! for identical requests, which keeps size-targeting runs reproducible.

use std::borrow::Cow;

use crate::raster::{buffer_len, try_buffer, Raster, RasterError, CHANNELS};

/// Source sample position for one destination coordinate.
#[derive(Debug, Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f64,
}

/// Map each destination index on one axis to its two clamped source indices.
fn fill_taps(src_len: u32, dst_len: u32, taps: &mut Vec<Tap>) {
    let ratio = src_len as f64 / dst_len as f64;
    let last = src_len as i64 - 1;
    taps.extend((0..dst_len).map(|d| {
        let pos = (d as f64 + 0.5) * ratio - 0.5;
        let floor = pos.floor();
        let base = floor as i64;
        Tap {
            lo: base.clamp(0, last) as usize,
            hi: (base + 1).clamp(0, last) as usize,
            frac: pos - floor,
        }
    }));
}

#[inline]
fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t) as u8
}

/// Resize `src` to `width` x `height` using bilinear interpolation.
///
/// Returns the source borrowed when the dimensions already match; otherwise
/// a freshly allocated raster. The source is never modified.
///
/// Resizing down and back up is lossy; do not expect a round trip to
/// reproduce the original pixels.
///
/// # Errors
///
/// [`RasterError::ZeroDimension`] if either target side is zero, and
/// [`RasterError::TooLarge`] if the target buffer overflows or cannot be
/// allocated. Both leave `src` untouched.
///
/// # Example
///
/// ```
/// use raster_kit::{resize_bilinear, Raster};
///
/// let src = Raster::filled(8, 8, [200, 100, 50, 255]).unwrap();
/// let out = resize_bilinear(&src, 3, 5).unwrap();
/// assert_eq!(out.dimensions(), (3, 5));
/// assert_eq!(out.pixel(1, 4), [200, 100, 50, 255]);
/// ```
pub fn resize_bilinear(
    src: &Raster,
    width: u32,
    height: u32,
) -> Result<Cow<'_, Raster>, RasterError> {
    let len = buffer_len(width, height)?;
    if src.dimensions() == (width, height) {
        return Ok(Cow::Borrowed(src));
    }

    // All buffers reserved up front; an oversized target returns TooLarge.
    let mut out = try_buffer(len, width, height)?;
    let mut x_taps = try_buffer(width as usize, width, height)?;
    let mut y_taps = try_buffer(height as usize, width, height)?;
    fill_taps(src.width(), width, &mut x_taps);
    fill_taps(src.height(), height, &mut y_taps);

    let src_stride = src.width() as usize * CHANNELS;
    let src_pixels = src.pixels();
    for ty in &y_taps {
        let row0 = &src_pixels[ty.lo * src_stride..(ty.lo + 1) * src_stride];
        let row1 = &src_pixels[ty.hi * src_stride..(ty.hi + 1) * src_stride];
        for tx in &x_taps {
            let (i0, i1) = (tx.lo * CHANNELS, tx.hi * CHANNELS);
            for c in 0..CHANNELS {
                let top = lerp(row0[i0 + c], row0[i1 + c], tx.frac);
                let bottom = lerp(row1[i0 + c], row1[i1 + c], tx.frac);
                out.push(lerp(top, bottom, ty.frac));
            }
        }
    }

    Ok(Cow::Owned(Raster::from_parts(width, height, out)))
}
