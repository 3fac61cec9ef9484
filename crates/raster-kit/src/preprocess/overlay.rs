//! Uniform black overlay (alpha blend toward black).

use crate::raster::{Raster, CHANNELS};

/// Darken `raster` in place as if a black layer of opacity `alpha` sat on top.
///
/// Every R, G and B byte becomes `trunc(value * (1 - alpha))`; the alpha
/// channel is left alone. `alpha <= 0` does nothing and values above 1 are
/// clamped to 1 (pure black).
///
/// This is not idempotent: each call darkens again, so two passes at `a`
/// compound to roughly `1 - (1 - a)^2`, with an extra truncation per pass.
///
/// # Example
///
/// ```
/// use raster_kit::{apply_black_overlay, Raster};
///
/// let mut raster = Raster::filled(2, 2, [100, 50, 10, 255]).unwrap();
/// apply_black_overlay(&mut raster, 0.5);
/// assert_eq!(raster.pixel(0, 0), [50, 25, 5, 255]);
/// ```
pub fn apply_black_overlay(raster: &mut Raster, alpha: f64) {
    if alpha.is_nan() || alpha <= 0.0 {
        return;
    }
    let keep = 1.0 - alpha.min(1.0);
    for px in raster.pixels_mut().chunks_exact_mut(CHANNELS) {
        for channel in &mut px[..3] {
            *channel = (*channel as f64 * keep) as u8;
        }
    }
}
