//! Pixel-dimension bounds and the uniform scale factor derived from them.

/// Scale factors closer to 1.0 than this are treated as "no resize".
pub const SCALE_EPSILON: f64 = 1e-3;

/// Minimum and maximum pixel dimensions for a processed image.
///
/// A value of 0 leaves that side unbounded. No ordering between the
/// minimum and maximum of an axis is enforced; conflicting bounds are
/// resolved by [`compute_scale`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeBounds {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl ResizeBounds {
    pub fn new(min_width: u32, min_height: u32, max_width: u32, max_height: u32) -> Self {
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }

    /// Bounds that never request a resize.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only maximum bounds (shrink-to-fit).
    pub fn max(max_width: u32, max_height: u32) -> Self {
        Self::new(0, 0, max_width, max_height)
    }

    /// Only minimum bounds (enlarge-to-fit).
    pub fn min(min_width: u32, min_height: u32) -> Self {
        Self::new(min_width, min_height, 0, 0)
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute the single uniform scale factor for an image of `width` x `height`.
///
/// The factor is chosen from the interval `[lower, upper]` where `lower` is
/// the largest ratio demanded by a minimum bound and `upper` the smallest
/// ratio allowed by a maximum bound:
///
/// - 1.0 when the interval contains 1.0 (never resize without need)
/// - when the interval is empty, `upper` if it shrinks, else `lower`
/// - otherwise `lower` when enlarging is required, `upper` when shrinking is
///
/// Zero dimensions yield 1.0.
///
/// # Example
///
/// ```
/// use raster_kit::{compute_scale, ResizeBounds};
///
/// let bounds = ResizeBounds::max(2000, 2000);
/// assert_eq!(compute_scale(4000, 1000, &bounds), 0.5);
/// assert_eq!(compute_scale(1000, 1000, &bounds), 1.0);
/// ```
pub fn compute_scale(width: u32, height: u32, bounds: &ResizeBounds) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    let (w, h) = (width as f64, height as f64);

    let mut lower = 0.0_f64;
    let mut upper = f64::INFINITY;

    if bounds.min_width > 0 {
        lower = lower.max(bounds.min_width as f64 / w);
    }
    if bounds.min_height > 0 {
        lower = lower.max(bounds.min_height as f64 / h);
    }
    if bounds.max_width > 0 {
        upper = upper.min(bounds.max_width as f64 / w);
    }
    if bounds.max_height > 0 {
        upper = upper.min(bounds.max_height as f64 / h);
    }

    if lower <= 1.0 && 1.0 <= upper {
        return 1.0;
    }
    if lower > upper {
        // Shrink-to-fit wins over enlarging when the bounds conflict.
        return if upper < 1.0 { upper } else { lower };
    }
    if lower > 1.0 {
        return lower;
    }
    if upper < 1.0 {
        return upper;
    }
    1.0
}

/// Apply `scale` to `(width, height)`, rounding to the nearest pixel.
///
/// Scales within [`SCALE_EPSILON`] of 1.0 return the input unchanged.
/// Each side is at least 1 pixel.
pub fn target_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    if (scale - 1.0).abs() <= SCALE_EPSILON {
        return (width, height);
    }
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Original and processed dimensions of one image, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionPair {
    pub original: (u32, u32),
    pub processed: (u32, u32),
}

impl DimensionPair {
    pub fn new(original: (u32, u32), processed: (u32, u32)) -> Self {
        Self {
            original,
            processed,
        }
    }

    /// Compute the processed dimensions for `original` under `bounds`.
    pub fn plan(original: (u32, u32), bounds: &ResizeBounds) -> Self {
        let scale = compute_scale(original.0, original.1, bounds);
        Self::new(original, target_dimensions(original.0, original.1, scale))
    }

    pub fn is_resized(&self) -> bool {
        self.original != self.processed
    }

    /// Human-readable note such as `4000x3000->2133x1600`.
    ///
    /// When the processed size still violates a bound (conflicting bounds),
    /// the violated bounds are listed in parentheses.
    pub fn note(&self, bounds: &ResizeBounds) -> String {
        let (ow, oh) = self.original;
        let mut note = format!("{}x{}", ow, oh);
        if !self.is_resized() {
            return note;
        }

        let (pw, ph) = self.processed;
        note.push_str(&format!("->{}x{}", pw, ph));

        let mut warnings = Vec::new();
        if bounds.min_width > 0 && pw < bounds.min_width {
            warnings.push("below min width");
        }
        if bounds.min_height > 0 && ph < bounds.min_height {
            warnings.push("below min height");
        }
        if bounds.max_width > 0 && pw > bounds.max_width {
            warnings.push("above max width");
        }
        if bounds.max_height > 0 && ph > bounds.max_height {
            warnings.push("above max height");
        }
        if !warnings.is_empty() {
            note.push_str(&format!(" ({})", warnings.join(", ")));
        }
        note
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_are_noop() {
        let bounds = ResizeBounds::max(100, 100);
        assert_eq!(compute_scale(0, 500, &bounds), 1.0);
        assert_eq!(compute_scale(500, 0, &bounds), 1.0);
    }

    #[test]
    fn test_unbounded_is_identity() {
        assert_eq!(compute_scale(4000, 3000, &ResizeBounds::none()), 1.0);
        assert!(ResizeBounds::none().is_unbounded());
    }

    #[test]
    fn test_inside_bounds_keeps_size() {
        let bounds = ResizeBounds::new(1290, 800, 2380, 1600);
        assert_eq!(compute_scale(2000, 1200, &bounds), 1.0);
    }

    #[test]
    fn test_shrink_uses_tightest_max() {
        let bounds = ResizeBounds::new(1290, 800, 2380, 1600);
        let scale = compute_scale(4000, 3000, &bounds);
        assert!((scale - 1600.0 / 3000.0).abs() < 1e-12);
        assert_eq!(target_dimensions(4000, 3000, scale), (2133, 1600));
    }

    #[test]
    fn test_enlarge_uses_largest_min() {
        let bounds = ResizeBounds::min(1000, 1000);
        let scale = compute_scale(500, 250, &bounds);
        assert_eq!(scale, 4.0);
    }

    #[test]
    fn test_conflict_prefers_shrink_when_max_shrinks() {
        // Very wide image: min height wants x4, max width wants x0.5.
        let bounds = ResizeBounds::new(0, 1000, 2000, 0);
        let scale = compute_scale(4000, 250, &bounds);
        assert_eq!(scale, 0.5);
    }

    #[test]
    fn test_conflict_prefers_min_when_max_does_not_shrink() {
        // lower = 3.0, upper = 2.0: both enlarge, the minimum wins.
        let bounds = ResizeBounds::new(3000, 0, 2000, 0);
        let scale = compute_scale(1000, 1000, &bounds);
        assert_eq!(scale, 3.0);
    }

    #[test]
    fn test_target_dimensions_epsilon() {
        assert_eq!(target_dimensions(1000, 800, 1.0005), (1000, 800));
        assert_eq!(target_dimensions(1000, 800, 0.998), (998, 798));
    }

    #[test]
    fn test_target_dimensions_minimum_one_pixel() {
        assert_eq!(target_dimensions(1000, 3, 0.01), (10, 1));
    }

    #[test]
    fn test_note_unchanged() {
        let pair = DimensionPair::new((800, 600), (800, 600));
        assert_eq!(pair.note(&ResizeBounds::none()), "800x600");
    }

    #[test]
    fn test_note_resized_with_warnings() {
        let bounds = ResizeBounds::new(0, 1000, 2000, 0);
        let pair = DimensionPair::plan((4000, 250), &bounds);
        assert_eq!(pair.processed, (2000, 125));
        assert_eq!(pair.note(&bounds), "4000x250->2000x125 (below min height)");
    }
}
