//! Geometry and tone operations applied between decode and encode.
//!
//! 1. [`compute_scale`] picks one uniform factor from min/max bounds
//! 2. [`target_dimensions`] rounds it to whole pixels
//! 3. [`resize_bilinear`] resamples to those pixels
//! 4. [`apply_black_overlay`] optionally darkens the result
//!
//! # Example
//!
//! ```
//! use raster_kit::{compute_scale, resize_bilinear, target_dimensions, Raster, ResizeBounds};
//!
//! let src = Raster::filled(400, 300, [90, 90, 90, 255]).unwrap();
//! let bounds = ResizeBounds::max(200, 200);
//!
//! let scale = compute_scale(src.width(), src.height(), &bounds);
//! let (w, h) = target_dimensions(src.width(), src.height(), scale);
//! let out = resize_bilinear(&src, w, h).unwrap();
//!
//! assert_eq!(out.dimensions(), (200, 150));
//! ```

mod bounds;
mod overlay;
mod resize;

pub use bounds::{compute_scale, target_dimensions, DimensionPair, ResizeBounds, SCALE_EPSILON};
pub use overlay::apply_black_overlay;
pub use resize::resize_bilinear;
