//! raster-kit: deterministic raster operations for JPEG batch processing
//!
//! This crate holds the pure, allocation-explicit half of the pipeline that
//! sits between a JPEG decoder and an external JPEG encoder:
//!
//! ```text
//! decoded RGBA            (from the JPEG decoder)
//!     |
//!     v
//! compute_scale           (one uniform factor from min/max bounds)
//!     |
//!     v
//! resize_bilinear         (half-pixel centers, edge clamp, truncation)
//!     |
//!     v
//! [apply_black_overlay]   (overlay mode only)
//!     |
//!     v
//! write_ppm               (P6 header + RGB payload, alpha dropped)
//! ```
//!
//! Nothing here performs file-system or process I/O; writers take any
//! [`std::io::Write`].
//!
//! # Quick Start
//!
//! ```
//! use raster_kit::{DimensionPair, Raster, ResizeBounds, resize_bilinear, write_ppm};
//!
//! let src = Raster::filled(4000, 30, [128, 64, 32, 255]).unwrap();
//! let bounds = ResizeBounds::max(2000, 0);
//!
//! let plan = DimensionPair::plan(src.dimensions(), &bounds);
//! assert_eq!(plan.processed, (2000, 15));
//!
//! let resized = resize_bilinear(&src, plan.processed.0, plan.processed.1).unwrap();
//! let mut ppm = Vec::new();
//! write_ppm(&resized, &mut ppm).unwrap();
//! assert!(ppm.starts_with(b"P6\n2000 15\n255\n"));
//! ```
//!
//! # Determinism
//!
//! A size-targeting search re-encodes the same raster at several qualities
//! and relies on file size falling as quality falls. Resampling therefore
//! uses fixed arithmetic (f64, truncation toward zero after each linear
//! step) so identical inputs always produce identical bytes.

pub mod output;
pub mod preprocess;
pub mod raster;


pub use output::{write_ppm, PPM_MAXVAL};
pub use preprocess::{
    apply_black_overlay, compute_scale, resize_bilinear, target_dimensions, DimensionPair,
    ResizeBounds, SCALE_EPSILON,
};
pub use raster::{Raster, RasterError, CHANNELS};
