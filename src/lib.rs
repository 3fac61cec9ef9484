//! jpegfit - fit JPEG batches under a byte budget
//!
//! Recompresses every JPEG in a directory tree so it fits a target size
//! while respecting min/max pixel bounds, or darkens each image with a
//! translucent black overlay. Pixel work lives in `raster-kit`; this crate
//! holds configuration, the external encoder bridge and the batch driver.

pub mod error;
pub mod models;
pub mod services;
