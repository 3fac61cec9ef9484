//! Serialization of rasters into formats external encoders read.

mod ppm;

pub use ppm::{ppm_header, write_ppm, PPM_MAXVAL};
