pub mod batch;
pub mod cancel;
pub mod decode;
pub mod encoder;
pub mod files;
pub mod raw_pixels;
pub mod search;
pub mod toolchain;

pub use batch::BatchDriver;
pub use cancel::CancelToken;
pub use decode::{decode_jpeg, probe_dimensions};
pub use encoder::{CjpegEncoder, EncodeFlags, Encoder};
pub use files::{destination_for, ensure_output_dir, list_images, place_result, resolve_output_dir};
pub use raw_pixels::RawPixelFile;
pub use search::{search, Accepted};
pub use toolchain::{platform_key, Toolchain, ToolchainLocator};
