pub mod config;
pub mod options;
pub mod outcome;

pub use config::{CompressConfig, FileConfig, OverlayConfig, CONFIG_ENV};
pub use options::{BatchMode, BatchOptions, CompressSettings, OverlaySettings, SearchParams};
pub use outcome::{BatchSummary, FileReport, FileStatus, SearchOutcome, SearchStatus};
