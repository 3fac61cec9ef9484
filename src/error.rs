use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid flag or config-file combination. Raised before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target size must be positive")]
    TargetSize,

    #[error("{name} must be between 1 and 100, got {value}")]
    QualityOutOfRange { name: &'static str, value: u32 },

    #[error("min quality {min} must be between 1 and initial quality {initial}")]
    QualityOrder { min: u32, initial: u32 },

    #[error("quality step must be positive")]
    QualityStep,

    #[error("alpha must be between 0 and 1, got {0}")]
    Alpha(f64),

    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// The batch cannot start: unusable input/output directory or missing encoder.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("input {} is not a directory", .0.display())]
    InputNotDirectory(PathBuf),

    #[error("failed to read input directory {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output path {} exists and is not a directory", .0.display())]
    OutputNotDirectory(PathBuf),

    #[error("output directory {} already exists and is not empty (use --overwrite)", .0.display())]
    OutputNotEmpty(PathBuf),

    #[error("failed to prepare output directory {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to determine working directory: {0}")]
    WorkingDir(#[source] io::Error),

    #[error("cjpeg not available: {0}")]
    ToolchainUnavailable(String),

    #[error("cancelled before the encoder was prepared")]
    Cancelled,
}

/// The external encoder failed for one attempt.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to start {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cjpeg exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("encoder produced no output at quality {quality}")]
    EmptyOutput { quality: u8 },

    #[error("no quality between {initial} and {floor} was attempted")]
    NoAttempts { initial: u8, floor: u8 },

    #[error("encode cancelled")]
    Cancelled,

    #[error("encoder I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure confined to one input file. Logged by the batch driver, never fatal.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unusable image: {0}")]
    Raster(#[from] raster_kit::RasterError),

    #[error("failed to stage raw pixels: {0}")]
    RawPixels(#[source] io::Error),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to inspect {}: {source}", .path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Place {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors that abort a whole batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Setup(#[from] SetupError),
}
