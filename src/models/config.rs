use raster_kit::ResizeBounds;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::options::{
    CompressSettings, OverlaySettings, SearchParams, DEFAULT_INITIAL_QUALITY, DEFAULT_MAX_HEIGHT,
    DEFAULT_MAX_WIDTH, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_QUALITY, DEFAULT_MIN_WIDTH,
    DEFAULT_OVERLAY_ALPHA, DEFAULT_OVERLAY_QUALITY, DEFAULT_QUALITY_STEP, DEFAULT_TARGET_KB,
};
use crate::error::ConfigError;

/// Environment variable naming a YAML defaults file.
pub const CONFIG_ENV: &str = "JPEGFIT_CONFIG";

/// Defaults file loaded from `--config` or `JPEGFIT_CONFIG`.
///
/// ```yaml
/// compress:
///   target_kb: 250
///   min_quality: 60
/// overlay:
///   alpha: 0.3
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub compress: CompressConfig,
    pub overlay: OverlayConfig,
}

/// `compress` values; unset keys fall through to the next layer.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressConfig {
    pub target_kb: Option<u64>,
    pub initial_quality: Option<u32>,
    pub min_quality: Option<u32>,
    pub quality_step: Option<u32>,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

/// `overlay` values; unset keys fall through to the next layer.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub quality: Option<u32>,
    pub alpha: Option<f64>,
}

impl FileConfig {
    /// Load and parse a YAML defaults file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML text. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file named by `JPEGFIT_CONFIG`, or built-in defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(&PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    /// An explicit `--config` path wins over the environment.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::from_env(),
        }
    }
}

impl CompressConfig {
    /// Fill unset keys from `fallback`.
    pub fn or(&self, fallback: &CompressConfig) -> CompressConfig {
        CompressConfig {
            target_kb: self.target_kb.or(fallback.target_kb),
            initial_quality: self.initial_quality.or(fallback.initial_quality),
            min_quality: self.min_quality.or(fallback.min_quality),
            quality_step: self.quality_step.or(fallback.quality_step),
            min_width: self.min_width.or(fallback.min_width),
            min_height: self.min_height.or(fallback.min_height),
            max_width: self.max_width.or(fallback.max_width),
            max_height: self.max_height.or(fallback.max_height),
        }
    }

    /// Apply built-in defaults to unset keys and validate.
    pub fn to_settings(&self) -> Result<CompressSettings, ConfigError> {
        let target_kb = self.target_kb.unwrap_or(DEFAULT_TARGET_KB);
        let initial = quality(
            "initial quality",
            self.initial_quality.unwrap_or(DEFAULT_INITIAL_QUALITY),
        )?;
        let floor = quality(
            "min quality",
            self.min_quality.unwrap_or(DEFAULT_MIN_QUALITY),
        )?;
        // Steps beyond 255 behave like 255: the quality range is at most 99 wide.
        let step = u8::try_from(self.quality_step.unwrap_or(DEFAULT_QUALITY_STEP)).unwrap_or(u8::MAX);

        let search = SearchParams::new(target_kb.saturating_mul(1024), initial, floor, step)?;
        let bounds = ResizeBounds::new(
            self.min_width.unwrap_or(DEFAULT_MIN_WIDTH),
            self.min_height.unwrap_or(DEFAULT_MIN_HEIGHT),
            self.max_width.unwrap_or(DEFAULT_MAX_WIDTH),
            self.max_height.unwrap_or(DEFAULT_MAX_HEIGHT),
        );
        Ok(CompressSettings { search, bounds })
    }
}

impl OverlayConfig {
    /// Fill unset keys from `fallback`.
    pub fn or(&self, fallback: &OverlayConfig) -> OverlayConfig {
        OverlayConfig {
            quality: self.quality.or(fallback.quality),
            alpha: self.alpha.or(fallback.alpha),
        }
    }

    /// Apply built-in defaults to unset keys and validate.
    pub fn to_settings(&self) -> Result<OverlaySettings, ConfigError> {
        let q = quality("quality", self.quality.unwrap_or(DEFAULT_OVERLAY_QUALITY))?;
        OverlaySettings::new(q, self.alpha.unwrap_or(DEFAULT_OVERLAY_ALPHA))
    }
}

fn quality(name: &'static str, value: u32) -> Result<u8, ConfigError> {
    match u8::try_from(value) {
        Ok(q) if (1..=100).contains(&q) => Ok(q),
        _ => Err(ConfigError::QualityOutOfRange { name, value }),
    }
}
