use raster_kit::ResizeBounds;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Built-in defaults, used when neither a flag nor the config file sets a value.
pub const DEFAULT_TARGET_KB: u64 = 300;
pub const DEFAULT_INITIAL_QUALITY: u32 = 85;
pub const DEFAULT_MIN_QUALITY: u32 = 55;
pub const DEFAULT_QUALITY_STEP: u32 = 5;
pub const DEFAULT_MIN_WIDTH: u32 = 1290;
pub const DEFAULT_MIN_HEIGHT: u32 = 800;
pub const DEFAULT_MAX_WIDTH: u32 = 2380;
pub const DEFAULT_MAX_HEIGHT: u32 = 1600;
pub const DEFAULT_OVERLAY_QUALITY: u32 = 95;
pub const DEFAULT_OVERLAY_ALPHA: f64 = 0.2;

/// Parameters of the descending quality sweep.
///
/// Invariants (checked by [`SearchParams::new`]): budget > 0,
/// `1 <= floor_quality <= initial_quality <= 100`, step > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    budget_bytes: u64,
    initial_quality: u8,
    floor_quality: u8,
    step: u8,
}

impl SearchParams {
    pub fn new(
        budget_bytes: u64,
        initial_quality: u8,
        floor_quality: u8,
        step: u8,
    ) -> Result<Self, ConfigError> {
        if budget_bytes == 0 {
            return Err(ConfigError::TargetSize);
        }
        if initial_quality == 0 || initial_quality > 100 {
            return Err(ConfigError::QualityOutOfRange {
                name: "initial quality",
                value: initial_quality as u32,
            });
        }
        if floor_quality == 0 || floor_quality > initial_quality {
            return Err(ConfigError::QualityOrder {
                min: floor_quality as u32,
                initial: initial_quality as u32,
            });
        }
        if step == 0 {
            return Err(ConfigError::QualityStep);
        }
        Ok(Self {
            budget_bytes,
            initial_quality,
            floor_quality,
            step,
        })
    }

    pub fn budget_bytes(&self) -> u64 {
        self.budget_bytes
    }

    pub fn initial_quality(&self) -> u8 {
        self.initial_quality
    }

    pub fn floor_quality(&self) -> u8 {
        self.floor_quality
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Qualities the sweep visits, highest first.
    pub fn qualities(&self) -> impl Iterator<Item = u8> {
        (self.floor_quality..=self.initial_quality)
            .rev()
            .step_by(self.step as usize)
    }

    /// Encode attempts in the worst case (budget never met).
    pub fn max_attempts(&self) -> usize {
        ((self.initial_quality - self.floor_quality) / self.step) as usize + 1
    }
}

/// Settings for `compress` mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressSettings {
    pub search: SearchParams,
    pub bounds: ResizeBounds,
}

/// Settings for `overlay` mode: one encode at a fixed quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySettings {
    quality: u8,
    alpha: f64,
}

impl OverlaySettings {
    pub fn new(quality: u8, alpha: f64) -> Result<Self, ConfigError> {
        if quality == 0 || quality > 100 {
            return Err(ConfigError::QualityOutOfRange {
                name: "quality",
                value: quality as u32,
            });
        }
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::Alpha(alpha));
        }
        Ok(Self { quality, alpha })
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchMode {
    Compress(CompressSettings),
    Overlay(OverlaySettings),
}

impl BatchMode {
    pub fn name(&self) -> &'static str {
        match self {
            BatchMode::Compress(_) => "compress",
            BatchMode::Overlay(_) => "overlay",
        }
    }
}

/// Everything a batch run needs, resolved once before the first file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub recursive: bool,
    pub overwrite: bool,
    pub dry_run: bool,
    pub mode: BatchMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_valid() {
        let params = SearchParams::new(307_200, 85, 55, 5).unwrap();
        assert_eq!(params.budget_bytes(), 307_200);
        assert_eq!(params.max_attempts(), 7);
        assert_eq!(
            params.qualities().collect::<Vec<_>>(),
            vec![85, 80, 75, 70, 65, 60, 55]
        );
    }

    #[test]
    fn test_search_params_uneven_step_stays_above_floor() {
        let params = SearchParams::new(1, 90, 50, 15).unwrap();
        assert_eq!(params.qualities().collect::<Vec<_>>(), vec![90, 75, 60]);
        assert_eq!(params.max_attempts(), 3);
    }

    #[test]
    fn test_search_params_floor_equals_initial() {
        let params = SearchParams::new(1, 60, 60, 5).unwrap();
        assert_eq!(params.qualities().collect::<Vec<_>>(), vec![60]);
    }

    #[test]
    fn test_search_params_rejects_zero_budget() {
        assert!(matches!(
            SearchParams::new(0, 85, 55, 5),
            Err(ConfigError::TargetSize)
        ));
    }

    #[test]
    fn test_search_params_rejects_floor_above_initial() {
        assert!(matches!(
            SearchParams::new(100, 50, 60, 5),
            Err(ConfigError::QualityOrder {
                min: 60,
                initial: 50
            })
        ));
    }

    #[test]
    fn test_search_params_rejects_zero_step() {
        assert!(matches!(
            SearchParams::new(100, 85, 55, 0),
            Err(ConfigError::QualityStep)
        ));
    }

    #[test]
    fn test_search_params_rejects_quality_above_100() {
        assert!(matches!(
            SearchParams::new(100, 101, 55, 5),
            Err(ConfigError::QualityOutOfRange { value: 101, .. })
        ));
    }

    #[test]
    fn test_overlay_settings_validation() {
        assert!(OverlaySettings::new(95, 0.2).is_ok());
        assert!(OverlaySettings::new(95, 0.0).is_ok());
        assert!(OverlaySettings::new(95, 1.0).is_ok());
        assert!(matches!(
            OverlaySettings::new(95, 1.5),
            Err(ConfigError::Alpha(_))
        ));
        assert!(matches!(
            OverlaySettings::new(95, f64::NAN),
            Err(ConfigError::Alpha(_))
        ));
        assert!(matches!(
            OverlaySettings::new(0, 0.2),
            Err(ConfigError::QualityOutOfRange { .. })
        ));
    }
}
