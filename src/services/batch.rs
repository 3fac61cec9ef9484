//! Sequential batch driver.
//!
//! Per file: `Pending -> Skip | Preview | (decode -> resize/overlay -> encode
//! -> place) -> Done`, with any file-local failure reported and the run
//! continuing. Only enumeration, output-directory preparation and toolchain
//! resolution abort the whole batch.

use raster_kit::{apply_black_overlay, resize_bilinear, DimensionPair};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::cancel::CancelToken;
use super::decode::{decode_jpeg, probe_dimensions};
use super::encoder::{CjpegEncoder, EncodeFlags, Encoder};
use super::files::{destination_for, ensure_output_dir, list_images, place_result};
use super::raw_pixels::RawPixelFile;
use super::search::search;
use super::toolchain::Toolchain;
use crate::error::{BatchError, FileError, SetupError};
use crate::models::{
    BatchMode, BatchOptions, BatchSummary, CompressSettings, FileReport, FileStatus,
    OverlaySettings,
};

/// What to do with each file once it passes the skip check.
#[derive(Clone, Copy)]
enum Pass<'e> {
    Preview,
    Encode(&'e dyn Encoder),
}

pub struct BatchDriver {
    options: BatchOptions,
    cancel: CancelToken,
}

impl BatchDriver {
    pub fn new(options: BatchOptions, cancel: CancelToken) -> Self {
        Self { options, cancel }
    }

    /// Guard the output directory and enumerate inputs.
    ///
    /// Files already inside the output directory are left out so a
    /// recursive run over the working directory does not pick up its own
    /// results.
    pub fn prepare(&self) -> Result<Vec<PathBuf>, BatchError> {
        let opts = &self.options;
        ensure_output_dir(&opts.output, opts.overwrite, opts.dry_run)?;
        let files = list_images(&opts.input, opts.recursive)?;

        let Ok(output) = fs::canonicalize(&opts.output) else {
            return Ok(files);
        };
        Ok(files
            .into_iter()
            .filter(|file| {
                fs::canonicalize(file)
                    .map(|path| !path.starts_with(&output))
                    .unwrap_or(true)
            })
            .collect())
    }

    /// Run the batch with the `cjpeg` toolchain, resolved once up front.
    ///
    /// `on_report` sees each file's report as soon as it is final.
    pub fn run(&self, on_report: impl FnMut(&FileReport)) -> Result<BatchSummary, BatchError> {
        let start = Instant::now();
        let files = self.prepare()?;
        if files.is_empty() {
            return Ok(BatchSummary::default());
        }
        if self.options.dry_run {
            return Ok(self.process(&files, Pass::Preview, start, on_report));
        }

        let toolchain = Toolchain::ensure(&self.cancel)?;
        let encoder = CjpegEncoder::new(toolchain.cjpeg, self.cancel.clone());
        Ok(self.process(&files, Pass::Encode(&encoder), start, on_report))
    }

    /// Run the batch with a caller-supplied encoder.
    pub fn run_with_encoder(
        &self,
        encoder: &dyn Encoder,
        on_report: impl FnMut(&FileReport),
    ) -> Result<BatchSummary, BatchError> {
        let start = Instant::now();
        let files = self.prepare()?;
        if files.is_empty() {
            return Ok(BatchSummary::default());
        }
        if self.options.dry_run {
            return Ok(self.process(&files, Pass::Preview, start, on_report));
        }
        if self.cancel.is_cancelled() {
            return Err(SetupError::Cancelled.into());
        }
        Ok(self.process(&files, Pass::Encode(encoder), start, on_report))
    }

    fn process(
        &self,
        files: &[PathBuf],
        pass: Pass<'_>,
        start: Instant,
        mut on_report: impl FnMut(&FileReport),
    ) -> BatchSummary {
        let opts = &self.options;
        tracing::info!(
            mode = opts.mode.name(),
            files = files.len(),
            dry_run = opts.dry_run,
            "Starting batch"
        );

        let mut reports = Vec::with_capacity(files.len());
        for src in files {
            let dest = destination_for(&opts.input, &opts.output, src);
            let status = if self.cancel.is_cancelled() {
                FileStatus::NotStarted
            } else {
                self.process_file(src, &dest, pass)
                    .unwrap_or_else(FileStatus::Failed)
            };

            if let FileStatus::Failed(error) = &status {
                tracing::warn!(path = %src.display(), %error, "File failed");
            }
            let report = FileReport::new(src.clone(), dest, status);
            on_report(&report);
            reports.push(report);
        }

        let summary = BatchSummary {
            reports,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            processed = summary.processed(),
            failed = summary.failed(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Batch finished"
        );
        summary
    }

    fn process_file(&self, src: &Path, dest: &Path, pass: Pass<'_>) -> Result<FileStatus, FileError> {
        let opts = &self.options;
        if !opts.overwrite && !opts.dry_run {
            let exists = dest.try_exists().map_err(|source| FileError::Inspect {
                path: dest.to_path_buf(),
                source,
            })?;
            if exists {
                return Ok(FileStatus::Skipped);
            }
        }

        match (pass, &opts.mode) {
            (Pass::Preview, mode) => preview(src, mode),
            (Pass::Encode(encoder), BatchMode::Compress(settings)) => {
                self.compress(src, dest, settings, encoder)
            }
            (Pass::Encode(encoder), BatchMode::Overlay(settings)) => {
                self.overlay(src, dest, settings, encoder)
            }
        }
    }

    fn compress(
        &self,
        src: &Path,
        dest: &Path,
        settings: &CompressSettings,
        encoder: &dyn Encoder,
    ) -> Result<FileStatus, FileError> {
        let raster = decode_jpeg(src)?;
        let plan = DimensionPair::plan(raster.dimensions(), &settings.bounds);
        let (width, height) = plan.processed;

        let raw = {
            let resized = resize_bilinear(&raster, width, height)?;
            RawPixelFile::write(&resized).map_err(FileError::RawPixels)?
        };
        drop(raster);

        let accepted = search(encoder, &raw, &settings.search)?;
        self.place(dest, &accepted.bytes)?;

        Ok(FileStatus::Compressed {
            note: plan.note(&settings.bounds),
            outcome: accepted.outcome,
        })
    }

    fn overlay(
        &self,
        src: &Path,
        dest: &Path,
        settings: &OverlaySettings,
        encoder: &dyn Encoder,
    ) -> Result<FileStatus, FileError> {
        let mut raster = decode_jpeg(src)?;
        let (width, height) = raster.dimensions();
        apply_black_overlay(&mut raster, settings.alpha());

        let raw = RawPixelFile::write(&raster).map_err(FileError::RawPixels)?;
        drop(raster);

        let bytes = encoder.encode(&raw, settings.quality(), EncodeFlags::default())?;
        self.place(dest, &bytes)?;

        Ok(FileStatus::Overlaid {
            note: format!("{}x{}", width, height),
            quality: settings.quality(),
            size_bytes: bytes.len() as u64,
        })
    }

    fn place(&self, dest: &Path, bytes: &[u8]) -> Result<(), FileError> {
        place_result(dest, bytes, self.options.overwrite).map_err(|source| FileError::Place {
            path: dest.to_path_buf(),
            source,
        })
    }
}

/// Dry-run line: planned dimensions and encoder settings, no decode.
fn preview(src: &Path, mode: &BatchMode) -> Result<FileStatus, FileError> {
    let dimensions = probe_dimensions(src)?;
    let plan = match mode {
        BatchMode::Compress(settings) => {
            let pair = DimensionPair::plan(dimensions, &settings.bounds);
            let search = &settings.search;
            format!(
                "({}) target={}KB quality={}..{} step={}",
                pair.note(&settings.bounds),
                search.budget_bytes() / 1024,
                search.initial_quality(),
                search.floor_quality(),
                search.step()
            )
        }
        BatchMode::Overlay(settings) => format!(
            "({}x{}) alpha={:.2} quality={}",
            dimensions.0,
            dimensions.1,
            settings.alpha(),
            settings.quality()
        ),
    };
    Ok(FileStatus::Planned(plan))
}
