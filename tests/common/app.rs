//! Scratch input/output directories and a driver factory for batch tests.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use jpegfit::error::BatchError;
use jpegfit::models::{BatchMode, BatchOptions, BatchSummary};
use jpegfit::services::{BatchDriver, CancelToken, Encoder};

/// An input tree plus a not-yet-created output directory.
pub struct TestBatch {
    input: TempDir,
    scratch: TempDir,
    pub recursive: bool,
    pub overwrite: bool,
    pub dry_run: bool,
    pub cancel: CancelToken,
}

impl TestBatch {
    pub fn new() -> Self {
        Self {
            input: tempfile::tempdir().unwrap(),
            scratch: tempfile::tempdir().unwrap(),
            recursive: false,
            overwrite: false,
            dry_run: false,
            cancel: CancelToken::new(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        self.input.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.scratch.path().join("out")
    }

    pub fn input(&self, relative: &str) -> PathBuf {
        self.input.path().join(relative)
    }

    pub fn output(&self, relative: &str) -> PathBuf {
        self.output_dir().join(relative)
    }

    pub fn options(&self, mode: BatchMode) -> BatchOptions {
        BatchOptions {
            input: self.input_dir().to_path_buf(),
            output: self.output_dir(),
            recursive: self.recursive,
            overwrite: self.overwrite,
            dry_run: self.dry_run,
            mode,
        }
    }

    /// Run with `encoder`, returning the summary and the printed report lines.
    pub fn run(
        &self,
        mode: BatchMode,
        encoder: &dyn Encoder,
    ) -> Result<(BatchSummary, Vec<String>), BatchError> {
        let driver = BatchDriver::new(self.options(mode), self.cancel.clone());
        let mut lines = Vec::new();
        let summary = driver.run_with_encoder(encoder, |report| lines.push(report.to_string()))?;
        Ok((summary, lines))
    }
}
